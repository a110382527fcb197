use actix_web::{web, HttpResponse};

use crate::{auth::IsAdmin, db_interaction::get_all_orders, error::ApiError, utils::{csv_response, get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Exporting orders",
    skip(pool, _admin)
)]
pub async fn export_orders(
    _admin: IsAdmin,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let orders = get_all_orders(conn).await?;

    Ok(csv_response("orders.csv", &orders)?)
}
