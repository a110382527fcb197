use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{auth::IsAdmin, db_interaction::search_orders, error::ApiError, models::OrderWithItems, utils::{get_pooled_connection, DbPool}};

#[derive(Serialize, Debug)]
pub struct SearchResult{
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    orders: Vec<OrderWithItems>
}

impl From<Vec<OrderWithItems>> for SearchResult {
    fn from(orders: Vec<OrderWithItems>) -> Self {
        let message = orders.is_empty().then_some("No order founded");
        SearchResult{ message, orders }
    }
}

#[tracing::instrument(
    "Searching orders",
    skip(pool, _admin)
)]
pub async fn search_orders_by_key(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    path: web::Path<String>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let found = search_orders(conn, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SearchResult::from(found)))
}
