use actix_web::{web, HttpResponse};

use crate::{auth::AuthUser, db_interaction::{create_order_and_update_stock, CreateOrderError}, domain::{new_order::OrderValidationError, NewOrderRequest}, error::ApiError, utils::{get_pooled_connection, DbPool}};

impl From<OrderValidationError> for ApiError {
    fn from(value: OrderValidationError) -> Self {
        match value {
            OrderValidationError::ProductNotFound(_) => ApiError::not_found(value.to_string()),
            _ => ApiError::validation(value.to_string())
        }
    }
}

impl From<CreateOrderError> for ApiError {
    fn from(value: CreateOrderError) -> Self {
        match value {
            CreateOrderError::Rejected(e) => e.into(),
            // Token outlived its user
            CreateOrderError::UnknownOwner(_) => ApiError::Unauthenticated("Invalid token".into()),
            e => ApiError::Unexpected(anyhow::Error::new(e))
        }
    }
}

#[tracing::instrument(
    "Posting order",
    skip(pool, order),
    fields(user_id = %user.user_id)
)]
pub async fn post_order(
    user: AuthUser,
    pool: web::Data<DbPool>,
    order: web::Json<NewOrderRequest>
) -> Result<HttpResponse, ApiError> {
    let order = order.into_inner();

    let owner_id = order.user_id.unwrap_or(user.user_id);
    user.ensure_self(owner_id, "You cannot create order for another user")?;

    order.validate_shape()?;

    let conn = get_pooled_connection(&pool).await?;
    let created = create_order_and_update_stock(conn, owner_id, order).await?;

    tracing::info!(order_id = %created.order.order_id, "Order created");
    Ok(HttpResponse::Created().json(created))
}
