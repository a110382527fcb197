use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{get_order, mark_payment_checked}, domain::PaymentMethod, error::ApiError, utils::{get_pooled_connection, DbPool}};

async fn check(
    user: AuthUser,
    pool: web::Data<DbPool>,
    order_id: Uuid,
    stripe_only: bool
) -> Result<HttpResponse, ApiError> {
    let order = get_order(get_pooled_connection(&pool).await?, order_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Order not found"))?;

    user.ensure_owner_or_admin(order.user_id, "You can only pay for your own orders")?;

    if stripe_only && PaymentMethod::parse(&order.payment_method) == Some(PaymentMethod::CashOnDelivery) {
        return Err(ApiError::validation("Order uses cash on delivery"))
    }

    let order = mark_payment_checked(get_pooled_connection(&pool).await?, order_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Order not found"))?;

    Ok(HttpResponse::Ok().json(order))
}

#[tracing::instrument(
    "Checking order payment",
    skip(pool)
)]
pub async fn check_payment(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    check(user, pool, path.into_inner(), false).await
}

#[tracing::instrument(
    "Checking stripe payment",
    skip(pool)
)]
pub async fn check_stripe_payment(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    check(user, pool, path.into_inner(), true).await
}
