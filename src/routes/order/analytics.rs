use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use chrono::{Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{auth::IsAdmin, db_interaction::{get_amount_per_day, get_amount_per_month, get_customers, get_orders_page, get_period_rollups, get_revenue, get_status_counts, PeriodRollups}, domain::{PageQuery, Pagination}, error::ApiError, models::{OrderWithItems, Paginated}, utils::{get_pooled_connection, DbPool}};

const DEFAULT_DAYS: i64 = 7;
const MAX_DAYS: i64 = 366;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrdersOverview{
    #[serde(flatten)]
    pub orders: Paginated<OrderWithItems>,
    #[serde(flatten)]
    pub rollups: PeriodRollups
}

#[tracing::instrument(
    "Get every order with rollups",
    skip(pool, _admin)
)]
pub async fn get_all_orders_overview(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let orders = get_orders_page(get_pooled_connection(&pool).await?, None, Pagination::from(&query.0)).await?;
    let rollups = get_period_rollups(get_pooled_connection(&pool).await?, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(OrdersOverview{ orders, rollups }))
}

#[derive(Deserialize, Debug)]
pub struct DaysQuery{
    days: Option<i64>
}

#[tracing::instrument(
    "Get order amounts per day",
    skip(pool, _admin)
)]
pub async fn get_orders_per_day(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    query: web::Query<DaysQuery>
) -> Result<HttpResponse, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    // Today counts as one of the days
    let since = Utc::now()
                    .date_naive()
                    .and_time(chrono::NaiveTime::MIN)
                    .and_utc() - Duration::days(days - 1);

    let conn = get_pooled_connection(&pool).await?;
    let per_day = get_amount_per_day(conn, since).await?;

    Ok(HttpResponse::Ok().json(per_day))
}

#[derive(Deserialize, Debug)]
pub struct YearQuery{
    year: Option<i32>
}

#[tracing::instrument(
    "Get order amounts per month",
    skip(pool, _admin)
)]
pub async fn get_orders_per_month(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    query: web::Query<YearQuery>
) -> Result<HttpResponse, ApiError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let conn = get_pooled_connection(&pool).await?;
    let per_month = get_amount_per_month(conn, year).await?;

    Ok(HttpResponse::Ok().json(per_month))
}

#[tracing::instrument(
    "Get order counts per status",
    skip(pool, _admin)
)]
pub async fn get_status_overview(
    _admin: IsAdmin,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let counts: BTreeMap<&'static str, i64> = get_status_counts(conn)
                    .await?
                    .into_iter()
                    .map(|(status, count)| (status.as_str(), count))
                    .collect();

    Ok(HttpResponse::Ok().json(counts))
}

#[tracing::instrument(
    "Get revenue",
    skip(pool, _admin)
)]
pub async fn get_revenue_overview(
    _admin: IsAdmin,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let revenue = get_revenue(conn, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(revenue))
}

#[tracing::instrument(
    "Get customers page",
    skip(pool, _admin)
)]
pub async fn get_customers_page(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let customers = get_customers(conn, Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(customers))
}
