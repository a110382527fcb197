use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use diesel::{dsl::{count_star, sql}, sql_types::{BigInt, Date, Integer, Text, Timestamptz, Uuid as SqlUuid}, ExpressionMethods, QueryDsl, QueryableByName, RunQueryDsl};
use serde::Serialize;
use uuid::Uuid;

use crate::{domain::{OrderStatus, Pagination}, models::Paginated, schema::orders, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

use super::QueryError;

const SUM_TOTAL_AMOUNT: &str = "COALESCE(SUM(total_amount), 0)::BIGINT";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rollup{
    pub count: i64,
    pub amount: i64
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRollups{
    pub today: Rollup,
    pub week: Rollup,
    pub month: Rollup
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Revenue{
    pub total_revenue: i64,
    pub month_revenue: i64
}

#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyAmount{
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
    #[diesel(sql_type = BigInt)]
    pub amount: i64
}

#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount{
    #[diesel(sql_type = Integer)]
    pub month: i32,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
    #[diesel(sql_type = BigInt)]
    pub amount: i64
}

#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary{
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub username: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = BigInt)]
    pub order_count: i64,
    #[diesel(sql_type = BigInt)]
    pub total_spent: i64
}

#[derive(QueryableByName)]
struct RowCount{
    #[diesel(sql_type = BigInt)]
    count: i64
}

/// Midnight UTC of today, of this week's Monday, and of the first of the month.
pub fn period_starts(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>){
    let today = now.date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let month_start = today.with_day(1).unwrap_or(today);

    let at_midnight = |date: NaiveDate| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
    (at_midnight(today), at_midnight(week_start), at_midnight(month_start))
}

fn rollup_since(
    conn: &mut DbConnection,
    since: DateTime<Utc>
) -> Result<Rollup, diesel::result::Error>{
    let (count, amount) = orders::table
        .filter(orders::created_at.ge(since))
        .select((count_star(), sql::<BigInt>(SUM_TOTAL_AMOUNT)))
        .get_result::<(i64, i64)>(conn)?;

    Ok(Rollup{ count, amount })
}

#[tracing::instrument(
    "Computing today / week / month rollups",
    skip(conn)
)]
pub async fn get_period_rollups(
    mut conn: DbConnection,
    now: DateTime<Utc>
) -> Result<PeriodRollups, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let (today, week, month) = period_starts(now);
        Ok(PeriodRollups{
            today: rollup_since(&mut conn, today)?,
            week: rollup_since(&mut conn, week)?,
            month: rollup_since(&mut conn, month)?
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Computing revenue",
    skip(conn)
)]
pub async fn get_revenue(
    mut conn: DbConnection,
    now: DateTime<Utc>
) -> Result<Revenue, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let (_, _, month_start) = period_starts(now);

        let total_revenue = orders::table
            .select(sql::<BigInt>(SUM_TOTAL_AMOUNT))
            .get_result::<i64>(&mut conn)?;
        let month_revenue = rollup_since(&mut conn, month_start)?.amount;

        Ok(Revenue{ total_revenue, month_revenue })
    })
    .await??;

    Ok(res)
}

/// Number of orders per status, every status present.
#[tracing::instrument(
    "Counting orders per status",
    skip(conn)
)]
pub async fn get_status_counts(
    mut conn: DbConnection
) -> Result<Vec<(OrderStatus, i64)>, QueryError>{
    let rows = spawn_blocking_with_tracing(move || {
        orders::table
            .group_by(orders::status)
            .select((orders::status, count_star()))
            .load::<(String, i64)>(&mut conn)
    })
    .await??;

    Ok(fill_status_counts(&rows))
}

pub fn fill_status_counts(rows: &[(String, i64)]) -> Vec<(OrderStatus, i64)>{
    OrderStatus::ALL.into_iter()
        .map(|status| {
            let count = rows.iter()
                            .filter(|(name, _)| name == status.as_str())
                            .map(|(_, count)| *count)
                            .sum();
            (status, count)
        })
        .collect()
}

#[tracing::instrument(
    "Aggregating order amounts per day",
    skip(conn)
)]
pub async fn get_amount_per_day(
    mut conn: DbConnection,
    since: DateTime<Utc>
) -> Result<Vec<DailyAmount>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        diesel::sql_query(
            "SELECT (created_at AT TIME ZONE 'UTC')::DATE AS date, \
                    COUNT(*) AS count, \
                    COALESCE(SUM(total_amount), 0)::BIGINT AS amount \
             FROM orders \
             WHERE created_at >= $1 \
             GROUP BY 1 \
             ORDER BY 1"
        )
        .bind::<Timestamptz, _>(since)
        .load::<DailyAmount>(&mut conn)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Aggregating order amounts per month",
    skip(conn)
)]
pub async fn get_amount_per_month(
    mut conn: DbConnection,
    year: i32
) -> Result<Vec<MonthlyAmount>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        diesel::sql_query(
            "SELECT EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::INT AS month, \
                    COUNT(*) AS count, \
                    COALESCE(SUM(total_amount), 0)::BIGINT AS amount \
             FROM orders \
             WHERE EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::INT = $1 \
             GROUP BY 1 \
             ORDER BY 1"
        )
        .bind::<Integer, _>(year)
        .load::<MonthlyAmount>(&mut conn)
    })
    .await??;

    Ok(res)
}

/// Customers who placed at least one order, biggest spenders first.
#[tracing::instrument(
    "Listing customers",
    skip(conn)
)]
pub async fn get_customers(
    mut conn: DbConnection,
    pagination: Pagination
) -> Result<Paginated<CustomerSummary>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let total = diesel::sql_query("SELECT COUNT(DISTINCT user_id) AS count FROM orders")
            .get_result::<RowCount>(&mut conn)?
            .count;

        let data = diesel::sql_query(
            "SELECT u.user_id, u.username, u.email, \
                    COUNT(o.order_id) AS order_count, \
                    COALESCE(SUM(o.total_amount), 0)::BIGINT AS total_spent \
             FROM orders o \
             JOIN users u ON u.user_id = o.user_id \
             GROUP BY u.user_id, u.username, u.email \
             ORDER BY total_spent DESC, u.username ASC \
             LIMIT $1 OFFSET $2"
        )
        .bind::<BigInt, _>(pagination.limit)
        .bind::<BigInt, _>(pagination.offset())
        .load::<CustomerSummary>(&mut conn)?;

        Ok(Paginated{ data, page: pagination.page, limit: pagination.limit, total })
    })
    .await??;

    Ok(res)
}
