use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db_interaction::get_rating_counts, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct StatisticQuery{
    from: Option<NaiveDate>
}

#[derive(Serialize, Debug, PartialEq)]
pub struct RatingStatistic{
    pub total: i64,
    pub average: f64,
    pub ratings: BTreeMap<String, i64>
}

impl RatingStatistic {
    // Every rating from 1 to 5 is present; average is rounded to one decimal
    pub fn from_counts(counts: &[(i16, i64)]) -> Self{
        let mut ratings: BTreeMap<String, i64> = (1..=5).map(|r: i16| (r.to_string(), 0)).collect();
        let mut total = 0;
        let mut sum = 0;

        for (rating, count) in counts {
            if let Some(slot) = ratings.get_mut(&rating.to_string()) {
                *slot += count;
                total += count;
                sum += i64::from(*rating) * count;
            }
        }

        let average = if total == 0 {
            0.0
        } else {
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        };

        RatingStatistic{ total, average, ratings }
    }
}

#[tracing::instrument(
    "Get review statistic of product",
    skip(pool)
)]
pub async fn get_review_statistic(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<StatisticQuery>
) -> Result<HttpResponse, ApiError> {
    let since = query.from.map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc());

    let conn = get_pooled_connection(&pool).await?;
    let counts = get_rating_counts(conn, path.into_inner(), since).await?;

    Ok(HttpResponse::Ok().json(RatingStatistic::from_counts(&counts)))
}
