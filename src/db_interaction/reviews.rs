use std::{collections::HashSet, error::Error, fmt::Debug};

use chrono::{DateTime, Utc};
use diesel::{dsl::{count_star, sql}, sql_types::Bool, Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::{Pagination, Rating}, models::{Paginated, Review}, schema::{orders, products, reviews}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

use super::{is_unique_violation, QueryError};

// Validated input for fanning a review out over several products
#[derive(Debug, Clone)]
pub struct NewReviews{
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub product_ids: Vec<Uuid>,
    pub rating: Rating,
    pub comment: String,
    pub images: Vec<String>
}

#[derive(Error)]
pub enum CreateReviewError{
    #[error("Order not found")]
    OrderNotFound,
    #[error("You can only review your own orders")]
    OrderNotOwned,
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("You have already reviewed this product")]
    AlreadyReviewed,
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[source] diesel::result::Error)
}

impl From<diesel::result::Error> for CreateReviewError {
    fn from(value: diesel::result::Error) -> Self {
        if is_unique_violation(&value) {
            CreateReviewError::AlreadyReviewed
        } else {
            CreateReviewError::RunQueryError(value)
        }
    }
}

impl Debug for CreateReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// One review per distinct product, all referencing the same order. The
/// unique (user, product) index backs the duplicate check under races.
#[tracing::instrument(
    "Creating reviews",
    skip(conn, new_reviews),
    fields(user_id = %new_reviews.user_id, order_id = %new_reviews.order_id)
)]
pub async fn create_reviews(
    mut conn: DbConnection,
    new_reviews: NewReviews
) -> Result<Vec<Review>, CreateReviewError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Vec<Review>, CreateReviewError, _>(|conn| {
            let order_owner = orders::table
                .find(new_reviews.order_id)
                .select(orders::user_id)
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(CreateReviewError::OrderNotFound)?;

            if order_owner != new_reviews.user_id {
                return Err(CreateReviewError::OrderNotOwned)
            }

            let mut seen = HashSet::new();
            let product_ids: Vec<Uuid> = new_reviews.product_ids.iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .collect();

            let existing_products: HashSet<Uuid> = products::table
                .filter(products::product_id.eq_any(product_ids.clone()))
                .select(products::product_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();

            if let Some(missing) = product_ids.iter().find(|id| !existing_products.contains(id)) {
                return Err(CreateReviewError::ProductNotFound(*missing))
            }

            let already_reviewed = reviews::table
                .filter(reviews::user_id.eq(new_reviews.user_id))
                .filter(reviews::product_id.eq_any(product_ids.clone()))
                .count()
                .get_result::<i64>(conn)?;

            if already_reviewed > 0 {
                return Err(CreateReviewError::AlreadyReviewed)
            }

            let now = Utc::now();
            let rows: Vec<Review> = product_ids.into_iter()
                .map(|product_id| Review{
                    review_id: Uuid::new_v4(),
                    user_id: new_reviews.user_id,
                    product_id,
                    order_id: Some(new_reviews.order_id),
                    rating: new_reviews.rating.value(),
                    comment: new_reviews.comment.clone(),
                    images: new_reviews.images.clone(),
                    reply: None,
                    replied_at: None,
                    created_at: now
                })
                .collect();

            let created = diesel::insert_into(reviews::table)
                .values(&rows)
                .returning(Review::as_returning())
                .get_results::<Review>(conn)?;

            Ok(created)
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Getting review by id",
    skip(conn)
)]
pub async fn get_review(
    mut conn: DbConnection,
    review_id: Uuid
) -> Result<Option<Review>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        reviews::table
            .find(review_id)
            .select(Review::as_select())
            .first::<Review>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

// Which reviews to list; every filter is optional
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter{
    pub product_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub stars: Vec<i16>,
    pub has_image: Option<bool>
}

#[tracing::instrument(
    "Listing reviews",
    skip(conn)
)]
pub async fn list_reviews(
    mut conn: DbConnection,
    filter: ReviewFilter,
    pagination: Pagination
) -> Result<Paginated<Review>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let build = || {
            let mut query = reviews::table.into_boxed();
            if let Some(product_id) = filter.product_id {
                query = query.filter(reviews::product_id.eq(product_id));
            }
            if let Some(user_id) = filter.user_id {
                query = query.filter(reviews::user_id.eq(user_id));
            }
            if !filter.stars.is_empty() {
                query = query.filter(reviews::rating.eq_any(filter.stars.clone()));
            }
            match filter.has_image {
                Some(true) => query = query.filter(sql::<Bool>("cardinality(reviews.images) > 0")),
                Some(false) => query = query.filter(sql::<Bool>("cardinality(reviews.images) = 0")),
                None => {}
            }
            query
        };

        let total = build().count().get_result::<i64>(&mut conn)?;
        let data = build()
            .select(Review::as_select())
            .order(reviews::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<Review>(&mut conn)?;

        Ok(Paginated{ data, page: pagination.page, limit: pagination.limit, total })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Updating review",
    skip(conn, comment)
)]
pub async fn update_review(
    mut conn: DbConnection,
    review_id: Uuid,
    rating: Option<Rating>,
    comment: Option<String>
) -> Result<Option<Review>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Option<Review>, diesel::result::Error, _>(|conn| {
            let Some(mut review) = reviews::table
                .find(review_id)
                .select(Review::as_select())
                .for_update()
                .first::<Review>(conn)
                .optional()?
            else {
                return Ok(None)
            };

            if let Some(rating) = rating {
                review.rating = rating.value();
            }
            if let Some(comment) = comment {
                review.comment = comment;
            }

            diesel::update(reviews::table.find(review_id))
                .set((
                    reviews::rating.eq(review.rating),
                    reviews::comment.eq(&review.comment)
                ))
                .execute(conn)?;

            Ok(Some(review))
        })
    })
    .await??;

    Ok(res)
}

// Sets the admin reply, replacing any earlier one
#[tracing::instrument(
    "Replying to review",
    skip(conn, reply)
)]
pub async fn reply_to_review(
    mut conn: DbConnection,
    review_id: Uuid,
    reply: String
) -> Result<Option<Review>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        diesel::update(reviews::table.find(review_id))
            .set((
                reviews::reply.eq(Some(reply)),
                reviews::replied_at.eq(Some(Utc::now()))
            ))
            .returning(Review::as_returning())
            .get_result::<Review>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Deleting review",
    skip(conn)
)]
pub async fn delete_review_from_database(
    mut conn: DbConnection,
    review_id: Uuid
) -> Result<bool, QueryError>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::delete(reviews::table.find(review_id))
            .execute(&mut conn)
    })
    .await??;

    Ok(affected_rows > 0)
}

/// Number of reviews per rating value for a product.
#[tracing::instrument(
    "Counting reviews per rating",
    skip(conn)
)]
pub async fn get_rating_counts(
    mut conn: DbConnection,
    product_id: Uuid,
    since: Option<DateTime<Utc>>
) -> Result<Vec<(i16, i64)>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        let mut query = reviews::table
            .filter(reviews::product_id.eq(product_id))
            .group_by(reviews::rating)
            .select((reviews::rating, count_star()))
            .into_boxed();

        if let Some(since) = since {
            query = query.filter(reviews::created_at.ge(since));
        }

        query.load::<(i16, i64)>(&mut conn)
    })
    .await??;

    Ok(res)
}
