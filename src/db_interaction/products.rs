use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use uuid::Uuid;

use crate::{domain::Pagination, models::{Paginated, Product}, schema::products, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

use super::QueryError;

#[tracing::instrument(
    "Getting products from db",
    skip(conn)
)]
pub async fn get_products(
    mut conn: DbConnection,
    pagination: Pagination
) -> Result<Paginated<Product>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let total = products::table
            .count()
            .get_result::<i64>(&mut conn)?;

        let data = products::table
            .select(Product::as_select())
            .order(products::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<Product>(&mut conn)?;

        Ok(Paginated{ data, page: pagination.page, limit: pagination.limit, total })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Getting product by id",
    skip(conn)
)]
pub async fn get_product(
    mut conn: DbConnection,
    product_id: Uuid
) -> Result<Option<Product>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        products::table
            .find(product_id)
            .select(Product::as_select())
            .first::<Product>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Insert a product to db",
    skip_all
)]
pub async fn insert_product(
    mut conn: DbConnection,
    product: Product
) -> Result<Product, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(products::table)
            .values(&product)
            .returning(Product::as_returning())
            .get_result::<Product>(&mut conn)
    })
    .await??;

    Ok(res)
}
