use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::IsAdmin, db_interaction::insert_product, error::ApiError, models::Product, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct ProductForm{
    #[serde(default)]
    name: String,
    price: i64,
    stock: i32,
    image: Option<String>
}

impl ProductForm {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("Product name is required"))
        }
        if self.price < 0 {
            return Err(ApiError::validation("Price must not be negative"))
        }
        if self.stock < 0 {
            return Err(ApiError::validation("Stock must not be negative"))
        }
        Ok(())
    }
}

#[tracing::instrument(
    "Posting product",
    skip(pool, _admin)
)]
pub async fn post_product(
    pool: web::Data<DbPool>,
    form: web::Json<ProductForm>,
    _admin: IsAdmin
) -> Result<HttpResponse, ApiError>{
    form.validate()?;

    let form = form.into_inner();
    let product = Product{
        product_id: Uuid::new_v4(),
        name: form.name.trim().to_string(),
        price: form.price,
        stock: form.stock,
        image: form.image,
        created_at: Utc::now()
    };

    let conn = get_pooled_connection(&pool).await?;
    let product = insert_product(conn, product).await?;

    Ok(HttpResponse::Created().json(product))
}
