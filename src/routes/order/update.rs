use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::IsAdmin, db_interaction::{update_order, OrderEdit}, domain::{receiver, OrderStatus}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderEditForm{
    receiver_name: Option<String>,
    receiver_phone: Option<String>,
    receiver_note: Option<String>,
    shipping_address: Option<String>,
    status: Option<String>
}

impl TryFrom<OrderEditForm> for OrderEdit {
    type Error = String;

    fn try_from(form: OrderEditForm) -> Result<Self, Self::Error> {
        if let Some(name) = &form.receiver_name {
            receiver::validate_receiver_name(name)?;
        }
        if let Some(address) = &form.shipping_address {
            receiver::validate_shipping_address(address)?;
        }
        receiver::validate_receiver_note(form.receiver_note.as_deref())?;
        if let Some(phone) = &form.receiver_phone {
            receiver::validate_receiver_phone(phone)?;
        }

        let status = match form.status {
            Some(status) => Some(
                OrderStatus::parse(&status)
                    .ok_or_else(|| format!("Invalid order status: {}", status))?
            ),
            None => None
        };

        Ok(OrderEdit{
            receiver_name: form.receiver_name,
            receiver_phone: form.receiver_phone,
            receiver_note: form.receiver_note,
            shipping_address: form.shipping_address,
            status
        })
    }
}

#[tracing::instrument(
    "Editing order",
    skip(pool, form, _admin)
)]
pub async fn edit_order(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<OrderEditForm>
) -> Result<HttpResponse, ApiError> {
    let edit = OrderEdit::try_from(form.into_inner())
                    .map_err(ApiError::Validation)?;

    let conn = get_pooled_connection(&pool).await?;
    let order = update_order(conn, path.into_inner(), edit)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Order not found"))?;

    Ok(HttpResponse::Ok().json(order))
}
