use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{chat_messages, order_items, orders, products, reviews, users};

#[derive(Queryable, Selectable, Insertable, Clone, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub addresses: Vec<String>,
    pub created_at: DateTime<Utc>
}

// Everything about a user except the password hash
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInfo{
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub addresses: Vec<String>,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Product{
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Order{
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_note: Option<String>,
    pub shipping_address: String,
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_check: bool,
    pub status: String,
    pub processing_time: Option<DateTime<Utc>>,
    pub shipped_time: Option<DateTime<Utc>>,
    pub delivered_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>
}

// Snapshot of a product at the moment it was ordered
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct OrderItemModel{
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
    pub attributes: serde_json::Value,
    pub image: Option<String>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Review{
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    // Cleared when the order is cancelled
    pub order_id: Option<Uuid>,
    pub rating: i16,
    pub comment: String,
    pub images: Vec<String>,
    pub reply: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage{
    pub message_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>
}

// Order together with its line items, as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems{
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemModel>
}

// Page of results with the total row count
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T>{
    pub data: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64
}
