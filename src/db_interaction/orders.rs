use std::{collections::HashMap, error::Error, fmt::Debug};

use chrono::{DateTime, Utc};
use diesel::{BoolExpressionMethods, Connection, ExpressionMethods, OptionalExtension, PgConnection, PgTextExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::{new_order::{requested_quantities, OrderValidationError}, NewOrderRequest, OrderStatus, Pagination}, models::{Order, OrderItemModel, OrderWithItems, Paginated, Product}, schema::{order_items, orders, products, users}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

use super::{contains_pattern, QueryError};

// Attaches line items to each order, preserving order
pub fn load_items_for(
    conn: &mut PgConnection,
    orders: Vec<Order>
) -> Result<Vec<OrderWithItems>, diesel::result::Error>{
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.order_id).collect();

    let mut items_by_order: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
    for item in order_items::table
        .filter(order_items::order_id.eq_any(order_ids))
        .select(OrderItemModel::as_select())
        .load::<OrderItemModel>(conn)?
    {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders.into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.order_id).unwrap_or_default();
            OrderWithItems{ order, items }
        })
        .collect())
}

#[tracing::instrument(
    "Getting order along with associated order_items",
    skip(conn)
)]
pub async fn get_order_with_items(
    mut conn: DbConnection,
    order_id: Uuid
) -> Result<Option<OrderWithItems>, QueryError> {
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let order = orders::table
            .find(order_id)
            .select(Order::as_select())
            .first::<Order>(&mut conn)
            .optional()?;

        match order {
            Some(order) => Ok(load_items_for(&mut conn, vec![order])?.pop()),
            None => Ok(None)
        }
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Getting order by id",
    skip(conn)
)]
pub async fn get_order(
    mut conn: DbConnection,
    order_id: Uuid
) -> Result<Option<Order>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        orders::table
            .find(order_id)
            .select(Order::as_select())
            .first::<Order>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

/// Newest orders first; restricted to one user when `user_id` is given.
#[tracing::instrument(
    "Getting page of orders",
    skip(conn)
)]
pub async fn get_orders_page(
    mut conn: DbConnection,
    user_id: Option<Uuid>,
    pagination: Pagination
) -> Result<Paginated<OrderWithItems>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let mut count_query = orders::table.into_boxed();
            let mut data_query = orders::table.into_boxed();

            if let Some(user_id) = user_id {
                count_query = count_query.filter(orders::user_id.eq(user_id));
                data_query = data_query.filter(orders::user_id.eq(user_id));
            }

            let total = count_query.count().get_result::<i64>(conn)?;
            let page = data_query
                .select(Order::as_select())
                .order(orders::created_at.desc())
                .limit(pagination.limit)
                .offset(pagination.offset())
                .load::<Order>(conn)?;

            Ok(Paginated{
                data: load_items_for(conn, page)?,
                page: pagination.page,
                limit: pagination.limit,
                total
            })
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Loading every order",
    skip(conn)
)]
pub async fn get_all_orders(
    mut conn: DbConnection
) -> Result<Vec<Order>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        orders::table
            .select(Order::as_select())
            .order(orders::created_at.desc())
            .load::<Order>(&mut conn)
    })
    .await??;

    Ok(res)
}

/// A key that parses as a UUID matches the order id exactly, anything else
/// is a case-insensitive substring of the receiver name or phone.
#[tracing::instrument(
    "Searching orders",
    skip(conn)
)]
pub async fn search_orders(
    mut conn: DbConnection,
    search_key: String
) -> Result<Vec<OrderWithItems>, QueryError> {
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let found = match Uuid::parse_str(search_key.trim()) {
            Ok(order_id) => orders::table
                .filter(orders::order_id.eq(order_id))
                .select(Order::as_select())
                .load::<Order>(&mut conn)?,
            Err(_) => {
                let pattern = contains_pattern(search_key.trim());
                orders::table
                    .filter(
                        orders::receiver_name.ilike(pattern.clone())
                            .or(orders::receiver_phone.ilike(pattern))
                    )
                    .select(Order::as_select())
                    .order(orders::created_at.desc())
                    .load::<Order>(&mut conn)?
            }
        };

        load_items_for(&mut conn, found)
    })
    .await??;

    Ok(res)
}

// Error associated with creating orders and decrementing product stock
#[derive(Error)]
pub enum CreateOrderError{
    #[error("Order owner {0} does not exist")]
    UnknownOwner(Uuid),
    #[error(transparent)]
    Rejected(#[from] OrderValidationError),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Prices the request against locked product rows, decrements stock and
/// stores the order with its item snapshots, all in one transaction.
/// `validate_shape` must already have passed.
#[tracing::instrument(
    "Creating order and updating product stock",
    skip_all,
    fields(user_id = %user_id)
)]
pub async fn create_order_and_update_stock(
    mut conn: DbConnection,
    user_id: Uuid,
    request: NewOrderRequest
) -> Result<OrderWithItems, CreateOrderError> {

    let ret = spawn_blocking_with_tracing(move || {
        conn.transaction::<OrderWithItems, CreateOrderError, _>(|conn|{
            // Held until commit so the owner can not be deleted under the insert
            users::table
                .find(user_id)
                .select(users::user_id)
                .for_share()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(CreateOrderError::UnknownOwner(user_id))?;

            let product_ids: Vec<Uuid> = request.products.iter().map(|item| item.product_id).collect();

            // Row locks serialize concurrent orders for the same product
            let catalog: HashMap<Uuid, Product> = products::table
                .filter(products::product_id.eq_any(product_ids))
                .select(Product::as_select())
                .for_update()
                .load::<Product>(conn)?
                .into_iter()
                .map(|product| (product.product_id, product))
                .collect();

            let (payment_method, priced) = request.price_items(&catalog)?;

            for (product_id, quantity) in requested_quantities(&priced) {
                let quantity = quantity as i32;
                let affected_rows = diesel::update(products::table.find(product_id))
                    .filter(products::stock.ge(quantity))
                    .set(products::stock.eq(products::stock - quantity))
                    .execute(conn)?;

                if affected_rows == 0 {
                    return Err(OrderValidationError::NotEnoughStock(catalog[&product_id].name.clone()).into())
                }
            }

            let total_amount = priced.iter().map(|item| item.price * i64::from(item.quantity)).sum();
            let order = Order{
                order_id: Uuid::new_v4(),
                user_id,
                receiver_name: request.receiver_name.trim().to_string(),
                receiver_phone: request.receiver_phone,
                receiver_note: request.receiver_note,
                shipping_address: request.shipping_address.trim().to_string(),
                total_amount,
                payment_method: payment_method.as_str().to_string(),
                payment_check: false,
                status: OrderStatus::Pending.as_str().to_string(),
                processing_time: None,
                shipped_time: None,
                delivered_time: None,
                created_at: Utc::now()
            };

            diesel::insert_into(orders::table)
                .values(&order)
                .execute(conn)?;

            let items: Vec<OrderItemModel> = priced.into_iter()
                .map(|item| OrderItemModel{
                    order_item_id: Uuid::new_v4(),
                    order_id: order.order_id,
                    product_id: item.product_id,
                    name: item.name,
                    quantity: item.quantity,
                    price: item.price,
                    attributes: item.attributes,
                    image: item.image
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&items)
                .execute(conn)?;

            Ok(OrderWithItems{ order, items })
        })
    })
    .await??;

    Ok(ret)
}

// Error associated with cancelling an order
#[derive(Error)]
pub enum CancelOrderError{
    #[error("Order not found")]
    NotFound,
    #[error("You can only cancel your own orders")]
    NotOwner,
    #[error("Order is {0}, can not be cancelled")]
    NotPending(String),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for CancelOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Deletes a pending order owned by `requester_id`, who must also be the
/// `user_id` named in the request. Status is checked before ownership.
/// Stock is not restored.
#[tracing::instrument(
    "Cancelling order",
    skip(conn)
)]
pub async fn cancel_order(
    mut conn: DbConnection,
    requester_id: Uuid,
    user_id: Uuid,
    order_id: Uuid
) -> Result<(), CancelOrderError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), CancelOrderError, _>(|conn| {
            let order = orders::table
                .find(order_id)
                .select(Order::as_select())
                .for_update()
                .first::<Order>(conn)
                .optional()?
                .ok_or(CancelOrderError::NotFound)?;

            if order.status != OrderStatus::Pending.as_str() {
                return Err(CancelOrderError::NotPending(order.status))
            }

            if requester_id != user_id || order.user_id != user_id {
                return Err(CancelOrderError::NotOwner)
            }

            diesel::delete(orders::table.find(order_id))
                .execute(conn)?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}

// Admin edit of receiver fields and/or status; `None` keeps the stored value
#[derive(Debug, Default, Clone)]
pub struct OrderEdit{
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub receiver_note: Option<String>,
    pub shipping_address: Option<String>,
    pub status: Option<OrderStatus>
}

/// Moves the order to `status`, stamping the matching timestamp the first
/// time that status is reached. Any transition is accepted.
pub fn apply_status(order: &mut Order, status: OrderStatus, now: DateTime<Utc>){
    order.status = status.as_str().to_string();
    match status {
        OrderStatus::Pending => {},
        OrderStatus::Processing => { order.processing_time.get_or_insert(now); },
        OrderStatus::Shipped => { order.shipped_time.get_or_insert(now); },
        OrderStatus::Delivered => { order.delivered_time.get_or_insert(now); }
    }
}

#[tracing::instrument(
    "Editing order",
    skip(conn)
)]
pub async fn update_order(
    mut conn: DbConnection,
    order_id: Uuid,
    edit: OrderEdit
) -> Result<Option<Order>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Option<Order>, diesel::result::Error, _>(|conn| {
            let Some(mut order) = orders::table
                .find(order_id)
                .select(Order::as_select())
                .for_update()
                .first::<Order>(conn)
                .optional()?
            else {
                return Ok(None)
            };

            if let Some(name) = edit.receiver_name {
                order.receiver_name = name.trim().to_string();
            }
            if let Some(phone) = edit.receiver_phone {
                order.receiver_phone = phone;
            }
            if let Some(note) = edit.receiver_note {
                order.receiver_note = Some(note);
            }
            if let Some(address) = edit.shipping_address {
                order.shipping_address = address.trim().to_string();
            }
            if let Some(status) = edit.status {
                apply_status(&mut order, status, Utc::now());
            }

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::receiver_name.eq(&order.receiver_name),
                    orders::receiver_phone.eq(&order.receiver_phone),
                    orders::receiver_note.eq(order.receiver_note.clone()),
                    orders::shipping_address.eq(&order.shipping_address),
                    orders::status.eq(&order.status),
                    orders::processing_time.eq(order.processing_time),
                    orders::shipped_time.eq(order.shipped_time),
                    orders::delivered_time.eq(order.delivered_time)
                ))
                .execute(conn)?;

            Ok(Some(order))
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Marking order as paid",
    skip(conn)
)]
pub async fn mark_payment_checked(
    mut conn: DbConnection,
    order_id: Uuid
) -> Result<Option<Order>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        diesel::update(orders::table.find(order_id))
            .set(orders::payment_check.eq(true))
            .returning(Order::as_returning())
            .get_result::<Order>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}
