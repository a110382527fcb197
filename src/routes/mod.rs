mod authentication;
mod chat;
mod health_check;
mod order;
mod product;
mod review;
mod user;

use actix_web::web;

pub use health_check::health_check;

// Static segments are registered before the `{id}` routes they would shadow
pub fn configure(cfg: &mut web::ServiceConfig){
    cfg
        .route("/health", web::get().to(health_check))
        .route("/register", web::post().to(authentication::register))
        .route("/login", web::post().to(authentication::login))
        .service(
            web::scope("/products")
                .route("", web::post().to(product::post_product))
                .route("", web::get().to(product::get_products_page))
                .route("/{product_id}", web::get().to(product::get_product_by_id))
        )
        .service(
            web::scope("/orders")
                .route("", web::post().to(order::post_order))
                .route("/all", web::get().to(order::get_all_orders_overview))
                .route("/per-day", web::get().to(order::get_orders_per_day))
                .route("/per-month", web::get().to(order::get_orders_per_month))
                .route("/status", web::get().to(order::get_status_overview))
                .route("/revenue", web::get().to(order::get_revenue_overview))
                .route("/customers", web::get().to(order::get_customers_page))
                .route("/export", web::get().to(order::export_orders))
                .route("/search/{search_key}", web::get().to(order::search_orders_by_key))
                .route("/user/{user_id}", web::get().to(order::get_orders_of_user))
                .route("/id/{order_id}", web::get().to(order::get_order_by_id))
                .route("/cancel/{user_id}/{order_id}", web::delete().to(order::cancel_order_by_id))
                .route("/edit/{order_id}", web::put().to(order::edit_order))
                .route("/payment-check/{order_id}", web::put().to(order::check_payment))
                .route("/stripe-check/{order_id}", web::put().to(order::check_stripe_payment))
        )
        .service(
            web::scope("/reviews")
                .route("/product/{product_id}", web::get().to(review::get_reviews_of_product))
                .route("/user/{user_id}", web::get().to(review::get_reviews_of_user))
                .route("/star/{product_id}", web::get().to(review::get_reviews_by_stars))
                .route("/statistic/{product_id}", web::get().to(review::get_review_statistic))
                .route("/reply/{review_id}", web::post().to(review::reply_review))
                .route("/{user_id}", web::post().to(review::post_reviews))
                .route("/{review_id}", web::put().to(review::edit_review))
                .route("/{review_id}", web::delete().to(review::delete_review))
        )
        .service(
            web::scope("/users")
                .route("", web::get().to(user::get_users_page))
                .route("/export", web::get().to(user::export_users))
                .route("/chat-recipients", web::get().to(chat::get_chat_recipients))
                .route("/{user_id}", web::get().to(user::get_user_by_id))
                .route("/{user_id}", web::put().to(user::update_user))
                .route("/{user_id}", web::delete().to(user::delete_user))
        )
        .service(
            web::scope("/chats")
                .route("/{user_id}", web::post().to(chat::post_message))
                .route("/{user_id}", web::get().to(chat::get_conversation_with))
        );
}
