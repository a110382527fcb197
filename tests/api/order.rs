use futures_util::future::join;
use uuid::Uuid;

use crate::helpers::{message_of, order_body, TestApp};

#[actix_web::test]
async fn post_order_creates_order_and_decrements_stock(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(10);

    let response = app.post_order(&user, &product, 3).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paymentCheck"], false);
    assert_eq!(body["totalAmount"], product.price * 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["attributes"]["color"], "red");

    assert_eq!(app.product_stock(product.product_id), 7);
}

#[actix_web::test]
async fn post_order_without_token_is_unauthorized(){
    let app = TestApp::spawn_app().await;
    let product = app.seed_random_product(10);

    let response = app.post_json("/orders", None, &order_body(Uuid::new_v4(), &product, 1)).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn post_order_for_another_user_is_forbidden(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let other = app.create_user().await;
    let product = app.seed_random_product(10);

    let response = app.post_json("/orders", Some(&user.token), &order_body(other.user_id, &product, 1)).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(message_of(response).await, "You cannot create order for another user");
}

#[actix_web::test]
async fn post_order_with_mismatched_total_fails(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_product(100_000, 10);

    let mut body = order_body(user.user_id, &product, 2);
    body["totalAmount"] = serde_json::json!(150_000);
    let response = app.post_json("/orders", Some(&user.token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Total amount does not match product prices");
    assert_eq!(app.product_stock(product.product_id), 10);
}

#[actix_web::test]
async fn post_order_with_outdated_item_price_fails(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_product(100_000, 10);

    let mut body = order_body(user.user_id, &product, 2);
    body["products"][0]["price"] = serde_json::json!(90_000);
    let response = app.post_json("/orders", Some(&user.token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Total amount does not match product prices");
    assert_eq!(app.product_stock(product.product_id), 10);
}

#[actix_web::test]
async fn post_order_rejects_invalid_receiver_fields(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(10);

    let test_cases = vec![
        ("receiverName", serde_json::json!(""), "Receiver name is required"),
        ("shippingAddress", serde_json::json!("Hanoi"), "Shipping address must be at least 10 characters"),
        ("receiverNote", serde_json::json!("a".repeat(501)), "Receiver note must be at most 500 characters"),
        ("receiverPhone", serde_json::json!("01234"), "Invalid phone number length"),
        ("receiverPhone", serde_json::json!("09123a5678"), "Phone number must contain only digits"),
        ("products", serde_json::json!([]), "Products are required")
    ];

    for (field, value, expected) in test_cases {
        let mut body = order_body(user.user_id, &product, 1);
        body[field] = value;

        let response = app.post_json("/orders", Some(&user.token), &body).await;

        assert_eq!(response.status().as_u16(), 400, "field {} was accepted", field);
        assert_eq!(message_of(response).await, expected);
    }
}

#[actix_web::test]
async fn post_order_with_zero_quantity_fails(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(10);

    let response = app.post_order(&user, &product, 0).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Quantity must be greater than 0");
}

#[actix_web::test]
async fn post_order_for_unknown_product_is_not_found(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let mut product = app.seed_random_product(10);
    product.product_id = Uuid::new_v4();

    let response = app.post_order(&user, &product, 1).await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(message_of(response).await, format!("Product not found: {}", product.product_id));
}

#[actix_web::test]
async fn post_order_beyond_stock_fails(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(2);

    let response = app.post_order(&user, &product, 3).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, format!("Not enough stock for product: {}", product.name));
    assert_eq!(app.product_stock(product.product_id), 2);
}

#[actix_web::test]
async fn post_order_with_stripe_is_not_supported(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(10);

    let mut body = order_body(user.user_id, &product, 1);
    body["paymentMethod"] = serde_json::json!("STRIPE");
    let response = app.post_json("/orders", Some(&user.token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Other function are not supported");
    assert_eq!(app.product_stock(product.product_id), 10);
}

#[actix_web::test]
async fn concurrent_orders_for_last_item_only_one_succeeds(){
    let app = TestApp::spawn_app().await;
    let first = app.create_user().await;
    let second = app.create_user().await;
    let product = app.seed_random_product(1);

    let (a, b) = join(
        app.post_order(&first, &product, 1),
        app.post_order(&second, &product, 1)
    ).await;

    let mut statuses = vec![a.status().as_u16(), b.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![201, 400]);
    assert_eq!(app.product_stock(product.product_id), 0);
}

#[actix_web::test]
async fn cancel_pending_order_deletes_it(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 2).await;

    let response = app.delete(&format!("/orders/cancel/{}/{}", user.user_id, order_id), Some(&user.token)).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(message_of(response).await, "Order cancelled");

    let response = app.get(&format!("/orders/id/{}", order_id), Some(&user.token)).await;
    assert_eq!(response.status().as_u16(), 404);

    // Stock is not given back
    assert_eq!(app.product_stock(product.product_id), 3);
}

#[actix_web::test]
async fn cancel_processing_order_fails(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(
        &format!("/orders/edit/{}", order_id),
        Some(&admin.token),
        &serde_json::json!({ "status": "processing" })
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.delete(&format!("/orders/cancel/{}/{}", user.user_id, order_id), Some(&user.token)).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Order is processing, can not be cancelled");
}

#[actix_web::test]
async fn cancel_processing_order_fails_for_any_requester(){
    let app = TestApp::spawn_app().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&owner, &product, 1).await;

    app.put_json(
        &format!("/orders/edit/{}", order_id),
        Some(&admin.token),
        &serde_json::json!({ "status": "processing" })
    ).await;

    for requester in [&other, &admin] {
        let response = app.delete(&format!("/orders/cancel/{}/{}", owner.user_id, order_id), Some(&requester.token)).await;
        assert_eq!(response.status().as_u16(), 400);
    }
}

#[actix_web::test]
async fn cancel_someone_elses_order_is_forbidden(){
    let app = TestApp::spawn_app().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&owner, &product, 1).await;

    let response = app.delete(&format!("/orders/cancel/{}/{}", other.user_id, order_id), Some(&other.token)).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(message_of(response).await, "You can only cancel your own orders");
}

#[actix_web::test]
async fn admin_edit_stamps_status_time(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(
        &format!("/orders/edit/{}", order_id),
        Some(&admin.token),
        &serde_json::json!({ "status": "shipped", "receiverName": "Le Van C" })
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "shipped");
    assert_eq!(body["receiverName"], "Le Van C");
    assert!(body["shippedTime"].is_string());
    assert!(body["deliveredTime"].is_null());
}

#[actix_web::test]
async fn edit_revalidates_receiver_phone(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(
        &format!("/orders/edit/{}", order_id),
        Some(&admin.token),
        &serde_json::json!({ "receiverPhone": "01234" })
    ).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Invalid phone number length");
}

#[actix_web::test]
async fn regular_user_cannot_edit_order(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(
        &format!("/orders/edit/{}", order_id),
        Some(&user.token),
        &serde_json::json!({ "status": "delivered" })
    ).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn owner_can_mark_payment_checked(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(&format!("/orders/payment-check/{}", order_id), Some(&user.token), &serde_json::json!({})).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["paymentCheck"], true);
}

#[actix_web::test]
async fn stripe_check_rejects_cash_on_delivery(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.put_json(&format!("/orders/stripe-check/{}", order_id), Some(&user.token), &serde_json::json!({})).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "Order uses cash on delivery");
}

#[actix_web::test]
async fn payment_check_for_missing_order_is_not_found(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;

    let response = app.put_json(&format!("/orders/payment-check/{}", Uuid::new_v4()), Some(&user.token), &serde_json::json!({})).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn orders_of_user_are_visible_to_owner_and_admin_only(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let other = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(10);
    app.place_order(&user, &product, 1).await;
    app.place_order(&user, &product, 2).await;

    let path = format!("/orders/user/{}", user.user_id);

    let body: serde_json::Value = app.get(&path, Some(&user.token)).await.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    assert_eq!(app.get(&path, Some(&admin.token)).await.status().as_u16(), 200);
    assert_eq!(app.get(&path, Some(&other.token)).await.status().as_u16(), 403);
}

#[actix_web::test]
async fn order_by_id_is_hidden_from_strangers(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let other = app.create_user().await;
    let product = app.seed_random_product(10);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.get(&format!("/orders/id/{}", order_id), Some(&other.token)).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn search_finds_orders_by_receiver(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(10);
    let order_id = app.place_order(&user, &product, 1).await;

    let body: serde_json::Value = app.get("/orders/search/van%20a", Some(&admin.token)).await.json().await.unwrap();
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let body: serde_json::Value = app.get(&format!("/orders/search/{}", order_id), Some(&admin.token)).await.json().await.unwrap();
    assert_eq!(body["orders"][0]["orderId"], order_id.to_string());
}

#[actix_web::test]
async fn search_without_match_returns_message(){
    let app = TestApp::spawn_app().await;
    let admin = app.create_admin().await;

    let response = app.get("/orders/search/nobody", Some(&admin.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "No order founded", "orders": [] }));
}

#[actix_web::test]
async fn search_matches_wildcard_characters_literally(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(10);
    app.place_order(&user, &product, 1).await;

    for key in ["_", "%25", "van%25a"] {
        let body: serde_json::Value = app.get(&format!("/orders/search/{}", key), Some(&admin.token)).await.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "message": "No order founded", "orders": [] }),
            "search key {} matched an order", key
        );
    }
}

#[actix_web::test]
async fn export_returns_csv(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(10);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = app.get("/orders/export", Some(&admin.token)).await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/csv"));

    let text = response.text().await.unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("orderId,userId"));
    assert!(lines.next().unwrap().starts_with(&order_id.to_string()));
}
