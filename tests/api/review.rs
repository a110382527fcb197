use chrono::{Duration, Utc};
use diesel::{ExpressionMethods, RunQueryDsl};
use storefront::{models::Product, schema::reviews};
use uuid::Uuid;

use crate::helpers::{message_of, TestApp, TestUser};

fn review_body(order_id: Uuid, products: &[&Product], rating: i64) -> serde_json::Value{
    serde_json::json!({
        "productIds": products.iter().map(|p| p.product_id).collect::<Vec<_>>(),
        "orderId": order_id,
        "rating": rating,
        "comment": "Fits well, fast delivery",
        "images": [{ "url": "https://cdn.example.com/reviews/photo.jpg", "size": 204800 }]
    })
}

async fn post_review(app: &TestApp, user: &TestUser, body: &serde_json::Value) -> reqwest::Response{
    app.post_json(&format!("/reviews/{}", user.user_id), Some(&user.token), body).await
}

// Places an order and reviews its product, returning the review id
async fn reviewed_product(app: &TestApp, user: &TestUser, product: &Product, rating: i64) -> Uuid{
    let order_id = app.place_order(user, product, 1).await;
    let response = post_review(app, user, &review_body(order_id, &[product], rating)).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body[0]["reviewId"].as_str().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn review_fans_out_over_products(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let first = app.seed_random_product(5);
    let second = app.seed_random_product(5);
    let order_id = app.place_order(&user, &first, 1).await;

    let response = post_review(&app, &user, &review_body(order_id, &[&first, &second], 5)).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|review| review["orderId"] == order_id.to_string()));
    assert_eq!(created[0]["images"][0], "https://cdn.example.com/reviews/photo.jpg");
}

#[actix_web::test]
async fn duplicate_review_is_rejected(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    assert_eq!(post_review(&app, &user, &review_body(order_id, &[&product], 4)).await.status().as_u16(), 201);
    let response = post_review(&app, &user, &review_body(order_id, &[&product], 5)).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(message_of(response).await, "You have already reviewed this product");
}

#[actix_web::test]
async fn review_validation_messages(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let test_cases = vec![
        ("productIds", serde_json::json!([]), "Product ids are required"),
        ("orderId", serde_json::Value::Null, "Order id is required"),
        ("rating", serde_json::json!(6), "Rating must be between 1 and 5"),
        ("comment", serde_json::json!("a".repeat(2001)), "Comment must be at most 2000 characters"),
        (
            "images",
            serde_json::json!([{ "url": "https://cdn.example.com/photo.jpg", "size": 21 * 1024 * 1024 }]),
            "Image size must be less than 20MB"
        )
    ];

    for (field, value, expected) in test_cases {
        let mut body = review_body(order_id, &[&product], 5);
        body[field] = value;

        let response = post_review(&app, &user, &body).await;

        assert_eq!(response.status().as_u16(), 400, "field {} was accepted", field);
        assert_eq!(message_of(response).await, expected);
    }
}

#[actix_web::test]
async fn reviewing_someone_elses_order_is_forbidden(){
    let app = TestApp::spawn_app().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&owner, &product, 1).await;

    let response = post_review(&app, &other, &review_body(order_id, &[&product], 5)).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn reviewing_missing_order_is_not_found(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);

    let response = post_review(&app, &user, &review_body(Uuid::new_v4(), &[&product], 5)).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn owner_can_edit_recent_review(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let review_id = reviewed_product(&app, &user, &product, 3).await;

    let response = app.put_json(
        &format!("/reviews/{}", review_id),
        Some(&user.token),
        &serde_json::json!({ "rating": 4, "comment": "Better after a week" })
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["rating"], 4);
    assert_eq!(body["comment"], "Better after a week");
}

#[actix_web::test]
async fn editing_old_review_is_forbidden(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let review_id = reviewed_product(&app, &user, &product, 3).await;

    let mut conn = app.pool.get().unwrap();
    diesel::update(reviews::table)
        .filter(reviews::review_id.eq(review_id))
        .set(reviews::created_at.eq(Utc::now() - Duration::days(8)))
        .execute(&mut conn)
        .unwrap();

    for token in [&user.token, &admin.token] {
        let response = app.put_json(
            &format!("/reviews/{}", review_id),
            Some(token),
            &serde_json::json!({ "rating": 5 })
        ).await;

        assert_eq!(response.status().as_u16(), 403);
        assert_eq!(message_of(response).await, "You cannot edit reviews older than 7 days");
    }
}

#[actix_web::test]
async fn stranger_cannot_edit_or_delete_review(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let other = app.create_user().await;
    let product = app.seed_random_product(5);
    let review_id = reviewed_product(&app, &user, &product, 3).await;

    let path = format!("/reviews/{}", review_id);
    assert_eq!(app.put_json(&path, Some(&other.token), &serde_json::json!({ "rating": 1 })).await.status().as_u16(), 403);
    assert_eq!(app.delete(&path, Some(&other.token)).await.status().as_u16(), 403);
    assert_eq!(app.delete(&path, Some(&user.token)).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn admin_reply_replaces_previous_reply(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(5);
    let review_id = reviewed_product(&app, &user, &product, 2).await;

    let path = format!("/reviews/reply/{}", review_id);
    app.post_json(&path, Some(&admin.token), &serde_json::json!({ "reply": "Sorry to hear that" })).await;
    let response = app.post_json(&path, Some(&admin.token), &serde_json::json!({ "reply": "We will send a replacement" })).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["reply"], "We will send a replacement");
    assert!(body["repliedAt"].is_string());

    let response = app.post_json(&path, Some(&user.token), &serde_json::json!({ "reply": "Thanks" })).await;
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn statistic_counts_every_rating(){
    let app = TestApp::spawn_app().await;
    let first = app.create_user().await;
    let second = app.create_user().await;
    let product = app.seed_random_product(5);
    reviewed_product(&app, &first, &product, 5).await;
    reviewed_product(&app, &second, &product, 4).await;

    let body: serde_json::Value = app.get(&format!("/reviews/statistic/{}", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 2);
    assert_eq!(body["average"], 4.5);
    assert_eq!(body["ratings"]["5"], 1);
    assert_eq!(body["ratings"]["4"], 1);
    assert_eq!(body["ratings"]["1"], 0);
}

#[actix_web::test]
async fn statistic_of_unreviewed_product_is_zero(){
    let app = TestApp::spawn_app().await;
    let product = app.seed_random_product(5);

    let body: serde_json::Value = app.get(&format!("/reviews/statistic/{}", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 0);
    assert_eq!(body["average"], 0.0);
}

#[actix_web::test]
async fn star_filter_selects_ratings(){
    let app = TestApp::spawn_app().await;
    let product = app.seed_random_product(10);
    for rating in [5, 4, 2] {
        let user = app.create_user().await;
        reviewed_product(&app, &user, &product, rating).await;
    }

    let body: serde_json::Value = app.get(&format!("/reviews/star/{}?stars=5,4&hasImage=true", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 2);

    let body: serde_json::Value = app.get(&format!("/reviews/star/{}?hasImage=false", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn product_reviews_are_public(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    reviewed_product(&app, &user, &product, 5).await;

    let response = app.get(&format!("/reviews/product/{}", product.product_id), None).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn cancelling_order_keeps_its_reviews(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    let order_id = app.place_order(&user, &product, 1).await;

    let response = post_review(&app, &user, &review_body(order_id, &[&product], 5)).await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app.delete(&format!("/orders/cancel/{}/{}", user.user_id, order_id), Some(&user.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = app.get(&format!("/reviews/statistic/{}", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);

    let body: serde_json::Value = app.get(&format!("/reviews/product/{}", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"][0]["rating"], 5);
    assert!(body["data"][0]["orderId"].is_null());
}

#[actix_web::test]
async fn statistic_counts_reviews_created_from_date(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let product = app.seed_random_product(5);
    reviewed_product(&app, &user, &product, 3).await;

    let body: serde_json::Value = app.get(&format!("/reviews/statistic/{}?from=2999-01-01", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(body["ratings"]["3"], 0);

    let body: serde_json::Value = app.get(&format!("/reviews/statistic/{}?from=2000-01-01", product.product_id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["ratings"]["3"], 1);
}
