use chrono::{Datelike, Utc};

use crate::helpers::TestApp;

#[actix_web::test]
async fn revenue_sums_every_order(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_product(100_000, 10);
    app.place_order(&user, &product, 1).await;
    app.place_order(&user, &product, 1).await;

    let response = app.get("/orders/revenue", Some(&admin.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["totalRevenue"], 200_000);
    assert_eq!(body["monthRevenue"], 200_000);
}

#[actix_web::test]
async fn analytics_require_admin(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;

    for path in ["/orders/all", "/orders/per-day", "/orders/per-month", "/orders/status", "/orders/revenue", "/orders/customers", "/orders/export"] {
        let response = app.get(path, Some(&user.token)).await;
        assert_eq!(response.status().as_u16(), 403, "{} was allowed", path);

        let response = app.get(path, None).await;
        assert_eq!(response.status().as_u16(), 401, "{} was allowed", path);
    }
}

#[actix_web::test]
async fn all_orders_carry_rollups(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_product(50_000, 10);
    app.place_order(&user, &product, 2).await;

    let body: serde_json::Value = app.get("/orders/all", Some(&admin.token)).await.json().await.unwrap();

    assert_eq!(body["total"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["today"], serde_json::json!({ "count": 1, "amount": 100_000 }));
    assert_eq!(body["month"]["amount"], 100_000);
}

#[actix_web::test]
async fn status_counts_are_zero_filled(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_random_product(10);
    app.place_order(&user, &product, 1).await;

    let body: serde_json::Value = app.get("/orders/status", Some(&admin.token)).await.json().await.unwrap();

    assert_eq!(body, serde_json::json!({ "pending": 1, "processing": 0, "shipped": 0, "delivered": 0 }));
}

#[actix_web::test]
async fn per_day_and_per_month_include_today(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_product(20_000, 10);
    app.place_order(&user, &product, 1).await;
    app.place_order(&user, &product, 2).await;

    let body: serde_json::Value = app.get("/orders/per-day?days=3", Some(&admin.token)).await.json().await.unwrap();
    let days = body.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["date"], Utc::now().date_naive().to_string());
    assert_eq!(days[0]["count"], 2);
    assert_eq!(days[0]["amount"], 60_000);

    let now = Utc::now();
    let body: serde_json::Value = app.get(&format!("/orders/per-month?year={}", now.year()), Some(&admin.token)).await.json().await.unwrap();
    let months = body.as_array().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0]["month"], now.month());

    let body: serde_json::Value = app.get(&format!("/orders/per-month?year={}", now.year() - 1), Some(&admin.token)).await.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn customers_are_ranked_by_spend(){
    let app = TestApp::spawn_app().await;
    let small = app.create_user().await;
    let big = app.create_user().await;
    let admin = app.create_admin().await;
    let product = app.seed_product(10_000, 20);
    app.place_order(&small, &product, 1).await;
    app.place_order(&big, &product, 3).await;
    app.place_order(&big, &product, 1).await;

    let body: serde_json::Value = app.get("/orders/customers", Some(&admin.token)).await.json().await.unwrap();

    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["userId"], big.user_id.to_string());
    assert_eq!(body["data"][0]["orderCount"], 2);
    assert_eq!(body["data"][0]["totalSpent"], 40_000);
    assert_eq!(body["data"][1]["userId"], small.user_id.to_string());
}
