use crate::helpers::{LoginResponse, TestApp, PASSWORD};

#[actix_web::test]
async fn post_login_with_correct_data(){
    let app = TestApp::spawn_app().await;
    let registered: serde_json::Value = app.register("someone@example.com").await.json().await.unwrap();

    let response = app.login("someone@example.com", PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: LoginResponse = response.json().await.unwrap();
    assert_eq!(body.user_id.to_string(), registered["userId"].as_str().unwrap());
    assert!(!body.is_admin);
    assert!(!body.token.is_empty());
}

#[actix_web::test]
async fn post_login_with_wrong_password_is_unauthorized(){
    let app = TestApp::spawn_app().await;
    app.register("someone@example.com").await;

    let response = app.login("someone@example.com", "wrongpassword").await;

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn post_login_with_unknown_email_is_unauthorized(){
    let app = TestApp::spawn_app().await;

    let response = app.login("nobody@example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn admin_login_reports_role(){
    let app = TestApp::spawn_app().await;
    let admin = app.create_admin().await;

    let body: LoginResponse = app.login(&admin.email, PASSWORD).await.json().await.unwrap();

    assert!(body.is_admin);
}

#[actix_web::test]
async fn protected_route_rejects_bad_token(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/orders/all", Some("not-a-token")).await;

    assert_eq!(response.status().as_u16(), 401);
}
