use crate::helpers::TestApp;

#[actix_web::test]
async fn health_check_works(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/health", None).await;

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Working");
}
