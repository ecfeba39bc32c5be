//! Login and logout through the full router.

use axum::http::StatusCode;

use acme_integration_tests::{
    TestApp, USER_EMAIL, body_text, form_post, get, location, session_cookie,
};

#[tokio::test]
async fn test_login_sets_session_and_follows_callback() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/login",
            &format!("email={USER_EMAIL}&password=123456&callbackUrl=%2Fdashboard%2Finvoices"),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/invoices"));
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn test_login_without_callback_goes_home() {
    let app = TestApp::new();

    let response = app
        .send(form_post("/login", &format!("email={USER_EMAIL}&password=123456"), None))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn test_login_ignores_foreign_callback() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/login",
            &format!("email={USER_EMAIL}&password=123456&callbackUrl=https%3A%2F%2Fevil.example%2F"),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();

    for body in [
        format!("email={USER_EMAIL}&password=wrong-password"),
        "email=nobody%40nextmail.com&password=123456".to_owned(),
    ] {
        let response = app.send(form_post("/login", &body, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&response).is_none());
        assert!(body_text(response).await.contains("Invalid credentials."));
    }
}

#[tokio::test]
async fn test_short_password_is_rejected_without_lookup() {
    let app = TestApp::new();

    let response = app
        .send(form_post("/login", &format!("email={USER_EMAIL}&password=12345"), None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.users.lookups(), 0);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.send(form_post("/api/auth/signout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let response = app.send(get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?callbackUrl=%2Fdashboard"));
}
