use super::*;

#[tokio::test]
async fn healthz_reports_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn unknown_paths_redirect_to_not_found() {
    use axum::response::IntoResponse;

    let response = redirect_unknown().await.into_response();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/404");
}
