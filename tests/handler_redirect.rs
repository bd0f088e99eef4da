mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_redirect_success() {
    let server = common::create_test_server(common::seeded_store(3));

    let response = server.get("/id001").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://seed.example/1");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = common::create_test_server(common::empty_store());

    let response = server.get("/nope00").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_redirect_after_shorten() {
    let server = common::create_test_server(common::empty_store());

    let created = server
        .post("/api/shorten")
        .json(&serde_json::json!({ "url": "https://example.com/landing?ref=mail" }))
        .await
        .json::<serde_json::Value>();
    let short_id = created["shortId"].as_str().unwrap();

    let response = server.get(&format!("/{short_id}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://example.com/landing?ref=mail"
    );
}

#[tokio::test]
async fn test_redirect_trailing_slash() {
    let server = common::create_http_test_server(common::seeded_store(1));

    let response = server.get("/id000/").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_redirect_percent_encodes_non_ascii() {
    let server = common::create_test_server(common::empty_store());

    let created = server
        .post("/api/shorten")
        .json(&serde_json::json!({ "url": "https://example.com/café" }))
        .await
        .json::<serde_json::Value>();
    let short_id = created["shortId"].as_str().unwrap();

    let response = server.get(&format!("/{short_id}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/caf%C3%A9");
}
