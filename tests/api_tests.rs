mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{mint_token, seed_post, seed_user, test_state};
use serde_json::{json, Value};
use snapfeed::app;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_is_public() {
    let (state, _dir) = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn feed_requires_authentication() {
    let (state, _dir) = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn garbage_token_is_treated_as_unauthenticated() {
    let (state, _dir) = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn like_toggle_over_http() {
    let (state, _dir) = test_state().await;
    let user = seed_user(&state, "ana@example.com", "Ana").await;
    let post = seed_post(&state, &user.id, "hello world").await;
    let token = mint_token("ana@example.com", "Ana");

    let uri = format!("/api/posts/{}/like", post.id);

    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["like_count"], 1);

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["like_count"], 0);
}

#[tokio::test]
async fn comment_crud_over_http() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let post = seed_post(&state, &ana.id, "talk to me").await;
    seed_user(&state, "ben@example.com", "Ben").await;
    let ana_token = mint_token("ana@example.com", "Ana");
    let ben_token = mint_token("ben@example.com", "Ben");

    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments")
                .header(header::AUTHORIZATION, format!("Bearer {}", ana_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"post_id": post.id, "content": "first"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let comment_id = body["data"]["id"].as_str().unwrap().to_string();

    // Another user must not be able to edit it
    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/comments/{}", comment_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", ben_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"content": "mine now"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTHORIZATION_ERROR");

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/comments/{}", comment_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", ana_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"content": "first, edited"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["edited"], true);
    assert_eq!(body["data"]["content"], "first, edited");
}

#[tokio::test]
async fn missing_post_returns_not_found() {
    let (state, _dir) = test_state().await;
    seed_user(&state, "ana@example.com", "Ana").await;
    let token = mint_token("ana@example.com", "Ana");

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/posts/no-such-post")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn search_over_http() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    seed_post(&state, &ana.id, "sunset over the bay").await;
    let token = mint_token("ana@example.com", "Ana");

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/search?q=sunset&type=posts")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 1);
    assert!(body["data"]["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn own_profile_round_trip_over_http() {
    let (state, _dir) = test_state().await;
    seed_user(&state, "ana@example.com", "Ana").await;
    let token = mint_token("ana@example.com", "Ana");

    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/users/me/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"bio": "street photographer", "interests": ["photo"]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["user"]["profile"]["bio"],
        "street photographer"
    );
}
