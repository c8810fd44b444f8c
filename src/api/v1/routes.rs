/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 保護が必要な操作は token_gate を route_layer で合成する
 *   (公開 route には掛からない。グローバル登録はしない)
 */
use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::middleware::auth;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    profiles::{
        add_experience, delete_profile, get_my_profile, get_profile_by_user, list_profiles,
        upsert_profile,
    },
};

pub fn routes(state: AppState) -> Router<AppState> {
    // Each protected operation is the gate composed with its handler; the
    // same path can still expose public methods (GET /profiles).
    let protected = Router::new()
        .route(
            "/profiles",
            axum::routing::post(upsert_profile).delete(delete_profile),
        )
        .route("/profiles/me", get(get_my_profile))
        .route("/profiles/experience", put(add_experience))
        .route_layer(middleware::from_fn_with_state(state, auth::token_gate));

    Router::new()
        .route("/health", get(health))
        .route("/profiles", get(list_profiles))
        .route("/profiles/user/{user_id}", get(get_profile_by_user))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::middleware::auth::TOKEN_HEADER;
    use crate::repos::mem::MemStore;
    use crate::services::auth::TokenVerifier;
    use crate::services::auth::token::issue;
    use crate::state::AppState;

    const SECRET: &str = "test-secret";
    const FAR_FUTURE: u64 = 4102444800; // 2100-01-01

    fn test_app() -> (Router, Arc<MemStore>) {
        let store = Arc::new(MemStore::new());
        let auth = Arc::new(TokenVerifier::new(SECRET, 0));
        let state = AppState::new(store.clone(), auth);
        let app = routes(state.clone()).with_state(state);
        (app, store)
    }

    fn token_for(user_id: Uuid) -> String {
        issue(SECRET, &user_id.to_string(), FAR_FUTURE)
    }

    fn request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected_without_touching_the_store() {
        let (app, store) = test_app();

        let response = app
            .oneshot(request(
                "POST",
                "/profiles",
                None,
                Some(serde_json::json!({"status": "Dev", "skills": "rust"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No token, authorization denied");
        assert_eq!(store.op_count(), 0);
    }

    #[tokio::test]
    async fn undecodable_token_is_rejected() {
        let (app, store) = test_app();

        let response = app
            .oneshot(request("GET", "/profiles/me", Some("not-a-jwt"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Token is not valid");
        assert_eq!(store.op_count(), 0);
    }

    #[tokio::test]
    async fn valid_token_for_unknown_identity_verifies_but_profile_is_missing() {
        let (app, _store) = test_app();
        let token = token_for(Uuid::new_v4());

        let response = app
            .oneshot(request("GET", "/profiles/me", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "There is no profile for this user");
    }

    #[tokio::test]
    async fn first_post_creates_a_profile_with_parsed_skills() {
        let (app, store) = test_app();
        let user_id = Uuid::new_v4();
        store.add_user(user_id, "Dev One", Some("avatar.png"));
        let token = token_for(user_id);

        let response = app
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({"status": "s", "skills": "a, b ,c"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "s");
        assert_eq!(body["skills"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(body["owner"]["name"], "Dev One");
        assert_eq!(body["owner"]["avatar"], "avatar.png");
    }

    #[tokio::test]
    async fn second_post_updates_in_place_and_keeps_omitted_fields() {
        let (app, _store) = test_app();
        let user_id = Uuid::new_v4();
        let token = token_for(user_id);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({
                    "status": "Dev", "skills": "rust", "company": "Acme"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({
                    "status": "Dev", "skills": "rust", "website": "https://example.com"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["company"], "Acme");
        assert_eq!(body["website"], "https://example.com");

        // Still a single profile.
        let response = app
            .oneshot(request("GET", "/profiles", None, None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validation_violations_are_reported_together() {
        let (app, _store) = test_app();
        let token = token_for(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({"status": "", "skills": " , "})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "status");
        assert_eq!(errors[1]["field"], "skills");
    }

    #[tokio::test]
    async fn listing_profiles_requires_no_token() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(request("GET", "/profiles", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn malformed_owner_id_in_path_is_not_found_not_server_error() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(request("GET", "/profiles/user/not-a-uuid", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Profile not found.");
    }

    #[tokio::test]
    async fn experience_entries_come_back_most_recent_first() {
        let (app, _store) = test_app();
        let user_id = Uuid::new_v4();
        let token = token_for(user_id);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({"status": "Dev", "skills": "rust"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        for title in ["first", "second"] {
            let response = app
                .clone()
                .oneshot(request(
                    "PUT",
                    "/profiles/experience",
                    Some(&token),
                    Some(serde_json::json!({
                        "title": title, "company": "Acme", "from": "2020-01-01"
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(request("GET", "/profiles/me", Some(&token), None))
            .await
            .unwrap();
        let body = body_json(response).await;
        let titles: Vec<_> = body["experience"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn experience_without_a_profile_is_rejected() {
        let (app, _store) = test_app();
        let token = token_for(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "PUT",
                "/profiles/experience",
                Some(&token),
                Some(serde_json::json!({
                    "title": "Engineer", "company": "Acme", "from": "2020-01-01"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "There is no profile for this user");
    }

    #[tokio::test]
    async fn experience_validation_reports_every_missing_field() {
        let (app, _store) = test_app();
        let token = token_for(Uuid::new_v4());

        let response = app
            .oneshot(request(
                "PUT",
                "/profiles/experience",
                Some(&token),
                Some(serde_json::json!({"location": "Remote"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_profile_and_account_and_responds() {
        let (app, store) = test_app();
        let user_id = Uuid::new_v4();
        store.add_user(user_id, "Dev One", None);
        let token = token_for(user_id);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/profiles",
                Some(&token),
                Some(serde_json::json!({"status": "Dev", "skills": "rust"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("DELETE", "/profiles", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!store.has_user(user_id));

        let response = app
            .oneshot(request("GET", "/profiles/me", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
