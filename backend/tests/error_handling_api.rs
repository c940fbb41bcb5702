use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatekeeper_backend::error::AppError;
use gatekeeper_backend::repositories::auth::RepositoryError;
use gatekeeper_backend::services::auth::AuthError;

async fn response_parts(err: AuthError) -> (StatusCode, serde_json::Value) {
    let response: Response = AppError::from(err).into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn every_authentication_kind_maps_to_the_same_401_shape() {
    let kinds = [
        AuthError::InvalidCredentials,
        AuthError::InvalidSession,
        AuthError::SessionExpired,
        AuthError::InvalidAccessToken,
        AuthError::Blocked,
    ];

    let mut bodies = Vec::new();
    for kind in kinds {
        let (status, body) = response_parts(kind).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }

    // Indistinguishability: a caller cannot tell which check failed.
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn validation_failures_name_the_rule() {
    let (status, body) =
        response_parts(AuthError::Validation("password_too_short".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["errors"][0], "password_too_short");
}

#[tokio::test]
async fn duplicate_registration_maps_to_conflict() {
    let (status, body) = response_parts(AuthError::Conflict).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn storage_failures_stay_generic() {
    let err = AuthError::Repository(RepositoryError::Database(sqlx::Error::PoolClosed));
    let (status, body) = response_parts(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("details").is_none() || body["details"].is_null());
}
