/**
 * Authentication Routes
 * Admin login with base64 credentials, signed-token cookie, verify/logout
 */
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::routes::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

/// Cookie holding the signed admin token.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Admin token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

// ============================================================================
// Types
// ============================================================================

/// Admin token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Admin username
    pub role: String, // Fixed "admin" claim
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    /// base64-encoded `username:password`
    #[serde(default)]
    pub credentials: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Token helpers
// ============================================================================

pub fn create_admin_token(
    username: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        role: "admin".to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims.
pub fn verify_admin_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

// ============================================================================
// Admin guard
// ============================================================================

/// Proof of a verified admin session. The one guard capability every
/// admin-mutating handler depends on: cookie presence, signature, expiry,
/// and the role claim are all checked here and nowhere else.
pub struct AdminUser {
    pub username: String,
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message)),
    )
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ADMIN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| unauthorized("Unauthorized - Please log in"))?;

        let claims = verify_admin_token(&token, &state.config.jwt_secret)
            .map_err(|_| unauthorized("Unauthorized - Invalid token"))?;

        if claims.role != "admin" {
            return Err(unauthorized("Unauthorized - Invalid credentials"));
        }

        Ok(AdminUser { username: claims.sub })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
/// Decode base64 credentials, compare against configured admin values, and
/// set the signed token cookie on success.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let Some(credentials) = payload.credentials.filter(|c| !c.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse {
                success: false,
                message: Some("Credentials are required".to_string()),
            }),
        )
            .into_response();
    };

    let decoded = BASE64
        .decode(&credentials)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    let Some(decoded) = decoded else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse {
                success: false,
                message: Some("Invalid credentials format".to_string()),
            }),
        )
            .into_response();
    };

    let Some((username, password)) = decoded.split_once(':') else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse {
                success: false,
                message: Some("Invalid credentials format".to_string()),
            }),
        )
            .into_response();
    };

    if username != state.config.admin_username || password != state.config.admin_password {
        tracing::warn!("Failed admin login attempt for user '{}'", username);
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: Some("Invalid username or password".to_string()),
            }),
        )
            .into_response();
    }

    let token = match create_admin_token(username, &state.config.jwt_secret) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to create admin token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse {
                    success: false,
                    message: Some("An error occurred during login".to_string()),
                }),
            )
                .into_response();
        }
    };

    let cookie = Cookie::build((ADMIN_COOKIE, token))
        .http_only(true)
        .secure(state.config.is_production())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(TOKEN_TTL_HOURS))
        .build();

    tracing::info!("Successful admin login for user '{}'", username);

    (
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: None,
        }),
    )
        .into_response()
}

/// GET /api/auth/verify
/// 200 when the cookie's token verifies, 401 otherwise.
pub async fn verify(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let Some(cookie) = jar.get(ADMIN_COOKIE) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                valid: false,
                message: Some("No token provided".to_string()),
            }),
        );
    };

    match verify_admin_token(cookie.value(), &state.config.jwt_secret) {
        Ok(_) => (
            StatusCode::OK,
            Json(VerifyResponse {
                valid: true,
                message: None,
            }),
        ),
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(VerifyResponse {
                    valid: false,
                    message: Some("Invalid token".to_string()),
                }),
            )
        }
    }
}

/// POST /api/auth/logout
/// Clears the token cookie; the only revocation mechanism there is.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let removal = Cookie::build((ADMIN_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testutil::test_state;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;

    fn auth_router(state: AppState) -> Router {
        Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/verify", get(verify))
            .route("/api/auth/logout", post(logout))
            .with_state(state)
    }

    async fn post_login(app: Router, credentials: Option<&str>) -> axum::response::Response {
        let body = serde_json::to_vec(&LoginRequest {
            credentials: credentials.map(|c| c.to_string()),
        })
        .unwrap();
        let req = Request::post("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    fn encode_credentials(username: &str, password: &str) -> String {
        BASE64.encode(format!("{username}:{password}"))
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_admin_token("admin", "secret").unwrap();
        let claims = verify_admin_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = create_admin_token("admin", "secret").unwrap();
        assert!(verify_admin_token(&token, "other-secret").is_err());
    }

    #[tokio::test]
    async fn test_login_missing_credentials_returns_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let res = post_login(auth_router(test_state(dir.path())), None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_malformed_base64_returns_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let res = post_login(auth_router(test_state(dir.path())), Some("!!not-base64!!")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_unauthorized_without_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = encode_credentials("admin", "wrongpass");
        let res = post_login(auth_router(test_state(dir.path())), Some(&credentials)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_login_valid_credentials_sets_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = encode_credentials("admin", "password");
        let res = post_login(auth_router(test_state(dir.path())), Some(&credentials)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("admin_token="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_verify_without_cookie_returns_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::get("/api/auth/verify").body(Body::empty()).unwrap();
        let res = auth_router(test_state(dir.path())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_with_issued_token_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let token = create_admin_token("admin", &state.config.jwt_secret).unwrap();

        let req = Request::get("/api/auth/verify")
            .header("cookie", format!("admin_token={token}"))
            .body(Body::empty())
            .unwrap();
        let res = auth_router(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_verify_with_garbage_token_returns_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::get("/api/auth/verify")
            .header("cookie", "admin_token=not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let res = auth_router(test_state(dir.path())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let token = create_admin_token("admin", &state.config.jwt_secret).unwrap();

        // The removal cookie is only emitted when the request carried the
        // session cookie, as a logged-in client's request does.
        let req = Request::post("/api/auth/logout")
            .header("cookie", format!("admin_token={token}"))
            .body(Body::empty())
            .unwrap();
        let res = auth_router(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("admin_token="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
