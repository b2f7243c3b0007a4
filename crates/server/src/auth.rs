use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use parlor_core::wire::BEARER_PREFIX;
use parlor_core::ApplicationError;
use secrecy::{ExposeSecret, SecretString};

use crate::api::ApiError;

#[derive(Clone)]
pub struct AuthState {
    bearer_token: Arc<SecretString>,
}

impl AuthState {
    pub fn new(bearer_token: SecretString) -> Self {
        Self { bearer_token: Arc::new(bearer_token) }
    }

    fn accepts(&self, presented: &str) -> bool {
        constant_time_eq(presented.as_bytes(), self.bearer_token.expose_secret().as_bytes())
    }
}

pub async fn require_bearer(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = extract_bearer(request.headers()).is_some_and(|token| state.accepts(token));
    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(
        event_name = "api.auth.rejected",
        method = %request.method(),
        path = %request.uri().path(),
        "request rejected: missing or invalid bearer credential"
    );
    ApiError::from(ApplicationError::Unauthorized).into_response()
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter().zip(right).fold(0u8, |diff, (a, b)| diff | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    use super::{constant_time_eq, extract_bearer, AuthState};

    #[test]
    fn bearer_is_extracted_from_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer scoop-secret"));
        assert_eq!(extract_bearer(&headers), Some("scoop-secret"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic c2Nvb3A="));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn only_the_configured_secret_is_accepted() {
        let state = AuthState::new("scoop-secret".to_string().into());
        assert!(state.accepts("scoop-secret"));
        assert!(!state.accepts("scoop-secreT"));
        assert!(!state.accepts("scoop"));
        assert!(constant_time_eq(b"", b""));
    }
}
