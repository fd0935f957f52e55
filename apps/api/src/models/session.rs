//! Per-request identity, carried in headers set by the browser client.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::user::{local_part, User};

pub const EMAIL_HEADER: &str = "x-user-email";
pub const NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: String,
    pub name: String,
}

impl Session {
    pub fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: local_part(email).to_string(),
        }
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let email = header(EMAIL_HEADER)?;
        let mut session = Self::for_email(email);
        if let Some(name) = header(NAME_HEADER) {
            session.name = name.to_string();
        }
        Some(session)
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Rejects when no email header is present. Take `Option<Session>` where a
/// session is optional.
#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
            .ok_or_else(|| AppError::Validation(format!("Missing {EMAIL_HEADER} header")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("hr@acme.io"));
        assert_eq!(
            Session::from_headers(&headers),
            Some(Session {
                email: "hr@acme.io".to_string(),
                name: "hr".to_string()
            })
        );

        headers.insert(NAME_HEADER, HeaderValue::from_static("Acme HR"));
        assert_eq!(Session::from_headers(&headers).unwrap().name, "Acme HR");
    }

    #[test]
    fn test_blank_email_header_is_no_session() {
        let mut headers = HeaderMap::new();
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("   "));
        headers.insert(NAME_HEADER, HeaderValue::from_static("Someone"));
        assert_eq!(Session::from_headers(&headers), None);
    }
}
