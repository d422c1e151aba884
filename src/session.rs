//! Per-browser session cookie.
//!
//! Each browser gets its own selection (tab, filter, search, add-form type)
//! and its own toast. The id is minted on first contact and handed back as a
//! cookie; an unknown or malformed cookie is treated as a first contact.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "bookstore_session";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extracted from the request; returning it as part of the response sets the
/// cookie when the id was just minted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    fresh: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_id(headers) {
            Some(id) => Self { id, fresh: false },
            None => Self {
                id: SessionId::random(),
                fresh: true,
            },
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

fn cookie_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|uuid| SessionId(uuid.to_string()))
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.fresh {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id.0);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                res.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn known_cookie_is_reused() {
        let id = SessionId::random();
        let session = Session::from_headers(&headers(&format!(
            "theme=dark; {SESSION_COOKIE}={}",
            id.as_str()
        )));
        assert!(!session.is_fresh());
        assert_eq!(session.id, id);
    }

    #[test]
    fn missing_or_malformed_cookie_mints_new_id() {
        assert!(Session::from_headers(&HeaderMap::new()).is_fresh());
        let session = Session::from_headers(&headers(&format!("{SESSION_COOKIE}=../../admin")));
        assert!(session.is_fresh());
        assert_ne!(session.id.as_str(), "../../admin");
    }

    #[test]
    fn only_fresh_sessions_set_the_cookie() {
        let fresh = Session::from_headers(&HeaderMap::new());
        let id = fresh.id.clone();
        let response = (fresh, "ok").into_response();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={}", id.as_str())));

        let known = Session::from_headers(&headers(&format!("{SESSION_COOKIE}={}", id.as_str())));
        let response = (known, "ok").into_response();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
