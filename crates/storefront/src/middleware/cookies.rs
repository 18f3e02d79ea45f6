//! Read-only access to request cookies.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tower_sessions::cookie::Cookie;

/// Cookies sent with the request, by name. Malformed pairs are skipped.
#[derive(Debug, Default, Clone)]
pub struct RequestCookies(HashMap<String, String>);

impl RequestCookies {
    /// Parse every `Cookie` header of a request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookies = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        Self(cookies)
    }

    /// Value of cookie `name`, if sent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<S> FromRequestParts<S> for RequestCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_parses_multiple_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("tb_session=abc; tb_cart_attic=eyJ9; junk"),
        );

        let cookies = RequestCookies::from_headers(&headers);
        assert_eq!(cookies.get("tb_session"), Some("abc"));
        assert_eq!(cookies.get("tb_cart_attic"), Some("eyJ9"));
        assert_eq!(cookies.get("missing"), None);
    }
}
