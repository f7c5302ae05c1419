//! Security response headers.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
};
use shiftedblog_common::config::SecurityConfig;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

/// Headers sent on every response.
///
/// Fixed headers first, then the configured policies that are not empty.
#[must_use]
pub fn security_headers(config: &SecurityConfig) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
    ];

    let policies = [
        (header::CONTENT_SECURITY_POLICY, &config.content_security_policy),
        (header::REFERRER_POLICY, &config.referrer_policy),
        (
            HeaderName::from_static("permissions-policy"),
            &config.permissions_policy,
        ),
    ];

    for (name, policy) in policies {
        if policy.is_empty() {
            continue;
        }
        match HeaderValue::from_str(policy) {
            Ok(value) => headers.push((name, value)),
            Err(e) => warn!(header = %name, error = %e, "Skipping invalid security header"),
        }
    }

    headers
}

/// Add the security headers to every response of `router`.
///
/// Handlers that set one of these headers themselves keep their value.
pub fn with_security_headers<S>(mut router: Router<S>, config: &SecurityConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    for (name, value) in security_headers(config) {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_policies_are_not_sent() {
        let headers = security_headers(&SecurityConfig::default());
        let names: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["x-content-type-options", "x-frame-options"]);
    }

    #[test]
    fn test_configured_policies_are_sent_verbatim() {
        let config = SecurityConfig {
            content_security_policy: "default-src 'self'".to_string(),
            referrer_policy: String::new(),
            permissions_policy: "camera=()".to_string(),
        };

        let headers = security_headers(&config);
        assert!(headers.contains(&(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'self'")
        )));
        assert!(headers.contains(&(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=()")
        )));
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_invalid_policy_is_skipped() {
        let config = SecurityConfig {
            content_security_policy: "bad\nvalue".to_string(),
            ..SecurityConfig::default()
        };
        assert_eq!(security_headers(&config).len(), 2);
    }
}
