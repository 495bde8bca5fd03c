//! Session-stored school fallback.
//!
//! The session state is a single cookie holding a school routing key. Login
//! stores the actor's own key; superusers can point it at any school to work
//! inside that school's context.

use axum::http::{HeaderMap, HeaderValue};

pub const SCHOOL_COOKIE: &str = "skolar_school";

/// Read the school routing key from the request's cookies, if present and
/// shaped like a routing key. Anything else is ignored rather than rejected;
/// the session rule is a fallback, not an authority.
pub fn session_routing_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SCHOOL_COOKIE).then(|| value.trim().to_string())
        })
        .find(|v| {
            !v.is_empty()
                && v.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

pub fn set_school_cookie(routing_key: &str) -> HeaderValue {
    // Routing keys are validated at provisioning time, so this cannot fail
    // for keys read back from the registry.
    HeaderValue::from_str(&format!(
        "{SCHOOL_COOKIE}={routing_key}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn clear_school_cookie() -> HeaderValue {
    HeaderValue::from_static("skolar_school=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_reads_school_cookie() {
        let headers = headers_with_cookie("skolar_school=greenwood");
        assert_eq!(session_routing_key(&headers), Some("greenwood".to_string()));
    }

    #[test]
    fn test_reads_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; skolar_school=riverside; lang=en");
        assert_eq!(session_routing_key(&headers), Some("riverside".to_string()));
    }

    #[test]
    fn test_ignores_missing_or_malformed_values() {
        assert_eq!(session_routing_key(&HeaderMap::new()), None);
        assert_eq!(
            session_routing_key(&headers_with_cookie("theme=dark")),
            None
        );
        assert_eq!(
            session_routing_key(&headers_with_cookie("skolar_school=")),
            None
        );
        assert_eq!(
            session_routing_key(&headers_with_cookie("skolar_school=bad value")),
            None
        );
    }
}
