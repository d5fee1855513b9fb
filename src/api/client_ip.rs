use std::net::IpAddr;

use axum::http::HeaderMap;

/// Identity used when neither proxy headers nor a peer address are available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the rate-limit key for a request.
///
/// Priority: `cf-connecting-ip`, `true-client-ip`, the first
/// `x-forwarded-for` entry, the transport peer, then [`UNKNOWN_CLIENT`].
/// Blank header values are skipped.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(ip) = header_value(headers, "cf-connecting-ip") {
        return ip.to_string();
    }
    if let Some(ip) = header_value(headers, "true-client-ip") {
        return ip.to_string();
    }
    if let Some(first) = header_value(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return first.to_string();
    }
    match peer {
        Some(ip) => ip.to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(k, v) in pairs {
            map.insert(k, HeaderValue::from_static(v));
        }
        map
    }

    fn peer() -> Option<IpAddr> {
        Some("10.0.0.9".parse().unwrap())
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let h = headers(&[
            ("cf-connecting-ip", " 203.0.113.7 "),
            ("true-client-ip", "198.51.100.1"),
            ("x-forwarded-for", "192.0.2.1"),
        ]);
        assert_eq!(resolve_client_ip(&h, peer()), "203.0.113.7");
    }

    #[test]
    fn test_true_client_ip_before_forwarded_for() {
        let h = headers(&[
            ("true-client-ip", "198.51.100.1"),
            ("x-forwarded-for", "192.0.2.1"),
        ]);
        assert_eq!(resolve_client_ip(&h, peer()), "198.51.100.1");
    }

    #[test]
    fn test_first_forwarded_for_entry() {
        let h = headers(&[("x-forwarded-for", "192.0.2.1, 10.1.1.1, 10.2.2.2")]);
        assert_eq!(resolve_client_ip(&h, peer()), "192.0.2.1");
    }

    #[test]
    fn test_blank_headers_fall_through_to_peer() {
        let h = headers(&[("cf-connecting-ip", "  "), ("x-forwarded-for", " , 10.1.1.1")]);
        assert_eq!(resolve_client_ip(&h, peer()), "10.0.0.9");
    }

    #[test]
    fn test_unknown_without_peer() {
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), UNKNOWN_CLIENT);
    }
}
