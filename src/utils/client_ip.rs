//! Client identity extraction from the connection and forwarding headers.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client IP used as the unique-visitor identity.
///
/// With `behind_proxy` set, the `X-Forwarded-For` header is consulted first
/// (leftmost entry), then `X-Real-IP`, falling back to the socket peer
/// address. Without it the peer address is authoritative, since forwarding
/// headers are caller-controlled and would let anyone inflate the
/// unique-visitor set.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }

        if let Some(real_ip) = header_str(headers, "x-real-ip") {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return real_ip.to_string();
            }
        }
    }

    peer.ip().to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "127.0.0.1:9999".parse().unwrap()
    }

    #[test]
    fn test_peer_address_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));

        // Forwarding headers are ignored unless the proxy flag is set.
        assert_eq!(client_ip(&headers, peer(), false), "127.0.0.1");
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 10.0.0.1"),
        );

        assert_eq!(client_ip(&headers, peer(), true), "1.2.3.4");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));

        assert_eq!(client_ip(&headers, peer(), true), "5.6.7.8");
    }

    #[test]
    fn test_peer_fallback_when_headers_missing() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), true), "127.0.0.1");
    }

    #[test]
    fn test_empty_forwarded_header_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" "));
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));

        assert_eq!(client_ip(&headers, peer(), true), "5.6.7.8");
    }
}
