use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::net::{IpAddr, SocketAddr};

pub const FORWARDED_FOR: &str = "x-forwarded-for";
pub const REAL_IP: &str = "x-real-ip";
pub const USER_ID: &str = "x-user-id";

// first X-Forwarded-For hop, then X-Real-IP, then the TCP peer
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    headers
        .get(REAL_IP)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer_ip(peer).to_string())
}

fn peer_ip(peer: SocketAddr) -> IpAddr {
    match peer.ip() {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

pub fn user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn ip_key(ip: &str) -> String {
    format!("ip:{ip}")
}

pub fn scoped_key(scope: &str, user_id: &str) -> String {
    format!("{scope}:{user_id}")
}

// short digest for log lines, raw addresses and user ids stay out of logs
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "192.168.1.100:54321".parse().unwrap()
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1, 10.0.0.2"),
        );
        headers.insert(REAL_IP, HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, peer()), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static(""));
        headers.insert(REAL_IP, HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, peer()), "198.51.100.1");

        assert_eq!(client_ip(&HeaderMap::new(), peer()), "192.168.1.100");
    }

    #[test]
    fn ipv4_mapped_peer_is_unwrapped() {
        let peer: SocketAddr = "[::ffff:127.0.0.1]:8080".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), peer), "127.0.0.1");
    }

    #[test]
    fn blank_user_id_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID, HeaderValue::from_static("   "));
        assert_eq!(user_id(&headers), None);

        headers.insert(USER_ID, HeaderValue::from_static("user_42"));
        assert_eq!(user_id(&headers).as_deref(), Some("user_42"));
    }

    #[test]
    fn key_shapes() {
        assert_eq!(ip_key("1.2.3.4"), "ip:1.2.3.4");
        assert_eq!(scoped_key("free-tool", "u1"), "free-tool:u1");
    }

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = fingerprint("ip:1.2.3.4");
        assert_eq!(a.len(), 12);
        assert_eq!(a, fingerprint("ip:1.2.3.4"));
        assert_ne!(a, fingerprint("ip:1.2.3.5"));
    }
}
