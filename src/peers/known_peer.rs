use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

/// A peer some tracker told us about. Two peers are the same endpoint when
/// `ip` and `port` match; `peer_id` is whatever the tracker last reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnownPeer {
    pub ip: String,
    pub port: u16,
    pub peer_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum IpOrder<'a> {
    Numeric(u32),
    Text(&'a str),
}

impl KnownPeer {
    pub fn new(ip: impl Into<String>, port: u16, peer_id: Option<String>) -> Self {
        Self {
            ip: ip.into(),
            port,
            peer_id,
        }
    }

    pub fn is_endpoint(&self, ip: &str, port: u16) -> bool {
        self.ip == ip && self.port == port
    }

    pub fn same_endpoint(&self, other: &KnownPeer) -> bool {
        self.is_endpoint(&other.ip, other.port)
    }

    fn ip_order(&self) -> IpOrder<'_> {
        match self.ip.parse::<Ipv4Addr>() {
            Ok(ip) => IpOrder::Numeric(u32::from(ip)),
            Err(_) => IpOrder::Text(&self.ip),
        }
    }

    /// Numeric order of the IPv4 address (`10.0.0.2` < `10.0.0.100`).
    /// Addresses that aren't dotted quads go last, by text.
    pub fn cmp_ip(&self, other: &KnownPeer) -> Ordering {
        self.ip_order().cmp(&other.ip_order())
    }
}

impl From<SocketAddrV4> for KnownPeer {
    fn from(value: SocketAddrV4) -> Self {
        Self::new(value.ip().to_string(), value.port(), None)
    }
}

impl fmt::Display for KnownPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.peer_id {
            Some(peer_id) => write!(f, "{}:{} ({})", self.ip, self.port, peer_id),
            None => write!(f, "{}:{}", self.ip, self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KnownPeer;
    use std::cmp::Ordering;
    use std::net::{Ipv4Addr, SocketAddrV4};

    #[test]
    fn numeric_ip_order() {
        let low = KnownPeer::new("127.0.0.2", 1, None);
        let high = KnownPeer::new("127.0.0.100", 1, None);

        assert_eq!(low.cmp_ip(&high), Ordering::Less);
        assert_eq!(high.cmp_ip(&low), Ordering::Greater);

        let a = KnownPeer::new("9.255.255.255", 1, None);
        let b = KnownPeer::new("10.0.0.0", 1, None);
        assert_eq!(a.cmp_ip(&b), Ordering::Less);
    }

    #[test]
    fn text_after_numeric() {
        let numeric = KnownPeer::new("255.255.255.255", 1, None);
        let host = KnownPeer::new("peer.example.com", 1, None);

        assert_eq!(numeric.cmp_ip(&host), Ordering::Less);
    }

    #[test]
    fn endpoint_identity_ignores_peer_id() {
        let a = KnownPeer::new("127.0.0.22", 6887, Some("a".to_string()));
        let b = KnownPeer::new("127.0.0.22", 6887, None);
        let c = KnownPeer::new("127.0.0.22", 6888, None);

        assert!(a.same_endpoint(&b));
        assert!(!a.same_endpoint(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn from_socketaddr() {
        let peer: KnownPeer = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 22), 6887).into();

        assert_eq!(peer, KnownPeer::new("127.0.0.22", 6887, None));
        assert_eq!(peer.to_string(), "127.0.0.22:6887");
    }
}
