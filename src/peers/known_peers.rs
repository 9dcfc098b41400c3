use super::known_peer::KnownPeer;
use serde::{Deserialize, Serialize};

/// Peers of a single torrent, unique by endpoint, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownPeers(Vec<KnownPeer>);

impl KnownPeers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownPeer> {
        self.0.iter()
    }

    /// Overwrite the peer at the same endpoint, or append.
    pub fn upsert(&mut self, peer: KnownPeer) {
        match self.0.iter_mut().find(|known| known.same_endpoint(&peer)) {
            Some(known) => *known = peer,
            None => self.0.push(peer),
        }
    }

    /// Returns whether something was removed.
    pub fn remove(&mut self, ip: &str, port: u16) -> bool {
        let len = self.0.len();
        self.0.retain(|known| !known.is_endpoint(ip, port));

        len != self.0.len()
    }

    pub fn sorted(&self) -> Vec<KnownPeer> {
        let mut rv = self.0.clone();
        // stable, equal ips keep insertion order
        rv.sort_by(|a, b| a.cmp_ip(b));
        rv
    }
}

impl<P> Extend<P> for KnownPeers
where
    P: Into<KnownPeer>,
{
    fn extend<T: IntoIterator<Item = P>>(&mut self, iter: T) {
        for peer in iter {
            self.upsert(peer.into());
        }
    }
}

impl FromIterator<KnownPeer> for KnownPeers {
    fn from_iter<T: IntoIterator<Item = KnownPeer>>(iter: T) -> Self {
        let mut rv = Self::new();
        rv.extend(iter);
        rv
    }
}

#[cfg(test)]
mod tests {
    use super::KnownPeers;
    use crate::peers::KnownPeer;

    #[test]
    fn upsert_by_endpoint() {
        let mut peers = KnownPeers::new();

        peers.extend([
            KnownPeer::new("127.0.0.22", 6887, None),
            KnownPeer::new("127.0.0.21", 6889, None),
        ]);
        peers.extend([KnownPeer::new("127.0.0.22", 6887, Some("abc".to_string()))]);

        assert_eq!(peers.len(), 2);
        assert_eq!(
            peers.iter().next().unwrap().peer_id,
            Some("abc".to_string())
        );
    }

    #[test]
    fn duplicates_in_one_batch_collapse() {
        let peers: KnownPeers = [
            KnownPeer::new("10.0.0.1", 1, Some("first".to_string())),
            KnownPeer::new("10.0.0.1", 1, Some("second".to_string())),
            KnownPeer::new("10.0.0.1", 2, None),
        ]
        .into_iter()
        .collect();

        assert_eq!(peers.len(), 2);
        assert_eq!(
            peers.iter().next().unwrap().peer_id,
            Some("second".to_string())
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let mut peers: KnownPeers = [
            KnownPeer::new("127.0.0.22", 6887, None),
            KnownPeer::new("127.0.0.21", 6889, None),
        ]
        .into_iter()
        .collect();

        assert!(peers.remove("127.0.0.22", 6887));
        assert!(!peers.remove("127.0.0.22", 6887));
        assert!(!peers.remove("127.0.0.21", 1));
        assert_eq!(peers.len(), 1);
    }

    #[test]
    fn sorted_numerically() {
        let peers: KnownPeers = [
            KnownPeer::new("127.0.0.100", 1, None),
            KnownPeer::new("127.0.0.2", 2, None),
            KnownPeer::new("10.0.0.1", 5, None),
            KnownPeer::new("127.0.0.2", 1, None),
        ]
        .into_iter()
        .collect();

        let sorted: Vec<(String, u16)> = peers
            .sorted()
            .into_iter()
            .map(|peer| (peer.ip, peer.port))
            .collect();

        assert_eq!(
            sorted,
            vec![
                ("10.0.0.1".to_string(), 5),
                ("127.0.0.2".to_string(), 2),
                ("127.0.0.2".to_string(), 1),
                ("127.0.0.100".to_string(), 1),
            ]
        );
    }
}
