mod directory;
mod known_peer;
mod known_peers;

pub use directory::PeerDirectory;
pub use known_peer::KnownPeer;
pub use known_peers::KnownPeers;
