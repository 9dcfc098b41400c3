pub const ID_LEN: usize = 20;

pub const DEFAULT_PORT: u16 = 6885;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const PEER_ID_PREFIX: &str = "-CS1000-";
pub const PEER_ID_HASH_CHARS: usize = 6;
pub const PEER_ID_RANDOM_CHARS: usize = 6;

pub const CONNECTION_FAILURE: &str = "Connection Failure";
pub const UNSPECIFIED_FAILURE: &str = "not specified";

pub const TORRENTS_NAMESPACE: &str = "torrents";
pub const PEERS_NAMESPACE: &str = "peers";
pub const STATISTICS_NAMESPACE: &str = "statistics";
