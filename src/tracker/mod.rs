pub mod announce;
pub mod endpoint;
pub mod peer_id;
pub mod response;
pub mod scrape;
mod tiers;

pub use announce::AnnounceEvent;
pub use peer_id::ClientIdentity;
pub use tiers::AnnounceTiers;
