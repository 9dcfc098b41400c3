pub mod constants;
pub mod data_structures;
pub mod error;
pub mod macros;
pub mod peers;
pub mod session;
pub mod statistics;
pub mod store;
pub mod tracker;
pub mod transcoding;
pub mod transport;

pub use data_structures::ID;
pub use error::{Error, Result};
pub use peers::KnownPeer;
pub use session::TrackerSession;
pub use statistics::{ScrapeData, TrackerStats};
pub use tracker::{AnnounceEvent, AnnounceTiers, ClientIdentity};
pub use transport::{HttpTransport, Transport};
