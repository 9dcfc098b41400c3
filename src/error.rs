use crate::data_structures::ID;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Never loaded, or unloaded since.
    #[error("torrent {0} is not loaded")]
    NotLoaded(ID),

    #[error("torrent {0} is already loaded")]
    AlreadyLoaded(ID),

    #[error("invalid metainfo: {0}")]
    InvalidMetainfo(String),

    #[error("invalid infohash: {0}")]
    InvalidInfohash(String),

    /// Every tracker of every tier failed; carries the last failure seen.
    #[error("{0}")]
    TrackerFailure(String),

    #[error("malformed response from {tracker}: {reason}")]
    MalformedResponse { tracker: String, reason: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
