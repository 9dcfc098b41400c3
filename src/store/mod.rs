mod file;
mod memory;
mod torrents;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use torrents::TorrentStore;

use crate::data_structures::ID;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// Byte store backing one logical namespace.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    async fn write(&self, key: &[u8], value: &[u8]) -> Result<()>;
}

/// Per torrent state as persisted. `Unloaded` survives an unload so that
/// "unloaded" and "never loaded" (no record) stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record<T> {
    Unloaded,
    Loaded(T),
}

impl<T> Record<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            Record::Loaded(value) => Some(value),
            Record::Unloaded => None,
        }
    }
}

/// bincode-serialized `T` values keyed by infohash.
pub struct Namespace<T> {
    store: Box<dyn KvStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Namespace<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, info_hash: &ID) -> Result<Option<T>> {
        match self.store.read(info_hash.as_byte_ref()).await? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, info_hash: &ID, value: &T) -> Result<()> {
        let encoded = bincode::serialize(value)?;

        self.store.write(info_hash.as_byte_ref(), &encoded).await
    }
}
