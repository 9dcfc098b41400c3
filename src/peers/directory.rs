use super::{KnownPeer, KnownPeers};
use crate::data_structures::ID;
use crate::store::{KvStore, Namespace, Record};
use anyhow::Result;
use tracing::trace;

/// Known peers of every torrent, persisted in the `peers` namespace.
pub struct PeerDirectory {
    records: Namespace<Record<KnownPeers>>,
}

impl PeerDirectory {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self {
            records: Namespace::new(store),
        }
    }

    // the unload marker reads as an empty directory
    async fn current(&self, info_hash: &ID) -> Result<KnownPeers> {
        Ok(self
            .records
            .get(info_hash)
            .await?
            .and_then(Record::loaded)
            .unwrap_or_default())
    }

    pub async fn add_or_update(&self, info_hash: &ID, peers: Vec<KnownPeer>) -> Result<()> {
        let mut known = self.current(info_hash).await?;
        let before = known.len();

        known.extend(peers);
        trace!("{info_hash}: {} new peers", known.len() - before);

        self.records.put(info_hash, &Record::Loaded(known)).await
    }

    pub async fn invalidate(&self, info_hash: &ID, ip: &str, port: u16) -> Result<()> {
        let mut known = self.current(info_hash).await?;

        if known.remove(ip, port) {
            self.records.put(info_hash, &Record::Loaded(known)).await?;
        }

        Ok(())
    }

    /// Sorted by numeric IPv4 value.
    pub async fn list(&self, info_hash: &ID) -> Result<Vec<KnownPeer>> {
        Ok(self.current(info_hash).await?.sorted())
    }

    pub async fn reset(&self, info_hash: &ID) -> Result<()> {
        self.records
            .put(info_hash, &Record::Loaded(KnownPeers::new()))
            .await
    }

    pub async fn clear(&self, info_hash: &ID) -> Result<()> {
        self.records.put(info_hash, &Record::Unloaded).await
    }
}
