use super::{KvStore, Namespace, Record};
use crate::data_structures::ID;
use crate::tracker::AnnounceTiers;
use anyhow::Result;

/// Torrent metadata namespace: the announce tiers of every loaded torrent.
pub struct TorrentStore {
    records: Namespace<Record<AnnounceTiers>>,
}

impl TorrentStore {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self {
            records: Namespace::new(store),
        }
    }

    pub async fn record(&self, info_hash: &ID) -> Result<Option<Record<AnnounceTiers>>> {
        self.records.get(info_hash).await
    }

    /// Tiers of a currently loaded torrent.
    pub async fn loaded(&self, info_hash: &ID) -> Result<Option<AnnounceTiers>> {
        Ok(self.record(info_hash).await?.and_then(Record::loaded))
    }

    pub async fn set_loaded(&self, info_hash: &ID, tiers: &AnnounceTiers) -> Result<()> {
        self.records
            .put(info_hash, &Record::Loaded(tiers.to_owned()))
            .await
    }

    pub async fn mark_unloaded(&self, info_hash: &ID) -> Result<()> {
        self.records.put(info_hash, &Record::Unloaded).await
    }
}

#[cfg(test)]
mod tests {
    use super::TorrentStore;
    use crate::data_structures::ID;
    use crate::store::{MemoryStore, Record};
    use crate::tracker::AnnounceTiers;

    #[tokio::test]
    async fn lifecycle() {
        let torrents = TorrentStore::new(Box::new(MemoryStore::new()));
        let id = ID::new(rand::random());
        let tiers = AnnounceTiers::build(Some("http://a/announce".to_string()), None).unwrap();

        assert_eq!(torrents.record(&id).await.unwrap(), None);

        torrents.set_loaded(&id, &tiers).await.unwrap();
        assert_eq!(torrents.loaded(&id).await.unwrap(), Some(tiers.clone()));

        torrents.mark_unloaded(&id).await.unwrap();
        assert_eq!(torrents.record(&id).await.unwrap(), Some(Record::Unloaded));
        assert_eq!(torrents.loaded(&id).await.unwrap(), None);
    }
}
