use crate::data_structures::ID;
use crate::store::{KvStore, Namespace, Record};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest word from a tracker about a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeData {
    Success {
        complete: u64,
        downloaded: u64,
        incomplete: u64,
        name: Option<String>,
    },
    Failure {
        reason: String,
    },
}

impl ScrapeData {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }
}

/// Tracker authority -> latest statistics.
pub type TrackerStats = HashMap<String, ScrapeData>;

/// Per tracker statistics of every torrent, persisted in the `statistics`
/// namespace. Entries are replaced wholesale, never merged.
pub struct StatisticsLedger {
    records: Namespace<Record<TrackerStats>>,
}

impl StatisticsLedger {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self {
            records: Namespace::new(store),
        }
    }

    pub async fn get(&self, info_hash: &ID) -> Result<TrackerStats> {
        Ok(self
            .records
            .get(info_hash)
            .await?
            .and_then(Record::loaded)
            .unwrap_or_default())
    }

    pub async fn replace(&self, info_hash: &ID, authority: &str, data: ScrapeData) -> Result<()> {
        let mut stats = self.get(info_hash).await?;

        stats.insert(authority.to_string(), data);

        self.records.put(info_hash, &Record::Loaded(stats)).await
    }

    pub async fn reset(&self, info_hash: &ID) -> Result<()> {
        self.records
            .put(info_hash, &Record::Loaded(TrackerStats::new()))
            .await
    }

    pub async fn clear(&self, info_hash: &ID) -> Result<()> {
        self.records.put(info_hash, &Record::Unloaded).await
    }
}
