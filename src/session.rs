use crate::constants::{
    CONNECTION_FAILURE, PEERS_NAMESPACE, STATISTICS_NAMESPACE, TORRENTS_NAMESPACE,
};
use crate::data_structures::ID;
use crate::error::{Error, Result};
use crate::peers::{KnownPeer, PeerDirectory};
use crate::statistics::{ScrapeData, StatisticsLedger, TrackerStats};
use crate::store::{FileStore, MemoryStore, Record, TorrentStore};
use crate::tracker::announce::Announce;
use crate::tracker::endpoint::{authority, scrape_url};
use crate::tracker::response::{from_response_bytes, AnnounceSuccess, Response, ScrapeResponse};
use crate::tracker::scrape::Scrape;
use crate::tracker::{AnnounceEvent, AnnounceTiers, ClientIdentity};
use crate::transcoding::metainfo::Metainfo;
use crate::transport::Transport;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument, trace, warn};

type LockMap = StdMutex<HashMap<ID, Arc<Mutex<()>>>>;

/// Held for the duration of one command on an infohash. The map entry goes
/// away with the last holder.
struct InfohashLock<'a> {
    locks: &'a LockMap,
    info_hash: ID,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for InfohashLock<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        // the map and our guard, nobody else is waiting
        if locks
            .get(&self.info_hash)
            .map_or(false, |lock| Arc::strong_count(lock) <= 2)
        {
            locks.remove(&self.info_hash);
        }
    }
}

/// Tracker side of every loaded torrent: lifecycle, announce failover over
/// the tiers, scrape, and the peers and statistics trackers report.
///
/// Commands on one infohash are serialized, different infohashes never wait
/// on each other.
pub struct TrackerSession {
    torrents: TorrentStore,
    peers: PeerDirectory,
    statistics: StatisticsLedger,
    transport: Box<dyn Transport>,
    identity: ClientIdentity,
    locks: LockMap,
}

impl TrackerSession {
    pub fn new(
        torrents: TorrentStore,
        peers: PeerDirectory,
        statistics: StatisticsLedger,
        transport: Box<dyn Transport>,
        identity: ClientIdentity,
    ) -> Self {
        Self {
            torrents,
            peers,
            statistics,
            transport,
            identity,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// All three namespaces as directories under `base_dir`.
    pub async fn open(
        base_dir: impl AsRef<Path>,
        transport: Box<dyn Transport>,
        identity: ClientIdentity,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref();

        Ok(Self::new(
            TorrentStore::new(Box::new(FileStore::open(base_dir, TORRENTS_NAMESPACE).await?)),
            PeerDirectory::new(Box::new(FileStore::open(base_dir, PEERS_NAMESPACE).await?)),
            StatisticsLedger::new(Box::new(
                FileStore::open(base_dir, STATISTICS_NAMESPACE).await?,
            )),
            transport,
            identity,
        ))
    }

    pub fn in_memory(transport: Box<dyn Transport>, identity: ClientIdentity) -> Self {
        Self::new(
            TorrentStore::new(Box::new(MemoryStore::new())),
            PeerDirectory::new(Box::new(MemoryStore::new())),
            StatisticsLedger::new(Box::new(MemoryStore::new())),
            transport,
            identity,
        )
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    async fn lock(&self, info_hash: &ID) -> InfohashLock<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(*info_hash).or_default().clone()
        };

        InfohashLock {
            locks: &self.locks,
            info_hash: *info_hash,
            _guard: lock.lock_owned().await,
        }
    }

    async fn loaded_tiers(&self, info_hash: &ID) -> Result<AnnounceTiers> {
        self.torrents
            .loaded(info_hash)
            .await?
            .ok_or(Error::NotLoaded(*info_hash))
    }

    /// Infohash of a metainfo file, nothing is loaded.
    pub fn infohash(&self, metainfo: &[u8]) -> Result<ID> {
        Ok(Metainfo::from_bytes(metainfo)?.info_hash)
    }

    /// Start tracking a torrent. Reloading an unloaded torrent starts over with
    /// no peers and no statistics.
    #[instrument(skip_all)]
    pub async fn load(&self, metainfo: &[u8]) -> Result<ID> {
        let metainfo = Metainfo::from_bytes(metainfo)?;
        let info_hash = metainfo.info_hash;
        let tiers = metainfo.tiers()?;

        let _lock = self.lock(&info_hash).await;

        if let Some(Record::Loaded(_)) = self.torrents.record(&info_hash).await? {
            return Err(Error::AlreadyLoaded(info_hash));
        }

        self.torrents.set_loaded(&info_hash, &tiers).await?;
        self.peers.reset(&info_hash).await?;
        self.statistics.reset(&info_hash).await?;

        debug!("loaded {info_hash} with {} tiers", tiers.len());
        Ok(info_hash)
    }

    #[instrument(skip(self), fields(%info_hash))]
    pub async fn unload(&self, info_hash: &ID) -> Result<()> {
        let _lock = self.lock(info_hash).await;

        self.loaded_tiers(info_hash).await?;

        self.torrents.mark_unloaded(info_hash).await?;
        self.peers.clear(info_hash).await?;
        self.statistics.clear(info_hash).await?;

        debug!("unloaded");
        Ok(())
    }

    /// Current tiers, in the order the next announce would walk them.
    pub async fn announces(&self, info_hash: &ID) -> Result<AnnounceTiers> {
        let _lock = self.lock(info_hash).await;

        self.loaded_tiers(info_hash).await
    }

    /// Walk the tiers until one tracker accepts the announce and return the
    /// interval it asked for. Fails with the last failure seen when none does.
    #[instrument(skip(self), fields(%info_hash))]
    pub async fn announce(
        &self,
        info_hash: &ID,
        event: AnnounceEvent,
        uploaded: u64,
        downloaded: u64,
        left: u64,
    ) -> Result<u64> {
        let _lock = self.lock(info_hash).await;

        let mut tiers = self.loaded_tiers(info_hash).await?;
        if event == AnnounceEvent::Started {
            tiers.shuffle_for_start(&mut rand::thread_rng());
        }

        let mut last_failure = None;
        let mut accepted = None;

        for (tier_idx, tracker_url) in tiers.urls() {
            let announce = Announce {
                tracker_url,
                info_hash,
                peer_id: &self.identity.peer_id,
                port: self.identity.port,
                uploaded,
                downloaded,
                left,
                compact: true,
                event,
            };
            let url = announce.as_url();
            trace!("announce: {url}");

            let bytes = match self.transport.get(&url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(tracker_url, ?e, "tracker unreachable");
                    last_failure = Some(CONNECTION_FAILURE.to_string());
                    continue;
                }
            };

            match from_response_bytes::<Response>(&bytes) {
                Ok(Response::Success(success)) => {
                    accepted = Some((tier_idx, tracker_url.to_string(), success));
                    break;
                }
                Ok(Response::Failure(reason)) => {
                    warn!(tracker_url, %reason, "announce refused");
                    last_failure = Some(reason);
                }
                Err(e) => {
                    warn!(tracker_url, ?e, "undecodable announce response");
                    last_failure = Some(e.to_string());
                }
            }
        }

        let recorded = match accepted {
            Some((tier_idx, tracker_url, success)) => {
                tiers.promote(tier_idx, &tracker_url);
                Some(self.record_success(info_hash, &tracker_url, success).await)
            }
            None => None,
        };

        // tiers are kept even when recording the answer failed
        self.torrents.set_loaded(info_hash, &tiers).await?;

        match recorded {
            Some(interval) => interval,
            None => Err(Error::TrackerFailure(
                last_failure.unwrap_or_else(|| CONNECTION_FAILURE.to_string()),
            )),
        }
    }

    async fn record_success(
        &self,
        info_hash: &ID,
        tracker_url: &str,
        success: AnnounceSuccess,
    ) -> Result<u64> {
        if let Some(warning) = &success.warning_message {
            warn!(tracker_url, %warning, "tracker warning");
        }
        if let Some(min_interval) = success.min_interval {
            debug!(tracker_url, min_interval);
        }
        debug!(
            tracker_url,
            interval = success.interval,
            peers = success.peers.len(),
            "announce accepted"
        );

        let scrape_data = success.scrape_data();
        self.peers.add_or_update(info_hash, success.peers).await?;
        self.statistics
            .replace(info_hash, &authority(tracker_url), scrape_data)
            .await?;

        Ok(success.interval)
    }

    /// Ask every tracker of every tier for statistics. Unreachable or refusing
    /// trackers are recorded as failures, only an undecodable answer is an error.
    #[instrument(skip(self), fields(%info_hash))]
    pub async fn scrape(&self, info_hash: &ID) -> Result<()> {
        let _lock = self.lock(info_hash).await;

        let tiers = self.loaded_tiers(info_hash).await?;

        for (_, tracker_url) in tiers.urls() {
            let scrape_base = scrape_url(tracker_url);
            let url = Scrape {
                scrape_url: &scrape_base,
                info_hash,
            }
            .as_url();
            trace!("scrape: {url}");

            let data = match self.transport.get(&url).await {
                Ok(bytes) => match from_response_bytes::<ScrapeResponse>(&bytes) {
                    Ok(response) => ScrapeData::from(response),
                    Err(e) => {
                        return Err(Error::MalformedResponse {
                            tracker: tracker_url.to_string(),
                            reason: e.to_string(),
                        })
                    }
                },
                Err(e) => {
                    warn!(tracker_url, ?e, "tracker unreachable");
                    ScrapeData::failure(CONNECTION_FAILURE)
                }
            };

            self.statistics
                .replace(info_hash, &authority(tracker_url), data)
                .await?;
        }

        Ok(())
    }

    /// Forget a peer. Unknown peers are ignored.
    #[instrument(skip(self), fields(%info_hash, %peer))]
    pub async fn invalidate_peer(&self, info_hash: &ID, peer: &KnownPeer) -> Result<()> {
        let _lock = self.lock(info_hash).await;

        self.loaded_tiers(info_hash).await?;

        Ok(self.peers.invalidate(info_hash, &peer.ip, peer.port).await?)
    }

    pub async fn known_peers(&self, info_hash: &ID) -> Result<Vec<KnownPeer>> {
        let _lock = self.lock(info_hash).await;

        self.loaded_tiers(info_hash).await?;

        Ok(self.peers.list(info_hash).await?)
    }

    pub async fn tracker_stats(&self, info_hash: &ID) -> Result<TrackerStats> {
        let _lock = self.lock(info_hash).await;

        self.loaded_tiers(info_hash).await?;

        Ok(self.statistics.get(info_hash).await?)
    }
}
