mod config;

use anyhow::Result;
use config::{Command, Config};
use std::time::Duration;
use tracing::{debug, Level};
use tracker_session::store::FileStore;
use tracker_session::{ClientIdentity, HttpTransport, KnownPeer, ScrapeData, TrackerSession};

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new();

    tracing_subscriber::fmt()
        .with_max_level(log_level(config.verbose))
        .init();

    let store_dir = match config.store {
        Some(dir) => dir,
        None => FileStore::default_base_dir()?,
    };
    let identity = ClientIdentity::new(&config.identity, config.port);
    debug!("peer id {}", String::from_utf8_lossy(identity.peer_id.as_byte_ref()));

    let transport = HttpTransport::new(Duration::from_secs(config.timeout))?;
    let session = TrackerSession::open(&store_dir, Box::new(transport), identity).await?;

    match config.command {
        Command::Load { file } => {
            let bytes = tokio::fs::read(&file).await?;
            println!("{}", session.load(&bytes).await?);
        }
        Command::Unload { info_hash } => session.unload(&info_hash).await?,
        Command::Announces { info_hash } => {
            for (idx, tier) in session.announces(&info_hash).await?.iter().enumerate() {
                println!("tier {idx}");
                for url in tier {
                    println!("  {url}");
                }
            }
        }
        Command::Announce {
            info_hash,
            event,
            uploaded,
            downloaded,
            left,
        } => {
            let interval = session
                .announce(&info_hash, event, uploaded, downloaded, left)
                .await?;
            println!("next announce in {interval}s");
        }
        Command::Scrape { info_hash } => session.scrape(&info_hash).await?,
        Command::Peers { info_hash } => {
            for peer in session.known_peers(&info_hash).await? {
                println!("{peer}");
            }
        }
        Command::Invalidate {
            info_hash,
            ip,
            port,
        } => {
            session
                .invalidate_peer(&info_hash, &KnownPeer::new(ip, port, None))
                .await?
        }
        Command::Stats { info_hash } => {
            let mut stats: Vec<_> = session.tracker_stats(&info_hash).await?.into_iter().collect();
            stats.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

            for (authority, data) in stats {
                match data {
                    ScrapeData::Success {
                        complete,
                        downloaded,
                        incomplete,
                        name,
                    } => println!(
                        "{authority}: {complete} seeders, {incomplete} leechers, {downloaded} downloads{}",
                        name.map(|name| format!(" ({name})")).unwrap_or_default()
                    ),
                    ScrapeData::Failure { reason } => println!("{authority}: failed, {reason}"),
                }
            }
        }
    }

    Ok(())
}
