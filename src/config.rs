use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracker_session::constants::{DEFAULT_PORT, DEFAULT_TIMEOUT_SECS};
use tracker_session::{AnnounceEvent, ID};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Config {
    /// state directory, `~/.tracker-session` when not given
    #[clap(short, long, value_parser)]
    pub store: Option<PathBuf>,

    /// port announced to trackers
    #[clap(short, long, value_parser, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// hashed into the peer id
    #[clap(short, long, value_parser, default_value = "tracker-session")]
    pub identity: String,

    /// tracker request timeout, seconds
    #[clap(short, long, value_parser, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// -v debug, -vv trace
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// start tracking a metainfo (.torrent) file
    Load { file: PathBuf },
    Unload { info_hash: ID },
    /// announce tiers in traversal order
    Announces { info_hash: ID },
    Announce {
        info_hash: ID,
        #[clap(short, long, value_enum, default_value_t = AnnounceEvent::Regular)]
        event: AnnounceEvent,
        #[clap(short, long, default_value_t = 0)]
        uploaded: u64,
        #[clap(short, long, default_value_t = 0)]
        downloaded: u64,
        #[clap(short, long, default_value_t = 0)]
        left: u64,
    },
    Scrape { info_hash: ID },
    /// known peers, sorted by address
    Peers { info_hash: ID },
    Invalidate { info_hash: ID, ip: String, port: u16 },
    /// latest statistics per tracker
    Stats { info_hash: ID },
}

impl Config {
    pub fn new() -> Config {
        Config::parse()
    }
}
