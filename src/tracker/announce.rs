use crate::data_structures::ID;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AnnounceEvent {
    Started,
    Stopped,
    Completed,
    /// Periodic announce, sent as an empty `event`.
    Regular,
}

impl AnnounceEvent {
    pub fn as_param(&self) -> &'static str {
        match self {
            AnnounceEvent::Started => "started",
            AnnounceEvent::Stopped => "stopped",
            AnnounceEvent::Completed => "completed",
            AnnounceEvent::Regular => "",
        }
    }
}

impl fmt::Display for AnnounceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnounceEvent::Regular => f.write_str("regular"),
            event => f.write_str(event.as_param()),
        }
    }
}

impl FromStr for AnnounceEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(AnnounceEvent::Started),
            "stopped" => Ok(AnnounceEvent::Stopped),
            "completed" => Ok(AnnounceEvent::Completed),
            "" | "regular" => Ok(AnnounceEvent::Regular),
            other => Err(format!("unknown announce event {other}")),
        }
    }
}

#[derive(Debug)]
pub struct Announce<'a> {
    pub tracker_url: &'a str,
    pub info_hash: &'a ID,
    pub peer_id: &'a ID,
    pub port: u16,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub compact: bool,
    pub event: AnnounceEvent,
}

/// `?` or `&`, depending on whether `url` already has a query.
pub(crate) fn query_separator(url: &str) -> char {
    if url.contains('?') {
        '&'
    } else {
        '?'
    }
}

impl Announce<'_> {
    pub fn as_url(&self) -> String {
        let mut s = String::from(self.tracker_url);

        s.push(query_separator(self.tracker_url));
        s.push_str("info_hash=");
        s.push_str(urlencoding::encode_binary(self.info_hash.as_byte_ref()).as_ref());

        s.push_str("&peer_id=");
        s.push_str(urlencoding::encode_binary(self.peer_id.as_byte_ref()).as_ref());

        s.push_str("&port=");
        s.push_str(&self.port.to_string());

        s.push_str("&uploaded=");
        s.push_str(&self.uploaded.to_string());

        s.push_str("&downloaded=");
        s.push_str(&self.downloaded.to_string());

        s.push_str("&left=");
        s.push_str(&self.left.to_string());

        s.push_str("&compact=");
        s.push_str(if self.compact { "1" } else { "0" });

        s.push_str("&event=");
        s.push_str(self.event.as_param());

        s
    }
}
