use crate::ok_or_missing_field;
use crate::peers::KnownPeer;
use crate::statistics::ScrapeData;
use crate::transcoding::peers::PeerList;
use anyhow::{anyhow, Result};
use bendy::decoding::{Decoder, FromBencode, Object};
use bendy::encoding::AsString;

fn lossy_string(object: Object) -> Result<String, bendy::decoding::Error> {
    let bytes = AsString::<Vec<u8>>::decode_bencode_object(object)?.0;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a whole tracker response body as `T`.
pub fn from_response_bytes<T: FromBencode>(bytes: &[u8]) -> Result<T> {
    let mut decoder = Decoder::new(bytes);
    let decoder_object = decoder
        .next_object()?
        .ok_or(anyhow!("response from tracker is empty"))?;

    Ok(T::decode_bencode_object(decoder_object)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Failure(String),
    Success(AnnounceSuccess),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnounceSuccess {
    pub warning_message: Option<String>,
    pub interval: u64,
    pub min_interval: Option<u64>,
    pub complete: u64,
    pub downloaded: u64,
    pub incomplete: u64,
    pub name: Option<String>,
    pub peers: Vec<KnownPeer>,
}

impl AnnounceSuccess {
    pub fn scrape_data(&self) -> ScrapeData {
        ScrapeData::Success {
            complete: self.complete,
            downloaded: self.downloaded,
            incomplete: self.incomplete,
            name: self.name.clone(),
        }
    }
}

impl FromBencode for Response {
    const EXPECTED_RECURSION_DEPTH: usize = 3;

    fn decode_bencode_object(object: Object) -> Result<Self, bendy::decoding::Error> {
        let mut failure_reason = None;
        let mut warning_message = None;
        let mut interval = None;
        let mut min_interval = None;
        let mut complete = None;
        let mut downloaded = None;
        let mut incomplete = None;
        let mut name = None;
        let mut peers = None;

        let mut response = object.try_into_dictionary()?;
        while let Some(kv) = response.next_pair()? {
            match kv {
                (b"failure reason", value) => {
                    failure_reason = Some(lossy_string(value)?);
                }
                (b"warning message", value) => {
                    warning_message = Some(lossy_string(value)?);
                }
                (b"interval", value) => {
                    interval = Some(u64::decode_bencode_object(value)?);
                }
                (b"min interval", value) => {
                    min_interval = Some(u64::decode_bencode_object(value)?);
                }
                (b"complete", value) => {
                    complete = Some(u64::decode_bencode_object(value)?);
                }
                (b"downloaded", value) => {
                    downloaded = Some(u64::decode_bencode_object(value)?);
                }
                (b"incomplete", value) => {
                    incomplete = Some(u64::decode_bencode_object(value)?);
                }
                (b"name", value) => {
                    name = Some(lossy_string(value)?);
                }
                (b"peers", value) => {
                    peers = Some(PeerList::decode_bencode_object(value)?);
                }
                _ => (),
            }
        }

        if let Some(reason) = failure_reason {
            return Ok(Response::Failure(reason));
        }

        Ok(Response::Success(AnnounceSuccess {
            warning_message,
            interval: ok_or_missing_field!(interval)?,
            min_interval,
            complete: complete.unwrap_or_default(),
            downloaded: downloaded.unwrap_or_default(),
            incomplete: incomplete.unwrap_or_default(),
            name,
            peers: peers
                .map(PeerList::into_known_peers)
                .unwrap_or_default(),
        }))
    }
}

/// One torrent's entry of a scrape response's `files`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeFile {
    pub complete: u64,
    pub downloaded: u64,
    pub incomplete: u64,
    pub name: Option<String>,
}

impl FromBencode for ScrapeFile {
    const EXPECTED_RECURSION_DEPTH: usize = 1;

    fn decode_bencode_object(object: Object) -> Result<Self, bendy::decoding::Error> {
        let mut rv = ScrapeFile::default();

        let mut file = object.try_into_dictionary()?;
        while let Some(kv) = file.next_pair()? {
            match kv {
                (b"complete", value) => rv.complete = u64::decode_bencode_object(value)?,
                (b"downloaded", value) => rv.downloaded = u64::decode_bencode_object(value)?,
                (b"incomplete", value) => rv.incomplete = u64::decode_bencode_object(value)?,
                (b"name", value) => rv.name = Some(lossy_string(value)?),
                _ => (),
            }
        }

        Ok(rv)
    }
}

impl From<ScrapeFile> for ScrapeData {
    fn from(value: ScrapeFile) -> Self {
        ScrapeData::Success {
            complete: value.complete,
            downloaded: value.downloaded,
            incomplete: value.incomplete,
            name: value.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeResponse {
    Failure(String),
    /// First entry of `files`, `None` when `files` is empty or missing.
    Files(Option<ScrapeFile>),
}

impl FromBencode for ScrapeResponse {
    const EXPECTED_RECURSION_DEPTH: usize = 3;

    fn decode_bencode_object(object: Object) -> Result<Self, bendy::decoding::Error> {
        let mut failure_reason = None;
        let mut first_file = None;

        let mut response = object.try_into_dictionary()?;
        while let Some(kv) = response.next_pair()? {
            match kv {
                (b"failure reason", value) => {
                    failure_reason = Some(lossy_string(value)?);
                }
                (b"files", value) => {
                    let mut files = value.try_into_dictionary()?;
                    while let Some((_info_hash, file)) = files.next_pair()? {
                        if first_file.is_none() {
                            first_file = Some(ScrapeFile::decode_bencode_object(file)?);
                        }
                    }
                }
                _ => (),
            }
        }

        Ok(match failure_reason {
            Some(reason) => ScrapeResponse::Failure(reason),
            None => ScrapeResponse::Files(first_file),
        })
    }
}

impl From<ScrapeResponse> for ScrapeData {
    fn from(value: ScrapeResponse) -> Self {
        match value {
            ScrapeResponse::Failure(reason) => ScrapeData::Failure { reason },
            ScrapeResponse::Files(Some(file)) => file.into(),
            ScrapeResponse::Files(None) => {
                ScrapeData::failure(crate::constants::UNSPECIFIED_FAILURE)
            }
        }
    }
}
