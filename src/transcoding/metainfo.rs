use crate::data_structures::ID;
use crate::error::{Error, Result};
use crate::ok_or_missing_field;
use crate::tracker::AnnounceTiers;
use bendy::decoding::{Decoder, FromBencode, Object};

/// The parts of a `.torrent` file the tracker engine cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Metainfo {
    pub info_hash: ID,
    pub announce: Option<String>,
    pub announce_list: Option<Vec<Vec<String>>>,
}

impl FromBencode for Metainfo {
    const EXPECTED_RECURSION_DEPTH: usize = 10;

    fn decode_bencode_object(object: Object) -> std::result::Result<Self, bendy::decoding::Error> {
        let mut info_hash = None;
        let mut announce = None;
        let mut announce_list = None;

        let mut torrent = object.try_into_dictionary()?;
        while let Some(kv) = torrent.next_pair()? {
            match kv {
                (b"info", value) => {
                    // hash the bytes exactly as they appear in the file
                    let bytes = value.try_into_dictionary()?.into_raw()?;
                    info_hash = Some(ID::sha1(bytes));
                }
                (b"announce", value) => {
                    announce = Some(String::decode_bencode_object(value)?);
                }
                (b"announce-list", value) => {
                    announce_list = Some(Vec::<Vec<String>>::decode_bencode_object(value)?);
                }
                _ => (),
            }
        }

        Ok(Metainfo {
            info_hash: ok_or_missing_field!(info_hash, "info")?,
            announce,
            announce_list,
        })
    }
}

impl Metainfo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes);

        let object = decoder
            .next_object()
            .map_err(|e| Error::InvalidMetainfo(e.to_string()))?
            .ok_or_else(|| Error::InvalidMetainfo("empty metainfo".to_string()))?;

        Metainfo::decode_bencode_object(object).map_err(|e| Error::InvalidMetainfo(e.to_string()))
    }

    pub fn tiers(&self) -> Result<AnnounceTiers> {
        AnnounceTiers::build(self.announce.clone(), self.announce_list.clone())
            .ok_or_else(|| Error::InvalidMetainfo("no announce url".to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Metainfo;
    use crate::data_structures::ID;
    use crate::error::Error;

    pub const INFO: &[u8] = b"d6:lengthi2703360e4:name4:lame12:piece lengthi32768e6:pieces20:aaaaaaaaaaaaaaaaaaaae";

    fn bstr(s: &str) -> Vec<u8> {
        format!("{}:{}", s.len(), s).into_bytes()
    }

    /// Single `announce` torrent.
    pub fn single_tracker(announce: &str) -> Vec<u8> {
        let mut rv = b"d8:announce".to_vec();
        rv.extend(bstr(announce));
        rv.extend_from_slice(b"4:info");
        rv.extend_from_slice(INFO);
        rv.push(b'e');
        rv
    }

    /// `announce-list` torrent, `announce` is the first url.
    pub fn multi_tracker(tiers: &[&[&str]], info: &[u8]) -> Vec<u8> {
        let mut rv = b"d8:announce".to_vec();
        rv.extend(bstr(tiers[0][0]));
        rv.extend_from_slice(b"13:announce-listl");
        for tier in tiers {
            rv.push(b'l');
            for url in tier.iter() {
                rv.extend(bstr(url));
            }
            rv.push(b'e');
        }
        rv.extend_from_slice(b"e4:info");
        rv.extend_from_slice(info);
        rv.push(b'e');
        rv
    }

    #[test]
    fn single_parse() {
        let metainfo = Metainfo::from_bytes(&single_tracker("https://127.0.0.1:8082/announce")).unwrap();

        assert_eq!(metainfo.info_hash, ID::sha1(INFO));
        assert_eq!(
            metainfo.announce.as_deref(),
            Some("https://127.0.0.1:8082/announce")
        );
        assert_eq!(metainfo.announce_list, None);
        assert_eq!(
            metainfo.tiers().unwrap().as_slice(),
            vec![vec!["https://127.0.0.1:8082/announce".to_string()]]
        );
    }

    #[test]
    fn multi_parse() {
        let bytes = multi_tracker(
            &[
                &["http://a.example/announce", "http://b.example/announce"],
                &["udp://62.138.0.158:6969/announce"],
            ],
            INFO,
        );
        let metainfo = Metainfo::from_bytes(&bytes).unwrap();

        assert_eq!(metainfo.info_hash, ID::sha1(INFO));
        assert_eq!(
            metainfo.tiers().unwrap().as_slice(),
            vec![
                vec![
                    "http://a.example/announce".to_string(),
                    "http://b.example/announce".to_string()
                ],
                vec!["udp://62.138.0.158:6969/announce".to_string()],
            ]
        );
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            Metainfo::from_bytes(b"not bencode"),
            Err(Error::InvalidMetainfo(_))
        ));
        assert!(matches!(
            Metainfo::from_bytes(b""),
            Err(Error::InvalidMetainfo(_))
        ));
        assert!(matches!(
            Metainfo::from_bytes(b"d8:announce3:urle"),
            Err(Error::InvalidMetainfo(_))
        ));

        let mut no_tracker = b"d4:info".to_vec();
        no_tracker.extend_from_slice(INFO);
        no_tracker.push(b'e');
        let metainfo = Metainfo::from_bytes(&no_tracker).unwrap();
        assert!(matches!(metainfo.tiers(), Err(Error::InvalidMetainfo(_))));
    }
}
