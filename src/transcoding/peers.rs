use super::{socketaddr_from_compact_bytes, COMPACT_SOCKADDR_LEN};
use crate::ok_or_missing_field;
use crate::peers::KnownPeer;
use bendy::decoding::{Error, FromBencode, Object};
use bendy::encoding::AsString;
use std::net::Ipv4Addr;
use tracing::warn;

const RAW_IPV4_LEN: usize = 4;

/// The two wire forms of a tracker's `peers` value.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerList {
    /// `{ip=4}{port=2}` groups, big endian.
    Compact(Vec<u8>),
    Dictionary(Vec<DictionaryPeer>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryPeer {
    pub peer_id: Option<Vec<u8>>,
    pub ip: Vec<u8>,
    pub port: u16,
}

impl FromBencode for DictionaryPeer {
    const EXPECTED_RECURSION_DEPTH: usize = 1;

    fn decode_bencode_object(object: Object) -> Result<Self, Error> {
        let mut peer_id = None;
        let mut ip = None;
        let mut port = None;

        let mut peer = object.try_into_dictionary()?;
        while let Some(kv) = peer.next_pair()? {
            match kv {
                (b"peer id", value) => {
                    peer_id = Some(AsString::<Vec<u8>>::decode_bencode_object(value)?.0);
                }
                (b"ip", value) => {
                    ip = Some(AsString::<Vec<u8>>::decode_bencode_object(value)?.0);
                }
                (b"port", value) => {
                    port = Some(u16::decode_bencode_object(value)?);
                }
                _ => (),
            }
        }

        Ok(DictionaryPeer {
            peer_id,
            ip: ok_or_missing_field!(ip)?,
            port: ok_or_missing_field!(port)?,
        })
    }
}

impl FromBencode for PeerList {
    const EXPECTED_RECURSION_DEPTH: usize = 2;

    fn decode_bencode_object(object: Object) -> Result<Self, Error> {
        match object {
            Object::Bytes(bytes) => Ok(PeerList::Compact(bytes.to_vec())),
            Object::List(mut list) => {
                let mut peers = Vec::new();

                while let Some(item) = list.next_object()? {
                    peers.push(DictionaryPeer::decode_bencode_object(item)?);
                }

                Ok(PeerList::Dictionary(peers))
            }
            Object::Integer(_) => Err(Error::unexpected_token("List or ByteString", "Integer")),
            Object::Dict(_) => Err(Error::unexpected_token("List or ByteString", "Dict")),
        }
    }
}

impl DictionaryPeer {
    fn into_known_peer(self) -> KnownPeer {
        // 4 raw bytes is a binary address, anything else is text (dotted quad or a hostname)
        let ip = match <[u8; RAW_IPV4_LEN]>::try_from(self.ip.as_slice()) {
            Ok(octets) => Ipv4Addr::from(octets).to_string(),
            Err(_) => String::from_utf8_lossy(&self.ip).into_owned(),
        };

        KnownPeer::new(
            ip,
            self.port,
            self.peer_id
                .map(|peer_id| String::from_utf8_lossy(&peer_id).into_owned()),
        )
    }
}

impl PeerList {
    pub fn into_known_peers(self) -> Vec<KnownPeer> {
        match self {
            PeerList::Compact(bytes) => {
                let chunks = bytes.chunks_exact(COMPACT_SOCKADDR_LEN);

                if !chunks.remainder().is_empty() {
                    warn!(
                        "compact peers: discarding {} trailing bytes",
                        chunks.remainder().len()
                    );
                }

                chunks
                    .filter_map(|compact_peer| socketaddr_from_compact_bytes(compact_peer).ok())
                    .map(KnownPeer::from)
                    .collect()
            }
            PeerList::Dictionary(peers) => peers
                .into_iter()
                .map(DictionaryPeer::into_known_peer)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DictionaryPeer, PeerList};
    use crate::peers::KnownPeer;
    use bendy::decoding::{Decoder, FromBencode};

    fn decode(bytes: &[u8]) -> Result<PeerList, bendy::decoding::Error> {
        let mut decoder = Decoder::new(bytes);
        let object = decoder.next_object()?.unwrap();

        PeerList::decode_bencode_object(object)
    }

    #[test]
    fn compact() {
        let peers = PeerList::Compact(vec![127, 0, 0, 22, 26, 231]).into_known_peers();

        assert_eq!(peers, vec![KnownPeer::new("127.0.0.22", 6887, None)]);
    }

    #[test]
    fn compact_unsigned_octets() {
        let peers =
            PeerList::Compact(vec![0x9f, 0x45, 0x41, 0x9d, 0xfe, 0x72, 200, 1, 2, 255, 0x80, 0x00])
                .into_known_peers();

        assert_eq!(
            peers,
            vec![
                KnownPeer::new("159.69.65.157", 65138, None),
                KnownPeer::new("200.1.2.255", 32768, None),
            ]
        );
    }

    #[test]
    fn compact_trailing_bytes_discarded() {
        let peers = PeerList::Compact(vec![127, 0, 0, 22, 26, 231, 10, 0, 0]).into_known_peers();

        assert_eq!(peers, vec![KnownPeer::new("127.0.0.22", 6887, None)]);
    }

    #[test]
    fn decode_compact_and_empty() {
        assert_eq!(decode(b"0:").unwrap(), PeerList::Compact(vec![]));
        assert_eq!(
            decode(b"6:\x7f\x00\x00\x16\x1a\xe7").unwrap(),
            PeerList::Compact(vec![127, 0, 0, 22, 26, 231])
        );
    }

    #[test]
    fn decode_dictionary() {
        let list = decode(
            b"ld2:ip10:127.0.0.217:peer id1:24:porti6889eed2:ip4:\x7f\x00\x00\x164:porti6887eee",
        )
        .unwrap();

        assert_eq!(
            list,
            PeerList::Dictionary(vec![
                DictionaryPeer {
                    peer_id: Some(b"2".to_vec()),
                    ip: b"127.0.0.21".to_vec(),
                    port: 6889,
                },
                DictionaryPeer {
                    peer_id: None,
                    ip: vec![127, 0, 0, 22],
                    port: 6887,
                },
            ])
        );

        assert_eq!(
            list.into_known_peers(),
            vec![
                KnownPeer::new("127.0.0.21", 6889, Some("2".to_string())),
                KnownPeer::new("127.0.0.22", 6887, None),
            ]
        );
    }

    #[test]
    fn dictionary_hostname_kept_literally() {
        let list = decode(b"ld2:ip16:peer.example.com4:porti1eee").unwrap();

        assert_eq!(
            list.into_known_peers(),
            vec![KnownPeer::new("peer.example.com", 1, None)]
        );
    }

    #[test]
    fn reject_other_types() {
        assert!(decode(b"i5e").is_err());
        assert!(decode(b"de").is_err());
        assert!(decode(b"ld4:porti1eee").is_err());
    }
}
