use crate::constants::{PEER_ID_HASH_CHARS, PEER_ID_PREFIX, PEER_ID_RANDOM_CHARS};
use crate::data_structures::{ID, ID_LEN};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// `-CS1000-`, six hex chars of the identity's SHA-1, six random alphanumerics.
pub fn generate_peer_id<R: Rng + ?Sized>(identity: &str, rng: &mut R) -> ID {
    let hash = ID::sha1(identity.as_bytes()).to_hex();

    let bytes = PEER_ID_PREFIX
        .bytes()
        .chain(hash.bytes().take(PEER_ID_HASH_CHARS))
        .chain((0..PEER_ID_RANDOM_CHARS).map(|_| rng.sample(Alphanumeric)));

    let mut peer_id = [0u8; ID_LEN];
    for (slot, byte) in peer_id.iter_mut().zip(bytes) {
        *slot = byte;
    }

    ID::new(peer_id)
}

/// Who we announce as. The peer id is drawn once and reused for every request.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub peer_id: ID,
    pub port: u16,
}

impl ClientIdentity {
    pub fn new(identity: &str, port: u16) -> Self {
        Self {
            peer_id: generate_peer_id(identity, &mut rand::thread_rng()),
            port,
        }
    }
}
