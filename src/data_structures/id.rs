use crate::error::Error;
use openssl::sha;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

pub use crate::constants::ID_LEN;

/// 20 byte identifier, used both for infohashes and for our own peer id.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ID([u8; ID_LEN]);

impl ID {
    pub fn new(id_array: [u8; ID_LEN]) -> Self {
        Self(id_array)
    }

    /// SHA-1 digest of `data`.
    pub fn sha1(data: &[u8]) -> Self {
        let mut hasher = sha::Sha1::new();
        hasher.update(data);
        Self(hasher.finish())
    }

    pub fn as_byte_ref(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Lowercase hex, 40 chars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ID {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rv = [0u8; ID_LEN];

        hex::decode_to_slice(s, &mut rv).map_err(|e| Error::InvalidInfohash(format!("{s}: {e}")))?;

        Ok(Self(rv))
    }
}

impl TryFrom<&[u8]> for ID {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ID_LEN] = value.try_into().map_err(|_| {
            Error::InvalidInfohash(format!("expected {ID_LEN} bytes, found {}", value.len()))
        })?;

        Ok(Self(arr))
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID({})", self.to_hex())
    }
}

impl Serialize for ID {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = [u8; ID_LEN];

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("20 byte string")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.try_into()
                    .map_err(|_| serde::de::Error::invalid_length(v.len(), &self))
            }
        }

        Ok(ID(deserializer.deserialize_byte_buf(Visitor {})?))
    }
}
