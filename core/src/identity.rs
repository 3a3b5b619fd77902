//! Identities for ledger objects and the parties that own them.
//!
//! Every protocol object carries a 32-byte identity. The canonical text
//! form is `0x`-prefixed hex; parsing also accepts bare hex, base58 and
//! padded base64 for interoperability with wallet tooling.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bincode::{Decode, Encode};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::IdentityError;

/// A 32-byte object or party identity.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ID([u8; 32]);

impl ID {
    /// Length of an identity in bytes.
    pub const LEN: usize = 32;

    /// Wraps raw identity bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw identity bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Constant-time equality, for fingerprint comparisons.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).unwrap_u8() == 1
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ID {
    type Err = IdentityError;

    /// Parses an identity from `0x`-prefixed hex, bare hex, base58, or
    /// padded base64. The decoded form must be exactly 32 bytes.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdentityError::EmptyIdentity);
        }
        let bytes = if let Some(h) = s.strip_prefix("0x") {
            hex::decode(h)?
        } else if s.len() == 2 * Self::LEN && s.chars().all(|c| c.is_ascii_hexdigit()) {
            hex::decode(s)?
        } else if s.ends_with('=') || s.contains(['+', '/']) {
            BASE64.decode(s)?
        } else if s.chars().all(|c| c.is_ascii_alphanumeric()) {
            bs58::decode(s).into_vec()?
        } else {
            return Err(IdentityError::UnsupportedFormat);
        };
        let len = bytes.len();
        let raw: [u8; Self::LEN] = bytes
            .try_into()
            .map_err(|_| IdentityError::BadLength(len))?;
        Ok(Self(raw))
    }
}

impl Serialize for ID {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A party (participant) in a swap, named by a 32-byte identity.
#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Party(ID);

impl Party {
    /// Derives a party identity by hashing a human-readable label.
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(b"swaplock:party:")
            .chain_update(label.as_bytes())
            .finalize();
        Self(ID::new(digest.into()))
    }

    /// The underlying identity.
    pub const fn id(&self) -> ID {
        self.0
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Party {
    type Err = IdentityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<ID> for Party {
    fn from(id: ID) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ID {
        ID::new([7u8; 32])
    }

    #[test]
    fn display_is_prefixed_hex() {
        let id = sample();
        let s = id.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 2 + 64);
        assert_eq!(s.parse::<ID>().unwrap(), id);
    }

    #[test]
    fn parses_bare_hex() {
        let id = sample();
        let bare = hex::encode(id.as_bytes());
        assert_eq!(bare.parse::<ID>().unwrap(), id);
    }

    #[test]
    fn parses_base58() {
        let id = sample();
        let encoded = bs58::encode(id.as_bytes()).into_string();
        assert_eq!(encoded.parse::<ID>().unwrap(), id);
    }

    #[test]
    fn parses_padded_base64() {
        let id = sample();
        let encoded = BASE64.encode(id.as_bytes());
        assert!(encoded.ends_with('='));
        assert_eq!(encoded.parse::<ID>().unwrap(), id);
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert_eq!("".parse::<ID>(), Err(IdentityError::EmptyIdentity));
        assert_eq!(
            "not an id!".parse::<ID>(),
            Err(IdentityError::UnsupportedFormat)
        );
        assert_eq!(
            "0xdeadbeef".parse::<ID>(),
            Err(IdentityError::BadLength(4))
        );
    }

    #[test]
    fn serde_round_trip_as_string() {
        let id = sample();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: ID = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn label_derivation_is_stable() {
        let a = Party::from_label("alice");
        let b = Party::from_label("alice");
        let c = Party::from_label("bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn constant_time_eq_agrees_with_eq() {
        let a = sample();
        let b = ID::new([8u8; 32]);
        assert!(a.ct_eq(&a));
        assert!(!a.ct_eq(&b));
    }
}
