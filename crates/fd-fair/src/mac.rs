//! Keys, digests, and the HMAC-SHA3-256 binding between them.

use std::fmt;
use std::str::FromStr;

use hex::FromHex;
use hmac::{Hmac, Mac};
use rand::TryCryptoRng;
use serde::{Deserialize, Serialize};
use sha3::Sha3_256;

use crate::error::{FairError, FairResult};

type HmacSha3 = Hmac<Sha3_256>;

/// Length of a commitment key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Secret key that blinds a committed number until it is revealed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(#[serde(with = "hex::serde")] [u8; KEY_LEN]);

impl SecretKey {
    /// Draw a fresh key from a cryptographically secure source.
    pub fn random<R: TryCryptoRng>(rng: &mut R) -> FairResult<Self> {
        let mut bytes = [0u8; KEY_LEN];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| FairError::Entropy(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A published HMAC-SHA3-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(#[serde(with = "hex::serde")] [u8; 32]);

impl Digest {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <[u8; 32]>::from_hex(s.trim()).map(Self)
    }
}

fn keyed(key: &SecretKey, number: u32) -> FairResult<HmacSha3> {
    let mut mac = <HmacSha3 as Mac>::new_from_slice(key.as_bytes())
        .map_err(|e| FairError::InvalidKey(e.to_string()))?;
    mac.update(number.to_string().as_bytes());
    Ok(mac)
}

/// `HMAC-SHA3-256(key, decimal(number))`.
pub fn mac(key: &SecretKey, number: u32) -> FairResult<Digest> {
    let bytes = keyed(key, number)?.finalize().into_bytes();
    Ok(Digest(bytes.into()))
}

/// Check that `key` and `number` reproduce `published`.
///
/// The comparison is constant-time. A mismatch is reported as
/// [`FairError::DigestMismatch`] carrying both digests.
pub fn verify(published: &Digest, key: &SecretKey, number: u32) -> FairResult<()> {
    if keyed(key, number)?.verify_slice(published.as_bytes()).is_ok() {
        return Ok(());
    }
    Err(FairError::DigestMismatch {
        published: *published,
        recomputed: mac(key, number)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_bytes([byte; KEY_LEN])
    }

    #[test]
    fn mac_is_deterministic() {
        assert_eq!(mac(&key(1), 4).unwrap(), mac(&key(1), 4).unwrap());
    }

    #[test]
    fn mac_binds_number_and_key() {
        assert_ne!(mac(&key(1), 4).unwrap(), mac(&key(1), 5).unwrap());
        assert_ne!(mac(&key(1), 4).unwrap(), mac(&key(2), 4).unwrap());
    }

    #[test]
    fn verify_accepts_matching_values() {
        let digest = mac(&key(7), 3).unwrap();
        verify(&digest, &key(7), 3).unwrap();
    }

    #[test]
    fn verify_rejects_other_number() {
        let digest = mac(&key(7), 3).unwrap();
        let err = verify(&digest, &key(7), 2).unwrap_err();
        match err {
            FairError::DigestMismatch {
                published,
                recomputed,
            } => {
                assert_eq!(published, digest);
                assert_eq!(recomputed, mac(&key(7), 2).unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn verify_rejects_other_key() {
        let digest = mac(&key(7), 3).unwrap();
        assert!(verify(&digest, &key(8), 3).unwrap_err().is_violation());
    }

    #[test]
    fn digest_hex_is_lowercase() {
        let text = mac(&key(9), 0).unwrap().to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn digest_parses_from_hex() {
        let digest = mac(&key(9), 1).unwrap();
        let parsed: Digest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
        assert!("not hex".parse::<Digest>().is_err());
    }

    #[test]
    fn random_keys_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = SecretKey::random(&mut rng).unwrap();
        let b = SecretKey::random(&mut rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn key_debug_is_redacted() {
        let k = key(0xab);
        assert_eq!(format!("{k:?}"), "SecretKey(..)");
        assert_eq!(k.to_string(), "ab".repeat(KEY_LEN));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let digest = mac(&key(3), 5).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{digest}\""));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);

        let k = key(4);
        let back: SecretKey = serde_json::from_str(&serde_json::to_string(&k).unwrap()).unwrap();
        assert_eq!(back, k);
    }
}
