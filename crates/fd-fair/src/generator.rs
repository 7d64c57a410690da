//! The commit-reveal generator.
//!
//! A commitment moves through `Uncommitted -> Committed -> Revealed` and
//! never back. [`FairGenerator::commit`] produces a [`Committed`] value
//! whose only public parts are the digest and the range; consuming it with
//! [`Committed::reveal`] yields the [`Revealed`] number and key.

use std::fmt;

use rand::TryCryptoRng;
use rand::rngs::OsRng;
use tracing::debug;

use crate::error::{FairError, FairResult};
use crate::mac::{Digest, SecretKey, mac, verify};

/// Draws committed random numbers from a cryptographically secure source.
///
/// Defaults to the operating system generator. Any other source must also
/// be a [`TryCryptoRng`]; errors from it are fatal.
#[derive(Debug, Default)]
pub struct FairGenerator<R = OsRng> {
    rng: R,
}

impl FairGenerator<OsRng> {
    /// A generator backed by the operating system's secure randomness.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl<R: TryCryptoRng> FairGenerator<R> {
    /// A generator backed by `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Commit to a number drawn uniformly from `[0, range)`.
    ///
    /// The key is drawn independently of the number, so equal numbers
    /// produce unrelated digests.
    pub fn commit(&mut self, range: u32) -> FairResult<Committed> {
        if range == 0 {
            return Err(FairError::EmptyRange);
        }
        let number = self.uniform(range)?;
        let key = SecretKey::random(&mut self.rng)?;
        let hmac = mac(&key, number)?;
        debug!(range, %hmac, "committed");
        Ok(Committed {
            range,
            number,
            key,
            hmac,
        })
    }

    /// Rejection sampling over `u32` so every value in range is equally
    /// likely.
    fn uniform(&mut self, range: u32) -> FairResult<u32> {
        let limit = u32::MAX - u32::MAX % range;
        loop {
            let candidate = self
                .rng
                .try_next_u32()
                .map_err(|e| FairError::Entropy(e.to_string()))?;
            if candidate < limit {
                return Ok(candidate % range);
            }
        }
    }
}

/// A number that has been committed to but not yet disclosed.
pub struct Committed {
    range: u32,
    number: u32,
    key: SecretKey,
    hmac: Digest,
}

impl Committed {
    /// The digest to publish before the counterparty acts.
    pub fn hmac(&self) -> &Digest {
        &self.hmac
    }

    /// Exclusive upper bound of the committed number.
    pub fn range(&self) -> u32 {
        self.range
    }

    /// Disclose the number and key.
    ///
    /// The digest is recomputed from the stored key and number and checked
    /// against the published one; a mismatch means the commitment was
    /// corrupted and is returned as [`FairError::DigestMismatch`].
    pub fn reveal(self) -> FairResult<Revealed> {
        let revealed = Revealed {
            range: self.range,
            number: self.number,
            key: self.key,
            hmac: self.hmac,
        };
        revealed.verify()?;
        debug!(number = revealed.number, hmac = %revealed.hmac, "revealed");
        Ok(revealed)
    }
}

impl fmt::Debug for Committed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("range", &self.range)
            .field("hmac", &self.hmac)
            .finish_non_exhaustive()
    }
}

/// A disclosed commitment: everything the counterparty needs to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revealed {
    /// Exclusive upper bound the number was drawn from.
    pub range: u32,
    /// The committed number.
    pub number: u32,
    /// The key the digest was computed with.
    pub key: SecretKey,
    /// The digest that was published at commit time.
    pub hmac: Digest,
}

impl Revealed {
    /// Confirm the number is in range and reproduces the published digest.
    pub fn verify(&self) -> FairResult<()> {
        if self.number >= self.range {
            return Err(FairError::OutOfRange {
                number: self.number,
                range: self.range,
            });
        }
        verify(&self.hmac, &self.key, self.number)
    }
}
