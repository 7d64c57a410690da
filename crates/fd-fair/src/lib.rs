//! Commit-reveal fair random number generation.
//!
//! One party draws a number in `[0, range)` together with a fresh 256-bit
//! key and publishes `HMAC-SHA3-256(key, number)` before the counterparty
//! acts. Revealing the key and number afterwards lets the counterparty
//! recompute the digest and confirm the number was fixed in advance.
//!
//! ```no_run
//! use fd_fair::FairGenerator;
//!
//! let mut generator = FairGenerator::new();
//! let committed = generator.commit(6)?;
//! println!("HMAC={}", committed.hmac());
//! let revealed = committed.reveal()?;
//! println!("number={} KEY={}", revealed.number, revealed.key);
//! # Ok::<(), fd_fair::FairError>(())
//! ```

pub mod error;
pub mod generator;
pub mod mac;

pub use error::{FairError, FairResult};
pub use generator::{Committed, FairGenerator, Revealed};
pub use mac::{Digest, KEY_LEN, SecretKey, mac, verify};
