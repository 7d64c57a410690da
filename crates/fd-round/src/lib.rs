//! Turn orchestration for one round of non-transitive dice.
//!
//! A [`Round`] walks a fixed sequence of phases: the house commits to a
//! coin flip that decides who picks dice first, both sides pick dice, and
//! each side throws once with a face chosen by adding the player's number
//! to a committed house number modulo six. Every random value goes through
//! the commit-reveal generator in `fd-fair`, and everything published is
//! appended to a [`Transcript`] that can be checked after the fact.
//!
//! Input and output are injected: any [`LineSource`] supplies answers,
//! any [`std::io::Write`] receives the narration, and a
//! [`MatrixRenderer`] draws the probability table on request.

pub mod config;
pub mod context;
pub mod error;
pub mod menu;
pub mod prompt;
pub mod round;
pub mod transcript;

pub use config::{HouseStrategy, RoundConfig};
pub use context::{GameContext, MatrixRenderer};
pub use error::{RoundError, RoundResult};
pub use menu::{Choice, Menu, MenuItem};
pub use prompt::{LineSource, Prompter};
pub use round::{MODULUS, Party, Phase, Round, RoundOutcome, RoundReport, RoundState, Throw};
pub use transcript::{Purpose, Transcript, TranscriptEntry};
