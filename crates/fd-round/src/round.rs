//! The round state machine.
//!
//! ```text
//! DetermineFirstMove -> ChooseDice -> HouseThrow -> PlayerThrow -> Resolve -> End
//!          \________________\______________\____________\___________-> Aborted
//! ```
//!
//! Every prompt accepts exit, which aborts the round with no winner, and
//! help, which prints the probability table without moving the round on.
//! The house throws first regardless of who picked dice first.

use std::fmt;
use std::io::Write;

use rand::TryCryptoRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fd_dice::{DiceSet, FACES};
use fd_fair::{Committed, Digest, FairGenerator};

use crate::context::GameContext;
use crate::error::{RoundError, RoundResult};
use crate::menu::Menu;
use crate::prompt::{LineSource, Prompter};
use crate::transcript::{Purpose, Transcript, TranscriptEntry};

/// Modulus for combining the committed and supplied numbers of a throw.
pub const MODULUS: u32 = FACES as u32;

/// A side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// The automated opponent, which also runs the fair generator.
    House,
    /// The human at the prompt.
    Player,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House => write!(f, "house"),
            Self::Player => write!(f, "player"),
        }
    }
}

/// Where the round currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Coin flip for who picks dice first.
    DetermineFirstMove,
    /// The player picks a dice; the house picks if it has not yet.
    ChooseDice,
    /// The house's throw.
    HouseThrow,
    /// The player's throw.
    PlayerThrow,
    /// Compare the two throws.
    Resolve,
    /// A winner was declared.
    End,
    /// The player exited.
    Aborted,
}

impl Phase {
    /// Whether the round is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Aborted)
    }
}

/// One side's throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throw {
    /// Who threw.
    pub party: Party,
    /// Index of the dice thrown.
    pub dice: usize,
    /// The house's committed number.
    pub committed: u32,
    /// The player's number, given after the digest was published.
    pub supplied: u32,
    /// `(committed + supplied) mod 6`.
    pub face_index: usize,
    /// The face value shown.
    pub face: i32,
}

impl Throw {
    /// The face index both numbers select together.
    pub fn face_index_for(committed: u32, supplied: u32) -> usize {
        ((u64::from(committed) + u64::from(supplied)) % u64::from(MODULUS)) as usize
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Both sides threw and a winner was declared.
    Finished {
        /// Who won. Ties go to the house.
        winner: Party,
        /// Whether both faces were equal.
        tie: bool,
        /// The house throw.
        house: Throw,
        /// The player throw.
        player: Throw,
    },
    /// The player exited before the round finished.
    Aborted {
        /// The phase the player exited from.
        phase: Phase,
    },
}

impl RoundOutcome {
    /// The winner, if the round finished.
    pub fn winner(&self) -> Option<Party> {
        match self {
            Self::Finished { winner, .. } => Some(*winner),
            Self::Aborted { .. } => None,
        }
    }
}

/// Mutable state of a round, owned by [`Round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Current phase.
    pub phase: Phase,
    /// Who picked dice first, once known.
    pub first_mover: Option<Party>,
    /// The house's dice index.
    pub house_dice: Option<usize>,
    /// The player's dice index.
    pub player_dice: Option<usize>,
    /// The house throw, once made.
    pub house_throw: Option<Throw>,
    /// The player throw, once made.
    pub player_throw: Option<Throw>,
    /// Digest published and not yet revealed.
    pub pending: Option<Digest>,
    /// Set when the round reaches a terminal phase.
    pub outcome: Option<RoundOutcome>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: Phase::DetermineFirstMove,
            first_mover: None,
            house_dice: None,
            player_dice: None,
            house_throw: None,
            player_throw: None,
            pending: None,
            outcome: None,
        }
    }
}

/// What a finished or aborted round leaves behind.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// How the round ended.
    pub outcome: RoundOutcome,
    /// Everything published during the round.
    pub transcript: Transcript,
}

enum Transition {
    Next(Phase),
    Done(RoundOutcome),
}

/// Drives one round between the house and a player.
pub struct Round<R, I, W> {
    generator: FairGenerator<R>,
    prompter: Prompter<I, W>,
    state: RoundState,
    held: Option<Committed>,
    transcript: Transcript,
}

impl<R: TryCryptoRng, I: LineSource, W: Write> Round<R, I, W> {
    /// Prepare a round over `dice`.
    pub fn new(generator: FairGenerator<R>, prompter: Prompter<I, W>, dice: &DiceSet) -> Self {
        Self {
            generator,
            prompter,
            state: RoundState::default(),
            held: None,
            transcript: Transcript::new(dice.clone()),
        }
    }

    /// Current state.
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Events recorded so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run the round to completion.
    pub fn play(mut self, ctx: &GameContext<'_>) -> RoundResult<RoundReport> {
        info!(round_id = %self.transcript.round_id, dice = ctx.dice.len(), "round started");
        let outcome = loop {
            if let Some(outcome) = self.step(ctx)? {
                break outcome;
            }
        };
        info!(round_id = %self.transcript.round_id, winner = ?outcome.winner(), "round over");
        Ok(RoundReport {
            outcome,
            transcript: self.transcript,
        })
    }

    /// Run the current phase. Returns the outcome once the round is over.
    pub fn step(&mut self, ctx: &GameContext<'_>) -> RoundResult<Option<RoundOutcome>> {
        let transition = match self.state.phase {
            Phase::DetermineFirstMove => self.determine_first_move(ctx)?,
            Phase::ChooseDice => self.choose_dice(ctx)?,
            Phase::HouseThrow => self.throw(ctx, Party::House)?,
            Phase::PlayerThrow => self.throw(ctx, Party::Player)?,
            Phase::Resolve => self.resolve()?,
            Phase::End | Phase::Aborted => return Ok(self.state.outcome),
        };

        match transition {
            Transition::Next(next) => {
                debug!(from = ?self.state.phase, to = ?next, "phase change");
                self.state.phase = next;
                Ok(None)
            }
            Transition::Done(outcome) => {
                self.state.phase = match outcome {
                    RoundOutcome::Finished { .. } => Phase::End,
                    RoundOutcome::Aborted { .. } => Phase::Aborted,
                };
                self.state.outcome = Some(outcome);
                Ok(Some(outcome))
            }
        }
    }

    fn determine_first_move(&mut self, ctx: &GameContext<'_>) -> RoundResult<Transition> {
        self.prompter.say("Let's determine who makes the first move.")?;
        let hmac = self.commit(Purpose::FirstMove)?;
        self.prompter.say(format_args!(
            "I selected a random value in the range 0..1 (HMAC={hmac})."
        ))?;
        self.prompter.say("Try to guess my selection.")?;

        let Some(guess) = self.prompter.ask(&Menu::numbers(2), ctx)? else {
            return self.abort();
        };
        self.transcript.record(TranscriptEntry::Guess { guess });
        let number = self.reveal(Purpose::FirstMove)?;

        if guess == number {
            self.state.first_mover = Some(Party::Player);
            self.prompter.say("You guessed right, you make the first move.")?;
        } else {
            self.state.first_mover = Some(Party::House);
            let dice = ctx.config.strategy.pick(ctx.matrix, None);
            self.take_dice(ctx, Party::House, dice)?;
        }
        Ok(Transition::Next(Phase::ChooseDice))
    }

    fn choose_dice(&mut self, ctx: &GameContext<'_>) -> RoundResult<Transition> {
        self.prompter.say("Choose your dice:")?;
        let menu = Menu::dice(ctx.dice, self.state.house_dice);
        let Some(choice) = self.prompter.ask(&menu, ctx)? else {
            return self.abort();
        };
        let player = choice as usize;
        self.take_dice(ctx, Party::Player, player)?;

        if self.state.house_dice.is_none() {
            let dice = ctx.config.strategy.pick(ctx.matrix, Some(player));
            self.take_dice(ctx, Party::House, dice)?;
        }
        Ok(Transition::Next(Phase::HouseThrow))
    }

    fn throw(&mut self, ctx: &GameContext<'_>, party: Party) -> RoundResult<Transition> {
        let dice_index = match party {
            Party::House => self.state.house_dice,
            Party::Player => self.state.player_dice,
        }
        .ok_or(RoundError::OutOfOrder("throw before dice were chosen"))?;
        let dice = ctx
            .dice
            .get(dice_index)
            .ok_or(RoundError::OutOfOrder("chosen dice is not in the set"))?;

        self.prompter.say(match party {
            Party::House => "It's time for my throw.",
            Party::Player => "It's time for your throw.",
        })?;
        let purpose = Purpose::for_throw(party);
        let hmac = self.commit(purpose)?;
        self.prompter.say(format_args!(
            "I selected a random value in the range 0..{} (HMAC={hmac}).",
            MODULUS - 1
        ))?;
        self.prompter.say(format_args!("Add your number modulo {MODULUS}."))?;

        let Some(supplied) = self.prompter.ask(&Menu::numbers(MODULUS), ctx)? else {
            return self.abort();
        };
        let committed = self.reveal(purpose)?;

        let face_index = Throw::face_index_for(committed, supplied);
        let face = dice.faces()[face_index];
        self.prompter.say(format_args!(
            "The fair number generation result is {committed} + {supplied} = {face_index} (mod {MODULUS})."
        ))?;
        self.prompter.say(match party {
            Party::House => format!("My throw is {face}."),
            Party::Player => format!("Your throw is {face}."),
        })?;

        let throw = Throw {
            party,
            dice: dice_index,
            committed,
            supplied,
            face_index,
            face,
        };
        self.transcript.record(TranscriptEntry::Throw(throw));
        debug!(%party, face_index, face, "throw");

        let next = match party {
            Party::House => {
                self.state.house_throw = Some(throw);
                Phase::PlayerThrow
            }
            Party::Player => {
                self.state.player_throw = Some(throw);
                Phase::Resolve
            }
        };
        Ok(Transition::Next(next))
    }

    fn resolve(&mut self) -> RoundResult<Transition> {
        let (Some(house), Some(player)) = (self.state.house_throw, self.state.player_throw) else {
            return Err(RoundError::OutOfOrder("resolve before both throws"));
        };

        let tie = house.face == player.face;
        let winner = if player.face > house.face {
            self.prompter.say(format_args!("You win ({} > {})!", player.face, house.face))?;
            Party::Player
        } else if tie {
            self.prompter.say(format_args!(
                "It's a tie ({} = {}), ties go to the house.",
                player.face, house.face
            ))?;
            Party::House
        } else {
            self.prompter.say(format_args!("I win ({} > {})!", house.face, player.face))?;
            Party::House
        };

        Ok(Transition::Done(RoundOutcome::Finished {
            winner,
            tie,
            house,
            player,
        }))
    }

    fn abort(&mut self) -> RoundResult<Transition> {
        let phase = self.state.phase;
        info!(?phase, "player exited");
        self.state.pending = None;
        self.held = None;
        self.prompter.say("Round aborted, no winner.")?;
        Ok(Transition::Done(RoundOutcome::Aborted { phase }))
    }

    fn take_dice(&mut self, ctx: &GameContext<'_>, party: Party, index: usize) -> RoundResult<()> {
        let dice = ctx
            .dice
            .get(index)
            .ok_or(RoundError::OutOfOrder("chosen dice is not in the set"))?;
        match party {
            Party::House => {
                self.state.house_dice = Some(index);
                let verb = if self.state.player_dice.is_some() {
                    "I choose"
                } else {
                    "I make the first move and choose"
                };
                self.prompter.say(format_args!("{verb} the {dice} dice."))?;
            }
            Party::Player => {
                self.state.player_dice = Some(index);
                self.prompter.say(format_args!("You choose the {dice} dice."))?;
            }
        }
        self.transcript.record(TranscriptEntry::DiceChoice { party, dice: index });
        Ok(())
    }

    /// Commit for `purpose`, hold the secret until [`Self::reveal`], and
    /// return the digest to publish.
    fn commit(&mut self, purpose: Purpose) -> RoundResult<Digest> {
        let committed = self.generator.commit(purpose.range())?;
        let hmac = *committed.hmac();
        self.transcript.record(TranscriptEntry::Commit {
            purpose,
            range: committed.range(),
            hmac,
        });
        self.state.pending = Some(hmac);
        self.held = Some(committed);
        Ok(hmac)
    }

    /// Disclose the held commitment and publish its key.
    fn reveal(&mut self, purpose: Purpose) -> RoundResult<u32> {
        let committed = self
            .held
            .take()
            .ok_or(RoundError::OutOfOrder("reveal without a commitment"))?;
        let revealed = committed.reveal()?;
        self.state.pending = None;

        let number = revealed.number;
        let (key, hmac) = (&revealed.key, &revealed.hmac);
        match purpose {
            Purpose::FirstMove => self.prompter.say(format_args!(
                "My selection: {number} (KEY={key}, HMAC={hmac})."
            ))?,
            Purpose::HouseThrow | Purpose::PlayerThrow => self.prompter.say(format_args!(
                "My number is {number} (KEY={key}, HMAC={hmac})."
            ))?,
        }
        self.transcript.record(TranscriptEntry::Reveal {
            purpose,
            number,
            key: revealed.key,
            hmac: revealed.hmac,
        });
        Ok(number)
    }
}
