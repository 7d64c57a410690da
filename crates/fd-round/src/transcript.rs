//! A verifiable record of everything published during a round.
//!
//! Commits, reveals, dice choices and throws are appended in order.
//! [`Transcript::verify`] replays them and checks every reveal against the
//! digest published before it, so either side can audit a finished round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use fd_dice::DiceSet;
use fd_fair::{Digest, Revealed, SecretKey};

use crate::error::{RoundError, RoundResult};
use crate::round::{MODULUS, Party, Throw};

/// Which decision a commitment feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// The coin flip deciding who picks dice first.
    FirstMove,
    /// The house number for the house throw.
    HouseThrow,
    /// The house number for the player throw.
    PlayerThrow,
}

impl Purpose {
    /// The range the house must commit over for this purpose.
    pub fn range(self) -> u32 {
        match self {
            Self::FirstMove => 2,
            Self::HouseThrow | Self::PlayerThrow => MODULUS,
        }
    }

    /// The commitment purpose behind a throw by `party`.
    pub fn for_throw(party: Party) -> Self {
        match party {
            Party::House => Self::HouseThrow,
            Party::Player => Self::PlayerThrow,
        }
    }
}

/// One published event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// A digest published before the counterparty answered.
    Commit {
        /// What the committed number is for.
        purpose: Purpose,
        /// Exclusive upper bound of the number.
        range: u32,
        /// The published digest.
        hmac: Digest,
    },
    /// A disclosed number and key.
    Reveal {
        /// What the number was for.
        purpose: Purpose,
        /// The committed number.
        number: u32,
        /// The key the digest was computed with.
        key: SecretKey,
        /// The digest as published at commit time.
        hmac: Digest,
    },
    /// The player's answer to the first-move commitment.
    Guess {
        /// The guessed value.
        guess: u32,
    },
    /// A side took a dice.
    DiceChoice {
        /// Who took it.
        party: Party,
        /// Index into the dice set.
        dice: usize,
    },
    /// A resolved throw.
    Throw(Throw),
}

/// The full record of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique identifier of the round.
    pub round_id: Uuid,
    /// When the round started.
    pub started_at: DateTime<Utc>,
    /// The dice set the round was played with.
    pub dice: DiceSet,
    /// Published events in order.
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Start an empty transcript for a round over `dice`.
    pub fn new(dice: DiceSet) -> Self {
        Self {
            round_id: Uuid::new_v4(),
            started_at: Utc::now(),
            dice,
            entries: Vec::new(),
        }
    }

    /// Append an event.
    pub fn record(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replay the transcript and check that it holds together.
    ///
    /// Every reveal must follow a commit with the same purpose and digest,
    /// reproduce that digest, and lie in range. The player's guess must
    /// precede the first-move reveal, and the side it entitles must pick
    /// dice first. The two sides must hold different dice. The house throws
    /// once, then the player throws once. Every throw must use the revealed
    /// number, the dice its party chose, and the face at
    /// `(committed + supplied) mod 6`. Returns the number of verified
    /// reveals.
    pub fn verify(&self) -> RoundResult<usize> {
        let mut pending: Option<(Purpose, u32, Digest)> = None;
        let mut revealed: Vec<(Purpose, u32)> = Vec::new();
        let mut guess: Option<u32> = None;
        let mut first_mover: Option<Party> = None;
        let mut house_dice = None;
        let mut player_dice = None;
        let mut throws = 0;

        for (index, entry) in self.entries.iter().enumerate() {
            let fail = |reason: String| RoundError::Transcript { index, reason };
            match entry {
                TranscriptEntry::Commit {
                    purpose,
                    range,
                    hmac,
                } => {
                    if pending.is_some() {
                        return Err(fail("commit before the previous reveal".into()));
                    }
                    if *range != purpose.range() {
                        return Err(fail(format!(
                            "range {range} for {purpose:?}, expected {}",
                            purpose.range()
                        )));
                    }
                    pending = Some((*purpose, *range, *hmac));
                }
                TranscriptEntry::Guess { guess: value } => {
                    if !matches!(pending, Some((Purpose::FirstMove, ..))) {
                        return Err(fail("guess without a first-move commit".into()));
                    }
                    if guess.replace(*value).is_some() {
                        return Err(fail("player guessed twice".into()));
                    }
                    if *value >= Purpose::FirstMove.range() {
                        return Err(fail(format!("guess {value} is out of range")));
                    }
                }
                TranscriptEntry::Reveal {
                    purpose,
                    number,
                    key,
                    hmac,
                } => {
                    let Some((committed_for, range, published)) = pending.take() else {
                        return Err(fail("reveal without a commit".into()));
                    };
                    if committed_for != *purpose {
                        return Err(fail(format!(
                            "reveal for {purpose:?} answers a commit for {committed_for:?}"
                        )));
                    }
                    if published != *hmac {
                        return Err(fail(format!(
                            "reveal quotes digest {hmac}, but {published} was published"
                        )));
                    }
                    if revealed.iter().any(|(p, _)| p == purpose) {
                        return Err(fail(format!("second reveal for {purpose:?}")));
                    }
                    let reveal = Revealed {
                        range,
                        number: *number,
                        key: key.clone(),
                        hmac: published,
                    };
                    reveal.verify().map_err(|e| fail(e.to_string()))?;
                    if *purpose == Purpose::FirstMove {
                        let Some(guess) = guess else {
                            return Err(fail("first move revealed before the guess".into()));
                        };
                        first_mover = Some(if guess == *number {
                            Party::Player
                        } else {
                            Party::House
                        });
                    }
                    revealed.push((*purpose, *number));
                }
                TranscriptEntry::DiceChoice { party, dice } => {
                    let Some(first) = first_mover else {
                        return Err(fail("dice chosen before the first move was settled".into()));
                    };
                    if *dice >= self.dice.len() {
                        return Err(fail(format!("dice index {dice} is out of range")));
                    }
                    if house_dice.is_none() && player_dice.is_none() && *party != first {
                        return Err(fail(format!(
                            "{party} picked dice first, but {first} won the first move"
                        )));
                    }
                    let (slot, other) = match party {
                        Party::House => (&mut house_dice, player_dice),
                        Party::Player => (&mut player_dice, house_dice),
                    };
                    if other == Some(*dice) {
                        return Err(fail(format!("dice {dice} is already taken")));
                    }
                    if slot.replace(*dice).is_some() {
                        return Err(fail(format!("{party} chose dice twice")));
                    }
                }
                TranscriptEntry::Throw(throw) => {
                    let expected = match throws {
                        0 => Party::House,
                        1 => Party::Player,
                        _ => return Err(fail("more than two throws".into())),
                    };
                    if throw.party != expected {
                        return Err(fail(format!("{} threw out of turn", throw.party)));
                    }
                    self.check_throw(throw, &revealed, house_dice, player_dice)
                        .map_err(fail)?;
                    throws += 1;
                }
            }
        }

        if pending.is_some() {
            debug!("transcript ends with an unrevealed commit");
        }
        Ok(revealed.len())
    }

    fn check_throw(
        &self,
        throw: &Throw,
        revealed: &[(Purpose, u32)],
        house_dice: Option<usize>,
        player_dice: Option<usize>,
    ) -> Result<(), String> {
        let purpose = Purpose::for_throw(throw.party);
        let Some(&(_, number)) = revealed.iter().rev().find(|(p, _)| *p == purpose) else {
            return Err(format!("{} throw without a revealed number", throw.party));
        };
        if throw.committed != number {
            return Err(format!(
                "{} throw uses {}, but {number} was revealed",
                throw.party, throw.committed
            ));
        }
        if throw.supplied >= MODULUS {
            return Err(format!("supplied number {} is out of range", throw.supplied));
        }
        let expected = Throw::face_index_for(throw.committed, throw.supplied);
        if throw.face_index != expected {
            return Err(format!(
                "face index {} should be ({} + {}) mod {MODULUS} = {expected}",
                throw.face_index, throw.committed, throw.supplied
            ));
        }
        let chosen = match throw.party {
            Party::House => house_dice,
            Party::Player => player_dice,
        };
        if chosen != Some(throw.dice) {
            return Err(format!("{} threw a dice it did not choose", throw.party));
        }
        let face = self
            .dice
            .get(throw.dice)
            .and_then(|d| d.face(throw.face_index));
        if face != Some(throw.face) {
            return Err(format!(
                "face {} does not match dice {} at index {}",
                throw.face, throw.dice, throw.face_index
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_fair::{KEY_LEN, mac};

    fn key() -> SecretKey {
        SecretKey::from_bytes([7; KEY_LEN])
    }

    fn commit(purpose: Purpose, number: u32) -> TranscriptEntry {
        TranscriptEntry::Commit {
            purpose,
            range: purpose.range(),
            hmac: mac(&key(), number).unwrap(),
        }
    }

    fn reveal(purpose: Purpose, number: u32) -> TranscriptEntry {
        TranscriptEntry::Reveal {
            purpose,
            number,
            key: key(),
            hmac: mac(&key(), number).unwrap(),
        }
    }

    fn choice(party: Party, dice: usize) -> TranscriptEntry {
        TranscriptEntry::DiceChoice { party, dice }
    }

    fn throw(
        party: Party,
        dice: usize,
        committed: u32,
        supplied: u32,
        face: i32,
    ) -> TranscriptEntry {
        TranscriptEntry::Throw(Throw {
            party,
            dice,
            committed,
            supplied,
            face_index: Throw::face_index_for(committed, supplied),
            face,
        })
    }

    /// The house wins the first move with 1 against a guess of 0, takes
    /// [6,8,1,1,8,6] and the player takes [7,5,3,7,5,3].
    fn sample() -> Transcript {
        let dice = DiceSet::parse(["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        let mut t = Transcript::new(dice);
        for entry in [
            commit(Purpose::FirstMove, 1),
            TranscriptEntry::Guess { guess: 0 },
            reveal(Purpose::FirstMove, 1),
            choice(Party::House, 1),
            choice(Party::Player, 2),
            commit(Purpose::HouseThrow, 5),
            reveal(Purpose::HouseThrow, 5),
            throw(Party::House, 1, 5, 3, 1),
            commit(Purpose::PlayerThrow, 2),
            reveal(Purpose::PlayerThrow, 2),
            throw(Party::Player, 2, 2, 4, 7),
        ] {
            t.record(entry);
        }
        t
    }

    fn failing_index(t: &Transcript) -> usize {
        match t.verify().unwrap_err() {
            RoundError::Transcript { index, .. } => index,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_transcript_verifies() {
        let t = sample();
        assert_eq!(t.len(), 11);
        assert!(!t.is_empty());
        assert_eq!(t.verify().unwrap(), 3);
    }

    #[test]
    fn json_round_trip() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r#""kind":"reveal""#));
        assert!(json.contains(r#""kind":"guess","guess":0"#));
        assert!(json.contains(r#""purpose":"first_move""#));
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.verify().unwrap(), 3);
    }

    #[test]
    fn altered_reveal_is_caught() {
        let mut t = sample();
        if let TranscriptEntry::Reveal { number, .. } = &mut t.entries[2] {
            *number = 0;
        }
        assert_eq!(failing_index(&t), 2);
        assert!(t.verify().unwrap_err().is_violation());
    }

    #[test]
    fn reveal_quoting_other_digest_is_caught() {
        let mut t = sample();
        if let TranscriptEntry::Reveal { hmac, .. } = &mut t.entries[6] {
            *hmac = mac(&key(), 4).unwrap();
        }
        assert_eq!(failing_index(&t), 6);
    }

    #[test]
    fn wrong_face_index_is_caught() {
        let mut t = sample();
        if let TranscriptEntry::Throw(throw) = &mut t.entries[7] {
            throw.face_index = 0;
            throw.face = 6;
        }
        assert_eq!(failing_index(&t), 7);
    }

    #[test]
    fn throw_must_use_revealed_number() {
        let mut t = sample();
        t.entries[10] = throw(Party::Player, 2, 3, 4, 5);
        assert_eq!(failing_index(&t), 10);
    }

    #[test]
    fn throw_must_show_dice_face() {
        let mut t = sample();
        if let TranscriptEntry::Throw(throw) = &mut t.entries[10] {
            throw.face = 9;
        }
        assert_eq!(failing_index(&t), 10);
    }

    #[test]
    fn throw_must_use_chosen_dice() {
        let mut t = sample();
        t.entries[10] = throw(Party::Player, 0, 2, 4, 2);
        assert_eq!(failing_index(&t), 10);
    }

    #[test]
    fn reveal_without_commit_is_caught() {
        let mut t = sample();
        t.entries.remove(5);
        assert_eq!(failing_index(&t), 5);
    }

    #[test]
    fn commit_range_must_match_purpose() {
        let mut t = sample();
        if let TranscriptEntry::Commit { range, .. } = &mut t.entries[0] {
            *range = 6;
        }
        assert_eq!(failing_index(&t), 0);
    }

    #[test]
    fn dice_chosen_twice_is_caught() {
        let mut t = sample();
        t.entries.insert(4, choice(Party::House, 0));
        assert_eq!(failing_index(&t), 4);
    }

    #[test]
    fn trailing_commit_is_allowed() {
        let mut t = sample();
        t.entries.truncate(9);
        assert_eq!(t.verify().unwrap(), 2);
    }

    #[test]
    fn sides_cannot_share_a_dice() {
        let mut t = sample();
        t.entries[4] = choice(Party::Player, 1);
        assert_eq!(failing_index(&t), 4);
    }

    #[test]
    fn missing_guess_is_caught() {
        let mut t = sample();
        t.entries.remove(1);
        assert_eq!(failing_index(&t), 1);
    }

    #[test]
    fn guess_must_be_in_range() {
        let mut t = sample();
        t.entries[1] = TranscriptEntry::Guess { guess: 2 };
        assert_eq!(failing_index(&t), 1);
    }

    #[test]
    fn guess_must_answer_first_move_commit() {
        let mut t = sample();
        t.entries.insert(6, TranscriptEntry::Guess { guess: 0 });
        assert_eq!(failing_index(&t), 6);
    }

    #[test]
    fn first_pick_follows_guess() {
        // A right guess hands the first pick to the player.
        let mut t = sample();
        t.entries[1] = TranscriptEntry::Guess { guess: 1 };
        assert_eq!(failing_index(&t), 3);

        t.entries.swap(3, 4);
        assert_eq!(t.verify().unwrap(), 3);
    }

    #[test]
    fn dice_choice_needs_settled_first_move() {
        let mut t = sample();
        let early = t.entries.remove(3);
        t.entries.insert(0, early);
        assert_eq!(failing_index(&t), 0);
    }

    #[test]
    fn house_throws_first() {
        let mut t = sample();
        let player: Vec<TranscriptEntry> = t.entries.drain(8..).collect();
        t.entries.splice(5..5, player);
        assert_eq!(failing_index(&t), 7);
    }

    #[test]
    fn repeated_throw_is_caught() {
        let mut t = sample();
        let again = t.entries[7].clone();
        t.entries.insert(8, again);
        assert_eq!(failing_index(&t), 8);

        let mut t = sample();
        let again = t.entries[10].clone();
        t.entries.push(again);
        assert_eq!(failing_index(&t), 11);
    }

    #[test]
    fn second_reveal_for_purpose_is_caught() {
        let mut t = sample();
        t.entries.push(commit(Purpose::HouseThrow, 5));
        t.entries.push(reveal(Purpose::HouseThrow, 5));
        assert_eq!(failing_index(&t), 12);
    }
}
