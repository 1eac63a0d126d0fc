use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::bank::{PoolSource, QuestionBank};
use super::clues::{AnswerVerdict, ClueId, ClueSet, Gate, Interaction};
use super::locations::{LocationMap, SlotId};
use super::lock::{ChainState, CodeOutcome, DoorOutcome, KeyOutcome, SafeState};
use crate::config::{GameConfig, Mode, DOOR_KEY, SAFE_KEY};
use crate::error::{ContentError, EngineError, InitError};
use crate::puzzle::types::validate_pool;
use crate::puzzle::{decode_payload, Question, OPTION_COUNT};

/// Everything needed to start a game: the room config and an optional
/// custom question pool (still possibly invalid).
#[derive(Debug, Default)]
pub struct GameSetup {
    pub config: GameConfig,
    pub custom_pool: Option<Result<Vec<Question>, ContentError>>,
}

impl GameSetup {
    pub fn new(config: GameConfig) -> Self {
        GameSetup {
            config,
            custom_pool: None,
        }
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.custom_pool = Some(Ok(questions));
        self
    }

    /// Applies a share-link payload. A payload mode overrides the config;
    /// bad content is kept as an error so init can fall back and log it.
    pub fn with_share_payload(mut self, encoded: &str) -> Self {
        match decode_payload(encoded) {
            Ok(payload) => {
                if let Some(mode) = payload.mode {
                    self.config.mode = mode;
                }
                if let Some(raw) = payload.questions {
                    self.custom_pool = Some(validate_pool(raw));
                }
            }
            Err(err) => {
                warn!("ignoring share payload: {err}");
                self.custom_pool = Some(Err(err));
            }
        }
        self
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub locations: BTreeMap<String, Option<SlotId>>,
    pub clues: Vec<ClueView>,
    pub safe: SafeState,
    pub has_key: bool,
    pub chain: Option<ChainState>,
    pub escaped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueView {
    pub id: ClueId,
    pub location: Option<String>,
    pub solved: bool,
    /// Only revealed once solved.
    pub digit: Option<char>,
}

/// One playthrough. All state lives here; every operation runs to completion
/// before returning.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    rng: StdRng,
    locations: LocationMap,
    clues: ClueSet,
    bank: QuestionBank,
    pool_source: PoolSource,
    safe: SafeState,
    has_key: bool,
    chain: Option<ChainState>,
    escaped: bool,
}

impl GameSession {
    pub fn new_game(setup: GameSetup) -> Result<Self, InitError> {
        Self::with_rng(setup, StdRng::from_entropy())
    }

    pub fn with_seed(setup: GameSetup, seed: u64) -> Result<Self, InitError> {
        Self::with_rng(setup, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(setup: GameSetup, rng: StdRng) -> Result<Self, InitError> {
        let GameSetup {
            config,
            custom_pool,
        } = setup;
        config.validate()?;
        let (bank, source) = QuestionBank::resolve(custom_pool, config.clue_count())?;
        Self::assemble(config, bank, source, rng)
    }

    /// A fresh game with the same config and question pool.
    pub fn restart(&mut self) -> Result<Self, InitError> {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        Self::assemble(self.config.clone(), self.bank.clone(), self.pool_source, rng)
    }

    fn assemble(
        config: GameConfig,
        mut bank: QuestionBank,
        pool_source: PoolSource,
        mut rng: StdRng,
    ) -> Result<Self, InitError> {
        let clue_count = config.clue_count();
        bank.shuffle(&mut rng);
        let locations = LocationMap::init(config.locations.clone(), clue_count, &mut rng)?;
        let clues = ClueSet::new(&config.unlock_code);
        let chain = config
            .mode
            .is_ordered()
            .then(|| ChainState::new(clue_count as u32));

        info!(
            mode = config.mode.label(),
            clues = clue_count,
            questions = bank.pool().len(),
            source = ?pool_source,
            "new game"
        );

        Ok(GameSession {
            config,
            rng,
            locations,
            clues,
            bank,
            pool_source,
            safe: SafeState::default(),
            has_key: false,
            chain,
            escaped: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn locations(&self) -> &LocationMap {
        &self.locations
    }

    pub fn clues(&self) -> &ClueSet {
        &self.clues
    }

    pub fn pool(&self) -> &[Question] {
        self.bank.pool()
    }

    pub fn pool_source(&self) -> PoolSource {
        self.pool_source
    }

    pub fn safe(&self) -> SafeState {
        self.safe
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn chain(&self) -> Option<ChainState> {
        self.chain
    }

    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    pub fn all_solved(&self) -> bool {
        self.clues.all_solved()
    }

    pub fn select_question(&self, clue: ClueId) -> Result<&Question, EngineError> {
        let clue = self.clues.get(clue).ok_or(EngineError::UnknownClue(clue))?;
        self.bank
            .question(clue.question_ref)
            .ok_or(EngineError::UnknownClue(clue.id))
    }

    /// Works out what is at `key`. Pure read except in trail mode, where a
    /// visit can move or reset the chain.
    pub fn resolve_interaction(&mut self, key: &str) -> Interaction<'_> {
        match key {
            SAFE_KEY => return self.safe_interaction(),
            DOOR_KEY => return self.door_interaction(),
            _ => {}
        }
        if !self.locations.contains(key) {
            debug!(key, "interaction with unknown location");
            return Interaction::Unknown;
        }
        let Some(slot) = self.locations.slot_at(key) else {
            return Interaction::Empty;
        };
        let Some((solved, digit)) = self.clues.get(slot).map(|c| (c.is_solved(), c.digit)) else {
            return Interaction::Unknown;
        };

        if let Some(chain) = self.chain.as_mut() {
            let expected = chain.expected_slot();
            if expected == Some(slot) {
                if solved {
                    let step = chain.advance();
                    debug!(slot, step, "trail retraced");
                    return Interaction::Retraced {
                        clue: slot,
                        digit,
                        step,
                    };
                }
            } else if solved {
                return Interaction::AlreadySolved { clue: slot, digit };
            } else {
                chain.reset();
                return Interaction::OutOfOrder {
                    clue: slot,
                    expected,
                };
            }
        } else if solved {
            return Interaction::AlreadySolved { clue: slot, digit };
        }

        match self.select_question(slot) {
            Ok(question) => Interaction::Question {
                clue: slot,
                question,
            },
            Err(_) => Interaction::Unknown,
        }
    }

    fn safe_interaction(&self) -> Interaction<'_> {
        if self.config.mode.code_opens_door() {
            return Interaction::SafeDisabled;
        }
        if self.safe.unlocked {
            return Interaction::SafeOpen {
                key_taken: self.has_key,
            };
        }
        Interaction::Keypad {
            gate: Gate::Safe,
            ready: self.clues.all_solved(),
            locked_out: self.safe.exhausted(),
        }
    }

    fn door_interaction(&self) -> Interaction<'_> {
        if self.config.mode.code_opens_door() && !self.escaped {
            return Interaction::Keypad {
                gate: Gate::Door,
                ready: self.clues.all_solved(),
                locked_out: self.safe.exhausted(),
            };
        }
        Interaction::Door {
            has_key: self.has_key,
        }
    }

    pub fn submit_answer(
        &mut self,
        clue: ClueId,
        choice: usize,
    ) -> Result<AnswerVerdict, EngineError> {
        if choice >= OPTION_COUNT {
            return Err(EngineError::ChoiceOutOfRange { choice });
        }
        let entry = self.clues.get(clue).ok_or(EngineError::UnknownClue(clue))?;
        if entry.is_solved() {
            return Ok(AnswerVerdict::AlreadySolved);
        }
        let digit = entry.digit;

        if let Some(chain) = self.chain.as_mut() {
            if chain.expected_slot() != Some(clue) {
                chain.reset();
                return Ok(AnswerVerdict::OutOfOrder);
            }
        }

        let question_ref = entry.question_ref;
        if self.bank.verify(question_ref, choice)? {
            self.clues.mark_solved(clue)?;
            let step = self.chain.as_mut().map(ChainState::advance);
            debug!(clue, ?step, "clue solved");
            Ok(AnswerVerdict::Correct { clue, digit, step })
        } else {
            let chain_reset = match self.chain.as_mut() {
                Some(chain) => {
                    chain.reset();
                    true
                }
                None => false,
            };
            debug!(clue, chain_reset, "wrong answer");
            Ok(AnswerVerdict::Incorrect { chain_reset })
        }
    }

    /// Tries a combination on the safe, or on the door in code-door mode.
    pub fn attempt_code(&mut self, code: &str) -> CodeOutcome {
        let outcome = self.safe.attempt(code.trim(), &self.config.unlock_code);
        match outcome {
            CodeOutcome::Unlocked if self.config.mode.code_opens_door() => {
                self.escaped = true;
                info!("door unlocked by code, escaped");
            }
            CodeOutcome::Unlocked => info!("safe unlocked"),
            CodeOutcome::LockedOut => warn!("keypad locked out"),
            _ => {}
        }
        outcome
    }

    /// Shown on the keypad once only one attempt is left.
    pub fn safe_hint(&self) -> Option<&str> {
        if self.safe.unlocked || self.safe.attempts_remaining > 1 {
            return None;
        }
        self.config.safe_hint.as_deref()
    }

    pub fn take_key(&mut self) -> KeyOutcome {
        if self.config.mode.code_opens_door() {
            return KeyOutcome::NoSafe;
        }
        if !self.safe.unlocked {
            return KeyOutcome::SafeLocked;
        }
        if self.has_key {
            return KeyOutcome::AlreadyHeld;
        }
        self.has_key = true;
        info!("skeleton key taken");
        KeyOutcome::Taken
    }

    pub fn open_door(&mut self) -> DoorOutcome {
        if self.escaped {
            return DoorOutcome::Escaped;
        }
        if self.config.mode.code_opens_door() {
            return DoorOutcome::NeedsCode;
        }
        if !self.has_key {
            return DoorOutcome::Locked;
        }
        self.escaped = true;
        info!("door opened with key, escaped");
        DoorOutcome::Escaped
    }

    pub fn advance_step(&mut self) -> Result<u32, EngineError> {
        self.chain
            .as_mut()
            .map(ChainState::advance)
            .ok_or(EngineError::NotTrailMode("advance_step"))
    }

    pub fn reset_chain(&mut self) -> Result<(), EngineError> {
        let chain = self
            .chain
            .as_mut()
            .ok_or(EngineError::NotTrailMode("reset_chain"))?;
        chain.reset();
        Ok(())
    }

    pub fn shuffle_all_clues(&mut self) -> BTreeMap<String, Option<SlotId>> {
        let map = self.locations.shuffle(&mut self.rng);
        debug!("all clues shuffled");
        map
    }

    pub fn move_clue(&mut self, slot: SlotId, from: &str) -> Result<Option<String>, EngineError> {
        let moved = self.locations.move_slot(slot, from, &mut self.rng)?;
        match &moved {
            Some(to) => debug!(slot, from, to = to.as_str(), "clue moved"),
            None => debug!(slot, from, "no empty location to move clue to"),
        }
        Ok(moved)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let clues = self
            .clues
            .iter()
            .map(|c| ClueView {
                id: c.id,
                location: self.locations.location_of(c.id).map(str::to_string),
                solved: c.is_solved(),
                digit: c.is_solved().then_some(c.digit),
            })
            .collect();

        SessionSnapshot {
            mode: self.config.mode,
            locations: self.locations.to_map(),
            clues,
            safe: self.safe,
            has_key: self.has_key,
            chain: self.chain,
            escaped: self.escaped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: Mode, seed: u64) -> GameSession {
        let setup = GameSetup::new(GameConfig::default().with_mode(mode));
        GameSession::with_seed(setup, seed).unwrap()
    }

    fn correct_choice(game: &GameSession, clue: ClueId) -> usize {
        game.select_question(clue).unwrap().correct
    }

    fn wrong_choice(game: &GameSession, clue: ClueId) -> usize {
        (correct_choice(game, clue) + 1) % OPTION_COUNT
    }

    fn location(game: &GameSession, clue: ClueId) -> String {
        game.locations().location_of(clue).unwrap().to_string()
    }

    #[test]
    fn new_game_has_four_placed_clues_and_full_attempts() {
        let game = session(Mode::ClueHunt, 1);
        let snap = game.snapshot();
        assert_eq!(snap.locations.values().flatten().count(), 4);
        assert_eq!(snap.safe.attempts_remaining, 3);
        assert_eq!(snap.chain, None);
        assert!(snap.clues.iter().all(|c| !c.solved && c.digit.is_none()));
    }

    #[test]
    fn same_seed_replays_identically() {
        assert_eq!(session(Mode::ClueHunt, 8).snapshot(), session(Mode::ClueHunt, 8).snapshot());
        assert_eq!(session(Mode::ClueHunt, 8).pool(), session(Mode::ClueHunt, 8).pool());
    }

    #[test]
    fn empty_and_unknown_locations() {
        let mut game = session(Mode::ClueHunt, 2);
        let empty = game.locations().empty_keys().next().unwrap().to_string();
        assert_eq!(game.resolve_interaction(&empty), Interaction::Empty);
        assert_eq!(game.resolve_interaction("chandelier"), Interaction::Unknown);
    }

    #[test]
    fn opening_a_question_changes_nothing() {
        let mut game = session(Mode::ClueHunt, 3);
        let before = game.snapshot();
        let at = location(&game, 0);
        assert!(matches!(
            game.resolve_interaction(&at),
            Interaction::Question { clue: 0, .. }
        ));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn wrong_answer_keeps_the_same_question() {
        let mut game = session(Mode::ClueHunt, 4);
        let before = game.select_question(1).unwrap().clone();
        let at = location(&game, 1);
        let wrong = wrong_choice(&game, 1);

        assert_eq!(
            game.submit_answer(1, wrong),
            Ok(AnswerVerdict::Incorrect { chain_reset: false })
        );
        assert_eq!(game.select_question(1).unwrap(), &before);
        assert!(!game.clues().get(1).unwrap().is_solved());
        assert_eq!(location(&game, 1), at);
        assert_eq!(game.safe().attempts_remaining, 3);
    }

    #[test]
    fn solving_is_idempotent() {
        let mut game = session(Mode::ClueHunt, 5);
        let choice = correct_choice(&game, 2);
        let verdict = game.submit_answer(2, choice).unwrap();
        assert_eq!(
            verdict,
            AnswerVerdict::Correct {
                clue: 2,
                digit: '5',
                step: None
            }
        );
        assert_eq!(game.submit_answer(2, choice), Ok(AnswerVerdict::AlreadySolved));
        assert_eq!(game.clues().solved_count(), 1);

        let at = location(&game, 2);
        for _ in 0..3 {
            assert_eq!(
                game.resolve_interaction(&at),
                Interaction::AlreadySolved { clue: 2, digit: '5' }
            );
        }
    }

    #[test]
    fn bad_calls_are_engine_errors() {
        let mut game = session(Mode::ClueHunt, 6);
        assert_eq!(
            game.submit_answer(0, 4),
            Err(EngineError::ChoiceOutOfRange { choice: 4 })
        );
        assert_eq!(game.submit_answer(9, 0), Err(EngineError::UnknownClue(9)));
        assert_eq!(
            game.advance_step(),
            Err(EngineError::NotTrailMode("advance_step"))
        );
        assert_eq!(
            game.reset_chain(),
            Err(EngineError::NotTrailMode("reset_chain"))
        );
    }

    #[test]
    fn key_needs_unlocked_safe_and_is_a_flag() {
        let mut game = session(Mode::ClueHunt, 7);
        assert_eq!(game.take_key(), KeyOutcome::SafeLocked);
        assert!(!game.has_key());

        assert_eq!(game.attempt_code("1858"), CodeOutcome::Unlocked);
        assert_eq!(game.take_key(), KeyOutcome::Taken);
        assert_eq!(game.take_key(), KeyOutcome::AlreadyHeld);
        assert!(game.has_key());
    }

    #[test]
    fn door_needs_the_key() {
        let mut game = session(Mode::ClueHunt, 8);
        assert_eq!(game.open_door(), DoorOutcome::Locked);
        assert!(!game.is_escaped());
        game.attempt_code("1858");
        game.take_key();
        assert_eq!(game.open_door(), DoorOutcome::Escaped);
        assert!(game.is_escaped());
    }

    #[test]
    fn exhausted_safe_does_not_block_clues() {
        let mut game = session(Mode::ClueHunt, 9);
        for code in ["0000", "1111", "2222"] {
            game.attempt_code(code);
        }
        assert_eq!(game.attempt_code("1858"), CodeOutcome::Exhausted);
        assert!(matches!(
            game.resolve_interaction(SAFE_KEY),
            Interaction::Keypad {
                locked_out: true,
                ..
            }
        ));

        let choice = correct_choice(&game, 0);
        assert!(game.submit_answer(0, choice).unwrap().is_correct());
    }

    #[test]
    fn hint_appears_on_last_attempt() {
        let mut game = session(Mode::ClueHunt, 10);
        assert_eq!(game.safe_hint(), None);
        game.attempt_code("0000");
        assert_eq!(game.safe_hint(), None);
        game.attempt_code("0000");
        assert_eq!(game.safe_hint(), Some("A year of beginning."));
    }

    #[test]
    fn code_door_mode_escapes_on_code() {
        let mut game = session(Mode::CodeDoor, 11);
        assert_eq!(game.resolve_interaction(SAFE_KEY), Interaction::SafeDisabled);
        assert!(matches!(
            game.resolve_interaction(DOOR_KEY),
            Interaction::Keypad {
                gate: Gate::Door,
                ..
            }
        ));
        assert_eq!(game.open_door(), DoorOutcome::NeedsCode);
        assert_eq!(game.take_key(), KeyOutcome::NoSafe);

        assert_eq!(game.attempt_code("1858"), CodeOutcome::Unlocked);
        assert!(game.is_escaped());
        assert_eq!(game.open_door(), DoorOutcome::Escaped);
    }

    #[test]
    fn trail_chain_basics() {
        let mut game = session(Mode::Trail, 12);
        assert_eq!(game.chain().unwrap().current_step, 0);
        assert_eq!(game.advance_step(), Ok(1));
        game.reset_chain().unwrap();
        assert_eq!(game.chain().unwrap().current_step, 0);
        game.reset_chain().unwrap();
        assert_eq!(game.chain().unwrap().current_step, 0);
    }

    #[test]
    fn trail_wrong_answer_resets_progress() {
        let mut game = session(Mode::Trail, 13);
        let choice = correct_choice(&game, 0);
        assert_eq!(
            game.submit_answer(0, choice),
            Ok(AnswerVerdict::Correct {
                clue: 0,
                digit: '1',
                step: Some(1)
            })
        );

        let wrong = wrong_choice(&game, 1);
        assert_eq!(
            game.submit_answer(1, wrong),
            Ok(AnswerVerdict::Incorrect { chain_reset: true })
        );
        assert_eq!(game.chain().unwrap().current_step, 0);
        assert!(game.clues().get(0).unwrap().is_solved());
    }

    #[test]
    fn trail_out_of_order_visit_resets() {
        let mut game = session(Mode::Trail, 14);
        game.advance_step().unwrap();
        let third = location(&game, 2);
        assert_eq!(
            game.resolve_interaction(&third),
            Interaction::OutOfOrder {
                clue: 2,
                expected: Some(1)
            }
        );
        assert_eq!(game.chain().unwrap().current_step, 0);

        let choice = correct_choice(&game, 2);
        assert_eq!(game.submit_answer(2, choice), Ok(AnswerVerdict::OutOfOrder));
        assert!(!game.clues().get(2).unwrap().is_solved());
    }

    #[test]
    fn trail_retraces_solved_steps_after_reset() {
        let mut game = session(Mode::Trail, 15);
        let choice = correct_choice(&game, 0);
        game.submit_answer(0, choice).unwrap();
        game.reset_chain().unwrap();

        let first = location(&game, 0);
        assert_eq!(
            game.resolve_interaction(&first),
            Interaction::Retraced {
                clue: 0,
                digit: '1',
                step: 1
            }
        );
        assert_eq!(
            game.resolve_interaction(&first),
            Interaction::AlreadySolved { clue: 0, digit: '1' }
        );
        let second = location(&game, 1);
        assert!(matches!(
            game.resolve_interaction(&second),
            Interaction::Question { clue: 1, .. }
        ));
    }

    #[test]
    fn shuffle_and_move_keep_clue_identity() {
        let mut game = session(Mode::ClueHunt, 16);
        let choice = correct_choice(&game, 3);
        game.submit_answer(3, choice).unwrap();
        let before = game.snapshot().locations;

        let after = game.shuffle_all_clues();
        assert_ne!(before, after);
        assert!(game.clues().get(3).unwrap().is_solved());

        let from = location(&game, 1);
        let to = game.move_clue(1, &from).unwrap().unwrap();
        assert_eq!(game.locations().slot_at(&from), None);
        assert_eq!(game.locations().slot_at(&to), Some(1));
    }

    #[test]
    fn restart_is_a_fresh_session_with_same_pool() {
        let mut game = session(Mode::ClueHunt, 17);
        let choice = correct_choice(&game, 0);
        game.submit_answer(0, choice).unwrap();
        game.attempt_code("0000");

        let fresh = game.restart().unwrap();
        assert_eq!(fresh.clues().solved_count(), 0);
        assert_eq!(fresh.safe().attempts_remaining, 3);

        let mut a: Vec<_> = fresh.pool().iter().map(|q| q.title.clone()).collect();
        let mut b: Vec<_> = game.pool().iter().map(|q| q.title.clone()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_config_fails_init() {
        let mut config = GameConfig::default();
        config.unlock_code = "12x".to_string();
        assert!(matches!(
            GameSession::with_seed(GameSetup::new(config), 0),
            Err(InitError::Config(_))
        ));
    }
}
