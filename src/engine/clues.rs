use serde::Serialize;

use super::locations::SlotId;
use crate::error::EngineError;
use crate::puzzle::Question;

/// Clues are identified by their slot.
pub type ClueId = SlotId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub id: ClueId,
    /// The combination digit this clue reveals once solved.
    pub digit: char,
    /// Index of the bound question in the session's question bank.
    pub question_ref: usize,
    solved: bool,
}

impl Clue {
    pub fn is_solved(&self) -> bool {
        self.solved
    }
}

/// One clue per digit of the unlock code, in code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueSet {
    clues: Vec<Clue>,
}

impl ClueSet {
    pub fn new(unlock_code: &str) -> Self {
        let clues = unlock_code
            .chars()
            .enumerate()
            .map(|(id, digit)| Clue {
                id,
                digit,
                question_ref: id,
                solved: false,
            })
            .collect();
        ClueSet { clues }
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    pub fn get(&self, id: ClueId) -> Option<&Clue> {
        self.clues.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clue> {
        self.clues.iter()
    }

    /// Returns whether this call did the solving. Solved is terminal.
    pub fn mark_solved(&mut self, id: ClueId) -> Result<bool, EngineError> {
        let clue = self.clues.get_mut(id).ok_or(EngineError::UnknownClue(id))?;
        let newly = !clue.solved;
        clue.solved = true;
        Ok(newly)
    }

    pub fn solved_count(&self) -> usize {
        self.clues.iter().filter(|c| c.solved).count()
    }

    pub fn all_solved(&self) -> bool {
        self.clues.iter().all(|c| c.solved)
    }

    /// Digits found so far, sorted so the order gives nothing away.
    pub fn collected_digits(&self) -> Vec<char> {
        let mut digits: Vec<char> = self
            .clues
            .iter()
            .filter(|c| c.solved)
            .map(|c| c.digit)
            .collect();
        digits.sort_unstable();
        digits
    }
}

/// What the player finds when interacting with a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction<'a> {
    /// Not a key this room knows about.
    Unknown,
    /// A real object with nothing hidden in it.
    Empty,
    Question {
        clue: ClueId,
        question: &'a Question,
    },
    AlreadySolved {
        clue: ClueId,
        digit: char,
    },
    /// Trail mode: a solved clue visited again at its turn; the chain moved on.
    Retraced {
        clue: ClueId,
        digit: char,
        step: u32,
    },
    /// Trail mode: an unsolved clue visited before its turn; the chain reset.
    OutOfOrder {
        clue: ClueId,
        expected: Option<ClueId>,
    },
    Keypad {
        gate: Gate,
        /// Every clue is solved, so the full code is known.
        ready: bool,
        locked_out: bool,
    },
    SafeOpen {
        key_taken: bool,
    },
    /// Code-door mode has no working safe.
    SafeDisabled,
    Door {
        has_key: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gate {
    Safe,
    Door,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct {
        clue: ClueId,
        digit: char,
        /// New chain position in trail mode.
        step: Option<u32>,
    },
    Incorrect {
        chain_reset: bool,
    },
    AlreadySolved,
    /// Trail mode: answered a clue that is not the current step.
    OutOfOrder,
}

impl AnswerVerdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerVerdict::Correct { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clues_follow_code_digits() {
        let set = ClueSet::new("1858");
        assert_eq!(set.len(), 4);
        let digits: Vec<char> = set.iter().map(|c| c.digit).collect();
        assert_eq!(digits, ['1', '8', '5', '8']);
        assert!(set.iter().all(|c| !c.is_solved()));
    }

    #[test]
    fn solving_is_one_way_and_reported_once() {
        let mut set = ClueSet::new("1858");
        assert_eq!(set.mark_solved(2), Ok(true));
        assert_eq!(set.mark_solved(2), Ok(false));
        assert_eq!(set.solved_count(), 1);
        assert_eq!(set.mark_solved(7), Err(EngineError::UnknownClue(7)));
    }

    #[test]
    fn collected_digits_are_sorted() {
        let mut set = ClueSet::new("1858");
        set.mark_solved(1).unwrap();
        set.mark_solved(0).unwrap();
        set.mark_solved(2).unwrap();
        assert_eq!(set.collected_digits(), ['1', '5', '8']);
        assert!(!set.all_solved());
        set.mark_solved(3).unwrap();
        assert!(set.all_solved());
    }
}
