use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::error::{ContentError, EngineError};
use crate::puzzle::{default_pool, Question};

/// Where the session's questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoolSource {
    Default,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    pool: Vec<Question>,
}

impl QuestionBank {
    pub fn new(pool: Vec<Question>, clue_count: usize) -> Result<Self, ContentError> {
        if pool.len() < clue_count {
            return Err(ContentError::TooFewQuestions {
                needed: clue_count,
                found: pool.len(),
            });
        }
        Ok(QuestionBank { pool })
    }

    /// Uses the custom pool when it is usable, otherwise the built-in one.
    /// Only fails if even the built-in pool is too small.
    pub fn resolve(
        custom: Option<Result<Vec<Question>, ContentError>>,
        clue_count: usize,
    ) -> Result<(Self, PoolSource), ContentError> {
        match custom.map(|pool| pool.and_then(|pool| Self::new(pool, clue_count))) {
            Some(Ok(bank)) => return Ok((bank, PoolSource::Custom)),
            Some(Err(err)) => warn!("custom question pool rejected, using defaults: {err}"),
            None => {}
        }
        Ok((Self::new(default_pool(), clue_count)?, PoolSource::Default))
    }

    /// Reorders the pool; contents are untouched.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool.shuffle(rng);
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.pool.get(index)
    }

    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    pub fn verify(&self, index: usize, choice: usize) -> Result<bool, EngineError> {
        let question = self.question(index).ok_or(EngineError::UnknownClue(index))?;
        Ok(question.is_correct(choice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn titles(pool: &[Question]) -> Vec<String> {
        let mut t: Vec<String> = pool.iter().map(|q| q.title.clone()).collect();
        t.sort();
        t
    }

    #[test]
    fn shuffle_keeps_the_multiset() {
        let mut bank = QuestionBank::new(default_pool(), 4).unwrap();
        let before = titles(bank.pool());
        let order_before: Vec<_> = bank.pool().iter().map(|q| q.title.clone()).collect();

        bank.shuffle(&mut StdRng::seed_from_u64(11));

        assert_eq!(titles(bank.pool()), before);
        let order_after: Vec<_> = bank.pool().iter().map(|q| q.title.clone()).collect();
        assert_ne!(order_after, order_before);
    }

    #[test]
    fn undersized_custom_pool_falls_back() {
        let short = default_pool().into_iter().take(2).collect();
        let (bank, source) = QuestionBank::resolve(Some(Ok(short)), 4).unwrap();
        assert_eq!(source, PoolSource::Default);
        assert_eq!(bank.pool().len(), 15);
    }

    #[test]
    fn invalid_custom_pool_falls_back() {
        let err = ContentError::OptionCount { index: 0, found: 2 };
        let (_, source) = QuestionBank::resolve(Some(Err(err)), 4).unwrap();
        assert_eq!(source, PoolSource::Default);
    }

    #[test]
    fn usable_custom_pool_is_kept() {
        let custom: Vec<_> = default_pool().into_iter().rev().take(4).collect();
        let (bank, source) = QuestionBank::resolve(Some(Ok(custom.clone())), 4).unwrap();
        assert_eq!(source, PoolSource::Custom);
        assert_eq!(bank.pool(), custom.as_slice());
    }

    #[test]
    fn too_many_clues_for_any_pool() {
        assert!(matches!(
            QuestionBank::resolve(None, 16),
            Err(ContentError::TooFewQuestions {
                needed: 16,
                found: 15
            })
        ));
    }

    #[test]
    fn verify_checks_correct_index() {
        let bank = QuestionBank::new(default_pool(), 4).unwrap();
        let q = bank.question(0).unwrap();
        assert_eq!(bank.verify(0, q.correct), Ok(true));
        assert_eq!(bank.verify(0, (q.correct + 1) % 4), Ok(false));
        assert_eq!(bank.verify(99, 0), Err(EngineError::UnknownClue(99)));
    }
}
