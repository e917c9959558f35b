//! Deck sampling: picks the matching pairs and distractors for one test.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SetupError};
use crate::types::{Flashcard, TestParams};

/// Flashcards drawn from a deck for a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Cards shown as a linked question and answer.
    pub matching: Vec<Flashcard>,
    /// Cards whose question appears without an answer.
    pub distractors: Vec<Flashcard>,
}

/// Draw a sample without replacement.
///
/// The deck is copied and shuffled with a uniform permutation, then the
/// first `matching_pairs` cards become matching pairs and the next
/// `distractor_count` become distractors. The input deck is not modified.
pub fn sample<R: Rng + ?Sized>(
    deck: &[Flashcard],
    params: TestParams,
    rng: &mut R,
) -> Result<Sample> {
    let Some(required) = params.total_questions() else {
        return Err(SetupError::InsufficientData {
            required: usize::MAX,
            available: deck.len(),
        });
    };
    if deck.len() < required {
        return Err(SetupError::InsufficientData {
            required,
            available: deck.len(),
        });
    }

    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(required);
    let distractors = shuffled.split_off(params.matching_pairs);

    tracing::debug!(
        matching = shuffled.len(),
        distractors = distractors.len(),
        deck = deck.len(),
        "sampled deck"
    );

    Ok(Sample {
        matching: shuffled,
        distractors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn deck(size: usize) -> Vec<Flashcard> {
        (0..size)
            .map(|i| Flashcard::new(format!("Question {i}?"), format!("Answer {i}.")))
            .collect()
    }

    #[test]
    fn test_sample_sizes_and_disjoint() {
        let deck = deck(25);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = sample(&deck, TestParams::new(6, 4), &mut rng).unwrap();
            assert_eq!(sample.matching.len(), 6);
            assert_eq!(sample.distractors.len(), 4);

            let matching: HashSet<_> = sample.matching.iter().collect();
            let distractors: HashSet<_> = sample.distractors.iter().collect();
            assert_eq!(matching.len(), 6);
            assert_eq!(distractors.len(), 4);
            assert!(matching.is_disjoint(&distractors));
            assert!(sample.matching.iter().all(|card| deck.contains(card)));
        }
    }

    #[test]
    fn test_exact_size_deck_uses_every_card() {
        let deck = deck(10);
        let mut rng = StdRng::seed_from_u64(7);
        let sample = sample(&deck, TestParams::default(), &mut rng).unwrap();

        let mut drawn: Vec<_> = sample
            .matching
            .iter()
            .chain(sample.distractors.iter())
            .cloned()
            .collect();
        drawn.sort_by(|a, b| a.question.cmp(&b.question));
        let mut expected = deck.clone();
        expected.sort_by(|a, b| a.question.cmp(&b.question));
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_insufficient_data() {
        let deck = deck(9);
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample(&deck, TestParams::default(), &mut rng).unwrap_err();
        match err {
            SetupError::InsufficientData {
                required,
                available,
            } => {
                assert_eq!(required, 10);
                assert_eq!(available, 9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_deck_is_insufficient() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = sample(&[], TestParams::new(1, 0), &mut rng);
        assert!(matches!(result, Err(SetupError::InsufficientData { .. })));
    }

    #[test]
    fn test_oversized_request_is_insufficient() {
        let deck = deck(12);
        let mut rng = StdRng::seed_from_u64(1);

        let err = sample(&deck, TestParams::new(usize::MAX, 1), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SetupError::InsufficientData {
                required: usize::MAX,
                available: 12
            }
        ));

        let err = sample(&deck, TestParams::new(1, usize::MAX), &mut rng).unwrap_err();
        assert!(matches!(err, SetupError::InsufficientData { .. }));
    }

    #[test]
    fn test_same_seed_same_sample() {
        let deck = deck(30);
        let first = sample(&deck, TestParams::default(), &mut StdRng::seed_from_u64(42)).unwrap();
        let second = sample(&deck, TestParams::default(), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_distractors() {
        let deck = deck(6);
        let mut rng = StdRng::seed_from_u64(3);
        let sample = sample(&deck, TestParams::new(6, 0), &mut rng).unwrap();
        assert_eq!(sample.matching.len(), 6);
        assert!(sample.distractors.is_empty());
    }
}
