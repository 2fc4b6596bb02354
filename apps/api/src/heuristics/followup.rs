//! Follow-up selection: picks a question from the scenario's own category bank.
//!
//! The random draw is injected through `RandomSource` so callers can pin the choice.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::heuristics::values::Category;

/// A source of uniform index draws.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. `len` is always non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production random source: a small fast RNG seeded from OS entropy.
pub struct EntropySource {
    rng: SmallRng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Uniformly selects one of `category`'s follow-up questions.
pub fn select_followup(category: Category, rng: &mut dyn RandomSource) -> &'static str {
    let bank = category.followups();
    bank[rng.pick(bank.len())]
}

/// Draws again from the same bank, preferring a question other than `current`.
/// Falls back to the whole bank when no other option exists.
pub fn select_alternative(
    current: &str,
    category: Category,
    rng: &mut dyn RandomSource,
) -> &'static str {
    let bank = category.followups();
    let options: Vec<&'static str> = bank.iter().copied().filter(|q| *q != current).collect();
    let options = if options.is_empty() {
        bank.to_vec()
    } else {
        options
    };
    options[rng.pick(options.len())]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Always returns the same index (clamped into range).
    pub(crate) struct FixedPick(pub usize);

    impl RandomSource for FixedPick {
        fn pick(&mut self, len: usize) -> usize {
            self.0.min(len - 1)
        }
    }

    #[test]
    fn test_fixed_pick_selects_exact_question() {
        let q = select_followup(Category::Integrity, &mut FixedPick(1));
        assert_eq!(q, "How did you communicate your choice to others?");
    }

    #[test]
    fn test_selection_stays_in_category_bank() {
        let mut rng = EntropySource::with_seed(7);
        for category in Category::ALL {
            for _ in 0..50 {
                let q = select_followup(category, &mut rng);
                assert!(category.followups().contains(&q));
                for other in Category::ALL.iter().filter(|c| **c != category) {
                    assert!(!other.followups().contains(&q));
                }
            }
        }
    }

    #[test]
    fn test_entropy_source_covers_whole_bank() {
        let mut rng = EntropySource::with_seed(42);
        let bank = Category::Ownership.followups();
        let mut seen = [false; 3];
        for _ in 0..200 {
            let q = select_followup(Category::Ownership, &mut rng);
            let idx = bank.iter().position(|b| *b == q).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s), "all three questions should appear");
    }

    #[test]
    fn test_alternative_differs_from_current() {
        let bank = Category::Collaboration.followups();
        for current in bank {
            for pick in 0..3 {
                let alt = select_alternative(current, Category::Collaboration, &mut FixedPick(pick));
                assert_ne!(alt, *current);
                assert!(bank.contains(&alt));
            }
        }
    }

    #[test]
    fn test_alternative_with_foreign_current_draws_from_full_bank() {
        let alt = select_alternative(
            "Not a question from any bank",
            Category::CustomerFocus,
            &mut FixedPick(2),
        );
        assert_eq!(alt, Category::CustomerFocus.followups()[2]);
    }
}
