//! Random problem generation per difficulty tier.

use tally_types::{Difficulty, Problem};

/// Source of randomness for problem generation.
pub trait Picker: Send {
    /// Uniform integer in `low..=high`.
    fn pick(&mut self, low: u32, high: u32) -> u32;
    /// Fair coin.
    fn coin(&mut self) -> bool;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPicker;

impl Picker for ThreadPicker {
    fn pick(&mut self, low: u32, high: u32) -> u32 {
        rand::random_range(low..=high)
    }

    fn coin(&mut self) -> bool {
        rand::random::<bool>()
    }
}

/// Largest addend per tier: `(num1, num2, num3)`.
#[must_use]
pub const fn addend_ranges(difficulty: Difficulty) -> (u32, u32, Option<u32>) {
    match difficulty {
        Difficulty::Easy => (9, 9, None),
        Difficulty::Medium => (15, 9, None),
        Difficulty::Hard => (15, 15, None),
        Difficulty::Bonus => (9, 9, Some(9)),
    }
}

pub struct ProblemGenerator {
    picker: Box<dyn Picker>,
}

impl std::fmt::Debug for ProblemGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemGenerator").finish_non_exhaustive()
    }
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_picker(ThreadPicker)
    }

    #[must_use]
    pub fn with_picker(picker: impl Picker + 'static) -> Self {
        Self {
            picker: Box::new(picker),
        }
    }

    /// Draw a problem. Every addend is at least 1.
    pub fn generate(&mut self, difficulty: Difficulty) -> Problem {
        let (max1, max2, max3) = addend_ranges(difficulty);
        let mut num1 = self.picker.pick(1, max1);
        let mut num2 = self.picker.pick(1, max2);
        let num3 = max3.map(|max| self.picker.pick(1, max));
        // Medium draws the larger addend first, so half the time put it second.
        if difficulty == Difficulty::Medium && self.picker.coin() {
            std::mem::swap(&mut num1, &mut num2);
        }
        Problem::new(num1, num2, num3)
    }

    /// Fisher-Yates shuffle driven by the same picker as the problems.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.picker.pick(0, i as u32) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::{Picker, ProblemGenerator, addend_ranges};
    use tally_types::{Difficulty, Problem};

    /// Replays fixed values, clamped into the requested range.
    struct Scripted {
        values: VecDeque<u32>,
        coins: VecDeque<bool>,
    }

    impl Scripted {
        fn new(values: &[u32], coins: &[bool]) -> Self {
            Self {
                values: values.iter().copied().collect(),
                coins: coins.iter().copied().collect(),
            }
        }
    }

    impl Picker for Scripted {
        fn pick(&mut self, low: u32, high: u32) -> u32 {
            self.values.pop_front().unwrap_or(low).clamp(low, high)
        }

        fn coin(&mut self) -> bool {
            self.coins.pop_front().unwrap_or(false)
        }
    }

    #[test]
    fn easy_draws_two_single_digits() {
        let mut generator = ProblemGenerator::with_picker(Scripted::new(&[3, 2], &[]));
        assert_eq!(generator.generate(Difficulty::Easy), Problem::new(3, 2, None));
    }

    #[test]
    fn medium_swaps_on_heads() {
        let mut generator = ProblemGenerator::with_picker(Scripted::new(&[12, 4, 12, 4], &[true, false]));
        assert_eq!(generator.generate(Difficulty::Medium), Problem::new(4, 12, None));
        assert_eq!(generator.generate(Difficulty::Medium), Problem::new(12, 4, None));
    }

    #[test]
    fn bonus_has_three_addends() {
        let mut generator = ProblemGenerator::with_picker(Scripted::new(&[1, 2, 3], &[]));
        let problem = generator.generate(Difficulty::Bonus);
        assert_eq!(problem, Problem::new(1, 2, Some(3)));
        assert_eq!(problem.answer(), 6);
    }

    #[test]
    fn shuffle_swaps_with_picked_index() {
        // i = 3 picks 0, i = 2 picks 2, i = 1 picks 0.
        let mut generator = ProblemGenerator::with_picker(Scripted::new(&[0, 2, 0], &[]));
        let mut items = [1, 2, 3, 4];
        generator.shuffle(&mut items);
        assert_eq!(items, [2, 4, 3, 1]);
    }

    #[test]
    fn thread_shuffle_keeps_every_item() {
        let mut generator = ProblemGenerator::new();
        let mut items: Vec<u32> = (1..=9).collect();
        generator.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn ranges_per_tier() {
        assert_eq!(addend_ranges(Difficulty::Easy), (9, 9, None));
        assert_eq!(addend_ranges(Difficulty::Medium), (15, 9, None));
        assert_eq!(addend_ranges(Difficulty::Hard), (15, 15, None));
        assert_eq!(addend_ranges(Difficulty::Bonus), (9, 9, Some(9)));
    }

    #[test]
    fn thread_picker_stays_in_range() {
        let mut generator = ProblemGenerator::new();
        for difficulty in Difficulty::ALL {
            let (max1, max2, max3) = addend_ranges(difficulty);
            for _ in 0..200 {
                let problem = generator.generate(difficulty);
                let (hi1, hi2) = if difficulty == Difficulty::Medium {
                    (max1.max(max2), max1.max(max2))
                } else {
                    (max1, max2)
                };
                assert!((1..=hi1).contains(&problem.num1));
                assert!((1..=hi2).contains(&problem.num2));
                assert_eq!(problem.num3.is_some(), max3.is_some());
                if let (Some(n3), Some(m3)) = (problem.num3, max3) {
                    assert!((1..=m3).contains(&n3));
                }
            }
        }
    }
}
