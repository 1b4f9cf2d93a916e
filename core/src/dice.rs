use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws the engine needs: mine positions, monster tie-breaks and launches.
pub trait Dice {
    /// Returns a value in `0..sides`; `sides` is never zero.
    fn roll(&mut self, sides: u32) -> u32;
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// Seedable pseudo-random dice.
#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: SmallRng,
}

impl RandomDice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }
}

impl Dice for RandomDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(0..sides.max(1))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Dice;

    /// Replays a fixed sequence of rolls, clamped to the requested range, then repeats the last one.
    #[derive(Clone, Debug)]
    pub(crate) struct Loaded {
        rolls: Vec<u32>,
        next: usize,
    }

    impl Loaded {
        pub(crate) fn new(rolls: &[u32]) -> Self {
            Self {
                rolls: rolls.to_vec(),
                next: 0,
            }
        }

        pub(crate) fn always(roll: u32) -> Self {
            Self::new(&[roll])
        }
    }

    impl Dice for Loaded {
        fn roll(&mut self, sides: u32) -> u32 {
            let roll = match self.rolls.get(self.next) {
                Some(&roll) => {
                    self.next += 1;
                    roll
                }
                None => self.rolls.last().copied().unwrap_or(0),
            };
            roll.min(sides.saturating_sub(1))
        }
    }

    #[test]
    fn loaded_dice_clamp_and_repeat() {
        let mut dice = Loaded::new(&[4, 1]);

        assert_eq!(dice.roll(2), 1);
        assert_eq!(dice.roll(6), 1);
        assert_eq!(dice.roll(6), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_repeat_their_sequence() {
        let mut a = RandomDice::from_seed(7);
        let mut b = RandomDice::from_seed(7);

        let first: Vec<_> = (0..16).map(|_| a.roll(6)).collect();
        let second: Vec<_> = (0..16).map(|_| b.roll(6)).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|&roll| roll < 6));
    }
}
