//! Randomized request-body values.

use std::fmt;
use std::ops::Range;

use fake::faker::internet::en::{Password, SafeEmail, Username};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of plausible random values for request bodies.
pub trait FixtureSource {
    /// Integer drawn uniformly from `range`. An empty range yields `range.start`.
    fn integer(&mut self, range: Range<i64>) -> i64;
    fn word(&mut self) -> String;
    fn username(&mut self) -> String;
    fn first_name(&mut self) -> String;
    fn last_name(&mut self) -> String;
    fn email(&mut self) -> String;
    fn password(&mut self) -> String;
    fn phone(&mut self) -> String;
}

/// [`FixtureSource`] backed by the `fake` crate.
pub struct FakeFixtures {
    rng: StdRng,
}

impl fmt::Debug for FakeFixtures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeFixtures").finish_non_exhaustive()
    }
}

impl Default for FakeFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeFixtures {
    /// Seeds from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator; the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl FixtureSource for FakeFixtures {
    fn integer(&mut self, range: Range<i64>) -> i64 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.gen_range(range)
    }

    fn word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }

    fn username(&mut self) -> String {
        Username().fake_with_rng(&mut self.rng)
    }

    fn first_name(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    fn last_name(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }

    fn email(&mut self) -> String {
        SafeEmail().fake_with_rng(&mut self.rng)
    }

    fn password(&mut self) -> String {
        Password(12..20).fake_with_rng(&mut self.rng)
    }

    fn phone(&mut self) -> String {
        PhoneNumber().fake_with_rng(&mut self.rng)
    }
}
