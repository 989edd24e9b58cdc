//! Deterministic sample-data generation.
//!
//! Every generator is constructed from an explicit seed and owned by the
//! test that uses it — no process-wide generator state, so parallel tests
//! cannot interfere and a failing seed can be replayed verbatim.

use rand::{RngExt, SeedableRng, rngs::StdRng};

/// Explicit-seed sample generator for names, emails, and digits.
///
/// A per-instance serial is mixed into every minted name, so a single test
/// can mint dozens of values without colliding on a unique index.
pub struct SampleRng {
    rng: StdRng,
    serial: u32,
}

impl SampleRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            serial: 0,
        }
    }

    fn next_serial(&mut self) -> u32 {
        self.serial += 1;
        self.serial
    }

    /// Mint a role name like `HUB3-4821`.
    pub fn role_name(&mut self) -> String {
        let serial = self.next_serial();
        format!("HUB{serial}-{}", self.rng.random_range(1000..10000u32))
    }

    /// Mint a user name like `user7-2215`.
    pub fn user_name(&mut self) -> String {
        let serial = self.next_serial();
        format!("user{serial}-{}", self.rng.random_range(1000..10000u32))
    }

    /// Mint an email like `box12-9377@example.com`.
    pub fn email(&mut self) -> String {
        let serial = self.next_serial();
        format!(
            "box{serial}-{}@example.com",
            self.rng.random_range(1000..10000u32)
        )
    }

    /// A phone number of ten random digits.
    pub fn phone_number(&mut self) -> String {
        (0..10)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10u8)))
            .collect()
    }
}
