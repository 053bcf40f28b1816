use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const DIGITS: [u8; 10] = *b"0987654321";

struct State {
    rng: StdRng,
    last: Option<DateTime<Utc>>,
}

/// Issues ids of the form `<unix-seconds>-<nanoseconds>-<shuffled digits>`.
///
/// Seconds and nanoseconds are zero padded to ten characters so that ids
/// sort lexicographically in issue order. The generator never reuses or
/// goes behind its previous timestamp, so ids from one generator are
/// strictly increasing even when the clock stalls or steps back.
pub struct IdGenerator {
    state: Mutex<State>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            state: Mutex::new(State { rng, last: None }),
        }
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&self, now: DateTime<Utc>) -> String {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let at = match state.last {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        state.last = Some(at);

        let mut suffix = DIGITS;
        suffix.shuffle(&mut state.rng);

        format!(
            "{:010}-{:010}-{}",
            at.timestamp(),
            at.timestamp_subsec_nanos(),
            String::from_utf8_lossy(&suffix)
        )
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
