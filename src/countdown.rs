use std::fmt;
use std::rc::Rc;

use log::{info, warn};

use crate::config::COUNTDOWN_WINDOW_MS;
use crate::storage::KeyValueStore;
use crate::timing::clock::Clock;

const HOUR_MS: i64 = 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;
const SECOND_MS: i64 = 1000;

/// Largest value shown on screen. A brand new window starts at 23:59:59
/// instead of flashing 24:00:00 for one tick.
const MAX_DISPLAY_MS: i64 = COUNTDOWN_WINDOW_MS - SECOND_MS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Remaining {
    pub total_ms: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Remaining {
    pub fn from_millis(ms: i64) -> Self {
        let total_ms = ms.clamp(0, MAX_DISPLAY_MS);
        Self {
            total_ms,
            hours: (total_ms / HOUR_MS) as u32,
            minutes: ((total_ms % HOUR_MS) / MINUTE_MS) as u32,
            seconds: ((total_ms % MINUTE_MS) / SECOND_MS) as u32,
        }
    }

    /// Hours, minutes and seconds as two digit strings.
    pub fn padded(&self) -> [String; 3] {
        [
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn format_timestamp(ms: i64) -> String {
    ms.to_string()
}

/// Evergreen countdown anchored to a deadline persisted under `key`.
///
/// The deadline is renewed for another window whenever it elapses, so the
/// countdown never stays at zero. If storage is unusable the deadline lives
/// in memory for the rest of the session.
pub struct Countdown {
    key: String,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    end_ms: i64,
    persisted: bool,
}

impl Countdown {
    pub fn initialize(
        key: impl Into<String>,
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let key = key.into();
        let now = clock.now_ms();

        let saved = match store.get(&key) {
            Ok(saved) => saved.as_deref().and_then(parse_timestamp),
            Err(e) => {
                warn!("Countdown {} falling back to memory: {}", key, e);
                None
            }
        };

        let mut countdown = Self {
            key,
            store,
            clock,
            end_ms: now,
            persisted: false,
        };

        match saved {
            // Anything beyond one window ahead comes from a skewed clock or
            // an edited value.
            Some(end_ms) if end_ms > now && end_ms <= now + COUNTDOWN_WINDOW_MS => {
                countdown.end_ms = end_ms;
                countdown.persisted = true;
            }
            _ => countdown.renew(now),
        }
        countdown
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn end_timestamp(&self) -> i64 {
        self.end_ms
    }

    /// Whether the current deadline made it into storage.
    #[cfg(test)]
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn remaining(&self) -> Remaining {
        Remaining::from_millis(self.end_ms - self.clock.now_ms())
    }

    /// Recomputes the remaining time, renewing the deadline once it has
    /// passed.
    pub fn tick(&mut self) -> Remaining {
        let now = self.clock.now_ms();
        if self.end_ms - now <= 0 {
            self.renew(now);
        }
        Remaining::from_millis(self.end_ms - now)
    }

    fn renew(&mut self, now: i64) {
        self.end_ms = now + COUNTDOWN_WINDOW_MS;
        match self.store.set(&self.key, &format_timestamp(self.end_ms)) {
            Ok(()) => {
                self.persisted = true;
                info!("Countdown {} renewed until {}", self.key, self.end_ms);
            }
            Err(e) => {
                self.persisted = false;
                warn!("Countdown {} kept in memory only: {}", self.key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::BrokenStore;
    use crate::storage::{MemoryStore, SessionFallback, StorageError};
    use std::cell::Cell;
    use crate::timing::clock::ManualClock;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const KEY: &str = "ctdn";
    const T0: i64 = 1_700_000_000_000;

    fn fixture() -> (Rc<MemoryStore>, Rc<ManualClock>) {
        (Rc::new(MemoryStore::new()), Rc::new(ManualClock::new(T0)))
    }

    fn stored(store: &MemoryStore) -> Option<i64> {
        store.get(KEY).unwrap().as_deref().and_then(parse_timestamp)
    }

    #[test]
    fn absent_key_persists_a_full_window() {
        let (store, clock) = fixture();
        let countdown = Countdown::initialize(KEY, store.clone(), clock.clone());

        let value = stored(&store).expect("deadline persisted");
        assert!((value - T0 - 86_400_000).abs() <= 1_000);
        assert_eq!(countdown.end_timestamp(), value);
        assert!(countdown.is_persisted());
    }

    #[test]
    fn initialize_is_idempotent_within_window() {
        let (store, clock) = fixture();
        let first = Countdown::initialize(KEY, store.clone(), clock.clone());
        clock.advance(3 * HOUR_MS);
        let second = Countdown::initialize(KEY, store.clone(), clock.clone());

        assert_eq!(first.end_timestamp(), second.end_timestamp());
    }

    #[test]
    fn future_deadline_is_reused() {
        let (store, clock) = fixture();
        store.set(KEY, &format_timestamp(T0 + 90 * MINUTE_MS)).unwrap();

        let countdown = Countdown::initialize(KEY, store.clone(), clock.clone());
        assert_eq!(countdown.end_timestamp(), T0 + 90 * MINUTE_MS);
        assert_eq!(countdown.remaining().to_string(), "01:30:00");
    }

    #[rstest]
    #[case::expired(format_timestamp(T0 - 1))]
    #[case::exactly_now(format_timestamp(T0))]
    #[case::garbage("soon".to_string())]
    #[case::empty(String::new())]
    #[case::beyond_one_window(format_timestamp(T0 + COUNTDOWN_WINDOW_MS + 1))]
    fn unusable_deadline_is_replaced(#[case] saved: String) {
        let (store, clock) = fixture();
        store.set(KEY, &saved).unwrap();

        let countdown = Countdown::initialize(KEY, store.clone(), clock.clone());
        assert_eq!(countdown.end_timestamp(), T0 + COUNTDOWN_WINDOW_MS);
        assert_eq!(stored(&store), Some(T0 + COUNTDOWN_WINDOW_MS));
    }

    #[test]
    fn remaining_never_increases() {
        let (store, clock) = fixture();
        let mut countdown = Countdown::initialize(KEY, store, clock.clone());

        let mut previous = countdown.tick();
        for _ in 0..5_000 {
            clock.advance(17_321);
            let next = countdown.tick();
            if next.total_ms > previous.total_ms {
                // Only allowed when the window rolled over.
                assert!(countdown.end_timestamp() > T0 + COUNTDOWN_WINDOW_MS);
                break;
            }
            assert!(next <= previous);
            previous = next;
        }
    }

    #[test]
    fn expiry_tick_renews_for_another_window() {
        let (store, clock) = fixture();
        let mut countdown = Countdown::initialize(KEY, store.clone(), clock.clone());
        let first_end = countdown.end_timestamp();

        clock.set(first_end);
        let remaining = countdown.tick();

        assert_eq!(countdown.end_timestamp(), first_end + COUNTDOWN_WINDOW_MS);
        assert_eq!(stored(&store), Some(first_end + COUNTDOWN_WINDOW_MS));
        assert_eq!((remaining.hours, remaining.minutes, remaining.seconds), (23, 59, 59));
    }

    #[test]
    fn tick_after_long_absence_renews_from_now() {
        let (store, clock) = fixture();
        let mut countdown = Countdown::initialize(KEY, store, clock.clone());

        clock.advance(3 * COUNTDOWN_WINDOW_MS + 5_000);
        countdown.tick();
        assert_eq!(countdown.end_timestamp(), clock.now_ms() + COUNTDOWN_WINDOW_MS);
    }

    #[test]
    fn broken_storage_falls_back_to_memory() {
        let clock = Rc::new(ManualClock::new(T0));
        let mut countdown = Countdown::initialize(KEY, Rc::new(BrokenStore), clock.clone());

        assert!(!countdown.is_persisted());
        assert_eq!(countdown.end_timestamp(), T0 + COUNTDOWN_WINDOW_MS);

        clock.advance(HOUR_MS);
        assert_eq!(countdown.tick().to_string(), "23:00:00");

        clock.advance(COUNTDOWN_WINDOW_MS);
        countdown.tick();
        assert_eq!(countdown.end_timestamp(), clock.now_ms() + COUNTDOWN_WINDOW_MS);
    }

    #[test]
    fn failing_storage_keeps_one_deadline_per_session() {
        let clock = Rc::new(ManualClock::new(T0));
        let key = "ctdn_session_shared";
        let store = || Rc::new(SessionFallback::new(BrokenStore));

        let full = Countdown::initialize(key, store(), clock.clone());
        clock.advance(2 * HOUR_MS);
        let compact = Countdown::initialize(key, store(), clock.clone());

        assert_eq!(full.end_timestamp(), compact.end_timestamp());
        assert_eq!(full.remaining().to_string(), "22:00:00");
        assert_eq!(compact.remaining().to_string(), "22:00:00");
    }

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Cell<usize>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }
    }

    #[test]
    fn one_write_per_initialize_and_none_per_tick() {
        let store = Rc::new(CountingStore::default());
        let clock = Rc::new(ManualClock::new(T0));

        let mut countdown = Countdown::initialize(KEY, store.clone(), clock.clone());
        assert_eq!(store.writes.get(), 1);

        for _ in 0..60 {
            clock.advance(SECOND_MS);
            countdown.tick();
        }
        assert_eq!(store.writes.get(), 1);

        Countdown::initialize(KEY, store.clone(), clock.clone());
        assert_eq!(store.writes.get(), 1);
    }

    #[test]
    fn deadline_at_exactly_one_window_is_kept() {
        let (store, clock) = fixture();
        store.set(KEY, &format_timestamp(T0 + COUNTDOWN_WINDOW_MS)).unwrap();

        let countdown = Countdown::initialize(KEY, store, clock);
        assert_eq!(countdown.end_timestamp(), T0 + COUNTDOWN_WINDOW_MS);
    }

    #[test]
    fn timestamp_round_trips_exactly() {
        let value = 1_734_567_890_123_i64;
        assert_eq!(parse_timestamp(&format_timestamp(value)), Some(value));
    }

    #[rstest]
    #[case(0, "00:00:00")]
    #[case(-5_000, "00:00:00")]
    #[case(999, "00:00:00")]
    #[case(61_000, "00:01:01")]
    #[case(COUNTDOWN_WINDOW_MS, "23:59:59")]
    #[case(10 * HOUR_MS + 5 * MINUTE_MS + 9 * SECOND_MS, "10:05:09")]
    fn remaining_formats_zero_padded(#[case] ms: i64, #[case] expected: &str) {
        assert_eq!(Remaining::from_millis(ms).to_string(), expected);
    }

    #[test]
    fn padded_fields_are_two_digits() {
        let remaining = Remaining::from_millis(HOUR_MS + 2 * MINUTE_MS + 3 * SECOND_MS);
        assert_eq!(remaining.padded(), ["01".to_string(), "02".to_string(), "03".to_string()]);
    }
}
