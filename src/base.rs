// 🪪 Base - Identity and timestamps shared by every entity
//
// "Identity is assigned once, time is supplied from outside"
//
// Entities embed a `Base` by composition. The id and the clock are
// injected capabilities so tests can pin both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Supplies a globally-unique identifier on each entity construction
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Supplies the current timestamp for `created_at` / `updated_at`
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic ids: "{prefix}-1", "{prefix}-2", ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// BASE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    /// Stable identity - NEVER changes once assigned
    pub id: String,

    pub created_at: DateTime<Utc>,

    /// None until the first mutation
    pub updated_at: Option<DateTime<Utc>>,
}

impl Base {
    /// Stamp a fresh identity
    pub fn new(ids: &dyn IdGenerator, clock: &dyn Clock) -> Self {
        Base {
            id: ids.next_id(),
            created_at: clock.now(),
            updated_at: None,
        }
    }

    /// Record a mutation
    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = Some(clock.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_base_new_uses_injected_capabilities() {
        let ids = SequentialIds::new("acc");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let base = Base::new(&ids, &FixedClock(at));

        assert_eq!(base.id, "acc-1");
        assert_eq!(base.created_at, at);
        assert!(base.updated_at.is_none());
    }

    #[test]
    fn test_sequential_ids_increment() {
        let ids = SequentialIds::new("tx");
        assert_eq!(ids.next_id(), "tx-1");
        assert_eq!(ids.next_id(), "tx-2");
        assert_eq!(ids.next_id(), "tx-3");
    }

    #[test]
    fn test_uuid_generator_is_unique() {
        let a = UuidGenerator.next_id();
        let b = UuidGenerator.next_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_touch_sets_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
        let mut base = Base::new(&SequentialIds::new("x"), &FixedClock(created));

        base.touch(&FixedClock(later));
        assert_eq!(base.updated_at, Some(later));
        assert_eq!(base.created_at, created);
    }
}
