use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use uuid::Uuid;

/// A value that can serve as the unique identity of a record.
pub trait IdentityKey: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// True for the zero value of the key type (`""`, `0`, `null`, nil uuid).
    fn is_empty_key(&self) -> bool;

    /// Produces a fresh, process-unique key.
    fn generate() -> Self;
}

/// Monotonic sequence shared by the integer key types, seeded from the wall
/// clock so ids survive a restart against previously saved data.
fn next_sequence() -> u64 {
    static SEQUENCE: OnceLock<AtomicU64> = OnceLock::new();

    SEQUENCE
        .get_or_init(|| {
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX >> 1))
                .unwrap_or(1);
            AtomicU64::new(seed.max(1))
        })
        .fetch_add(1, Ordering::Relaxed)
}

impl IdentityKey for String {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }

    fn generate() -> Self {
        Uuid::new_v4().simple().to_string()
    }
}

impl IdentityKey for u64 {
    fn is_empty_key(&self) -> bool {
        *self == 0
    }

    fn generate() -> Self {
        next_sequence()
    }
}

impl IdentityKey for i64 {
    fn is_empty_key(&self) -> bool {
        *self == 0
    }

    fn generate() -> Self {
        i64::try_from(next_sequence() & (i64::MAX as u64)).unwrap_or(i64::MAX)
    }
}

impl IdentityKey for Uuid {
    fn is_empty_key(&self) -> bool {
        self.is_nil()
    }

    fn generate() -> Self {
        Uuid::new_v4()
    }
}

impl IdentityKey for Value {
    fn is_empty_key(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) => false,
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::String(text) => text.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    fn generate() -> Self {
        Value::String(String::generate())
    }
}
