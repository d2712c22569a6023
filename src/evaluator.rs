//! Pure evaluation: `(entry, context) -> value`. No I/O, no logging, no state.

use crate::condition::eval_condition;
use crate::entry::ConfigEntry;
use crate::value::{Context, Value};

/// Walks `entry`'s overrides in priority order (earlier wins) and returns the value of
/// the first override whose condition list holds as a conjunction under `context`.
/// Falls back to the entry's base value if none match.
pub fn evaluate(entry: &ConfigEntry, context: &Context) -> Value {
    for ov in &entry.overrides {
        if ov.conditions.iter().all(|c| eval_condition(c, context)) {
            return ov.value.clone();
        }
    }
    entry.value.clone()
}
