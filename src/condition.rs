//! The closed set of override conditions, and their total evaluation.

use serde::{Deserialize, Serialize};

use crate::value::{Context, Literal};

/// A condition tested against a [`Context`]. Atomic variants carry a property name and
/// a comparand; composite variants carry sub-conditions. Evaluation never panics: a
/// missing attribute, a type mismatch, or a non-finite numeric comparand all make the
/// atomic condition false rather than raising an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Equals { property: String, literal: Literal },
    In { property: String, literals: Vec<Literal> },
    NotIn { property: String, literals: Vec<Literal> },
    LessThan { property: String, literal: Literal },
    LessThanOrEqual { property: String, literal: Literal },
    GreaterThan { property: String, literal: Literal },
    GreaterThanOrEqual { property: String, literal: Literal },
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

/// Evaluates a single condition against a context. Total: returns `false` on any
/// missing attribute or type mismatch, never panics.
pub fn eval_condition(condition: &Condition, context: &Context) -> bool {
    match condition {
        Condition::Equals { property, literal } => context
            .get(property)
            .map(|v| v.equals_literal(&literal.value))
            .unwrap_or(false),
        Condition::In { property, literals } => context
            .get(property)
            .map(|v| literals.iter().any(|l| v.equals_literal(&l.value)))
            .unwrap_or(false),
        Condition::NotIn { property, literals } => !context
            .get(property)
            .map(|v| literals.iter().any(|l| v.equals_literal(&l.value)))
            .unwrap_or(false),
        Condition::LessThan { property, literal } => {
            numeric_cmp(context, property, literal, |a, b| a < b)
        }
        Condition::LessThanOrEqual { property, literal } => {
            numeric_cmp(context, property, literal, |a, b| a <= b)
        }
        Condition::GreaterThan { property, literal } => {
            numeric_cmp(context, property, literal, |a, b| a > b)
        }
        Condition::GreaterThanOrEqual { property, literal } => {
            numeric_cmp(context, property, literal, |a, b| a >= b)
        }
        Condition::And { conditions } => conditions.iter().all(|c| eval_condition(c, context)),
        Condition::Or { conditions } => conditions.iter().any(|c| eval_condition(c, context)),
        Condition::Not { condition } => !eval_condition(condition, context),
    }
}

/// `Condition::NotIn` above inverts absence too (spec: `not_in` is "negation of `in`",
/// and `in` on a missing attribute is false, so `not_in` on a missing attribute is
/// true). This mirrors that by design, not by omission.
fn numeric_cmp(
    context: &Context,
    property: &str,
    literal: &Literal,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    let lhs = match context.get(property).and_then(|v| v.as_finite_f64()) {
        Some(n) => n,
        None => return false,
    };
    let rhs = match literal.value.as_f64() {
        Some(n) if n.is_finite() => n,
        _ => return false,
    };
    cmp(lhs, rhs)
}
