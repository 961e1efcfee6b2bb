//! Rule evaluation over claims
//!
//! Rules are JSON-logic expressions. A relying party names its rules with a
//! `$` prefix and refers to them from other expressions with
//! `{"var": "$name"}`. Each named rule is computed at most once per
//! [`LogicEvaluator`], and a rule that (directly or transitively) refers to
//! itself fails with [`Error::CyclicRule`](crate::Error::CyclicRule).
//!
//! Generic operators are delegated to an [`ExpressionEngine`], by default
//! [`JsonLogic`] backed by `jsonlogic-rs`.

mod evaluator;

pub use evaluator::LogicEvaluator;

use crate::error::{Error, Result};
use serde_json::Value;

/// Evaluator for expressions free of rule references
///
/// [`LogicEvaluator`] evaluates the branching operators itself when their
/// operands refer to rules, using [`truthy`](ExpressionEngine::truthy) to
/// pick the branch.
pub trait ExpressionEngine {
    /// Apply `expression` to `data`
    fn apply(&self, expression: &Value, data: &Value) -> Result<Value>;

    /// Whether a value counts as true in a condition
    ///
    /// `null`, `false`, zero, the empty string and the empty array are
    /// false. Objects are always true.
    fn truthy(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }
}

/// JSON-logic operators as implemented by `jsonlogic-rs`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLogic;

impl ExpressionEngine for JsonLogic {
    fn apply(&self, expression: &Value, data: &Value) -> Result<Value> {
        jsonlogic_rs::apply(expression, data).map_err(|e| Error::Evaluation(e.to_string()))
    }
}

/// Name of the rule an expression refers to, if it is exactly `{"var": "$name"}`
pub(crate) fn rule_reference(expression: &Value) -> Option<&str> {
    let Value::Object(map) = expression else {
        return None;
    };
    if map.len() != 1 {
        return None;
    }
    match map.get("var") {
        Some(Value::String(name)) if name.starts_with('$') => Some(name.as_str()),
        _ => None,
    }
}
