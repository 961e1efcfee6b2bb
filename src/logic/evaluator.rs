use super::{ExpressionEngine, JsonLogic, rule_reference};
use crate::claims::ClaimSet;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
enum RuleState {
    InProgress,
    Done(Value),
}

/// Evaluates rule expressions over a data context
///
/// Named rules are memoized for the lifetime of the evaluator, including
/// rules that evaluate to `null`. The cache lives in a `RefCell`, so an
/// evaluator belongs to one session and is not `Sync`.
///
/// ```
/// use jwtrust::{ClaimSet, LogicEvaluator};
/// use serde_json::json;
///
/// let claims = ClaimSet::from_json(r#"{"sub":"abc","age":20}"#).unwrap();
/// let rules = json!({"$isAdult": {">=": [{"var": "age"}, 18]}});
/// let evaluator = LogicEvaluator::with_claims(
///     rules.as_object().unwrap().clone(),
///     &claims,
///     Default::default(),
/// );
///
/// assert_eq!(evaluator.evaluate(&json!({"var": "$isAdult"})).unwrap(), json!(true));
/// ```
pub struct LogicEvaluator<E = JsonLogic> {
    engine: E,
    rules: IndexMap<String, Value>,
    data: Value,
    cache: RefCell<HashMap<String, RuleState>>,
}

impl LogicEvaluator<JsonLogic> {
    /// Evaluator for `rules` over `data`, using JSON-logic operators
    pub fn new(rules: Map<String, Value>, data: Value) -> Self {
        Self::with_engine(JsonLogic, rules, data)
    }

    /// Evaluator whose data context is a claim set plus relying-party fields
    ///
    /// A field in `extra` is ignored when a claim of the same name exists.
    pub fn with_claims(
        rules: Map<String, Value>,
        claims: &ClaimSet,
        extra: Map<String, Value>,
    ) -> Self {
        let mut data = match claims.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (name, value) in extra {
            data.entry(name).or_insert(value);
        }
        Self::new(rules, Value::Object(data))
    }
}

impl<E: ExpressionEngine> LogicEvaluator<E> {
    /// Evaluator with a custom expression engine
    pub fn with_engine(engine: E, rules: Map<String, Value>, data: Value) -> Self {
        Self {
            engine,
            rules: rules.into_iter().collect(),
            data,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Names of all defined rules, in definition order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// The data context expressions are evaluated against
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Evaluate an expression
    ///
    /// Literals are returned unchanged. `{"var": "$name"}` resolves the named
    /// rule. Expressions without rule references go to the engine as they
    /// are. Otherwise the branching operators (`if`, `?:`, `and`, `or`, `!`,
    /// `!!`) are evaluated here, so a rule is computed only when the operand
    /// referring to it is reached.
    pub fn evaluate(&self, expression: &Value) -> Result<Value> {
        if !(expression.is_object() || expression.is_array()) {
            return Ok(expression.clone());
        }

        if let Some(name) = rule_reference(expression) {
            return self.evaluate_rule(name);
        }

        if !refers_to_rules(expression) {
            return self.engine.apply(expression, &self.data);
        }

        match expression {
            Value::Array(items) => items
                .iter()
                .map(|item| self.evaluate(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((operator, args)) => self.apply_operation(operator, &arguments(args)),
                None => Ok(Value::Null),
            },
            _ => self.engine.apply(expression, &self.data),
        }
    }

    /// Evaluate a named rule, computing it at most once
    pub fn evaluate_rule(&self, name: &str) -> Result<Value> {
        let state = self.cache.borrow().get(name).cloned();
        match state {
            Some(RuleState::Done(value)) => return Ok(value),
            Some(RuleState::InProgress) => return Err(Error::CyclicRule(name.to_string())),
            None => {}
        }

        let body = self
            .rules
            .get(name)
            .ok_or_else(|| Error::UndefinedRule(name.to_string()))?;

        self.cache
            .borrow_mut()
            .insert(name.to_string(), RuleState::InProgress);
        debug!(rule = name, "evaluating rule");

        match self.evaluate(body) {
            Ok(value) => {
                self.cache
                    .borrow_mut()
                    .insert(name.to_string(), RuleState::Done(value.clone()));
                Ok(value)
            }
            Err(err) => {
                self.cache.borrow_mut().remove(name);
                Err(err)
            }
        }
    }

    fn apply_operation(&self, operator: &str, args: &[&Value]) -> Result<Value> {
        match operator {
            "if" | "?:" => self.branch(args),
            "and" => self.short_circuit(operator, args, false),
            "or" => self.short_circuit(operator, args, true),
            "!" => self.first_truthy(args).map(|truthy| Value::Bool(!truthy)),
            "!!" => self.first_truthy(args).map(Value::Bool),
            _ => self.apply_resolved(operator, args),
        }
    }

    /// `[cond, then, cond, then, ..., else]`, evaluating only the taken branch
    fn branch(&self, args: &[&Value]) -> Result<Value> {
        if let [only] = args {
            return self.evaluate(only);
        }
        for pair in args.chunks(2) {
            match pair {
                [condition, then] => {
                    let condition = self.evaluate(condition)?;
                    if self.engine.truthy(&condition) {
                        return self.evaluate(then);
                    }
                }
                [otherwise] => return self.evaluate(otherwise),
                _ => {}
            }
        }
        Ok(Value::Null)
    }

    /// `and` stops at the first falsy operand, `or` at the first truthy one
    fn short_circuit(&self, operator: &str, args: &[&Value], stop_when: bool) -> Result<Value> {
        let mut last = None;
        for arg in args {
            let value = self.evaluate(arg)?;
            if self.engine.truthy(&value) == stop_when {
                return Ok(value);
            }
            last = Some(value);
        }
        last.ok_or_else(|| Error::Evaluation(format!("'{operator}' needs at least one operand")))
    }

    fn first_truthy(&self, args: &[&Value]) -> Result<bool> {
        match args.first() {
            Some(arg) => Ok(self.engine.truthy(&self.evaluate(arg)?)),
            None => Ok(false),
        }
    }

    /// Hand an operator to the engine with its rule references resolved
    ///
    /// Operands are resolved left to right. Scalar results are inlined as
    /// literals. Arrays and objects are bound into a copy of the data
    /// context under a placeholder name, since the engine would otherwise
    /// read them as expressions.
    fn apply_resolved(&self, operator: &str, args: &[&Value]) -> Result<Value> {
        let mut bindings = Map::new();
        let mut operands = Vec::with_capacity(args.len());

        for (index, arg) in args.iter().enumerate() {
            if !refers_to_rules(arg) {
                operands.push((*arg).clone());
            } else if index == 1 && PER_ITEM_OPERATORS.contains(&operator) {
                operands.push(self.inline_references(arg)?);
            } else {
                let value = self.evaluate(arg)?;
                if value.is_object() || value.is_array() {
                    let placeholder = format!("\u{0}{}", bindings.len());
                    bindings.insert(placeholder.clone(), value);
                    operands.push(json!({ "var": placeholder }));
                } else {
                    operands.push(value);
                }
            }
        }

        let mut expression = Map::new();
        expression.insert(operator.to_string(), Value::Array(operands));
        let expression = Value::Object(expression);
        let data = self.data_with(bindings)?;
        self.engine.apply(&expression, &data)
    }

    /// Replace rule references in per-item logic with their scalar values
    ///
    /// Per-item logic reads each element as its data context, where a
    /// placeholder bound into the outer context is not visible.
    fn inline_references(&self, expression: &Value) -> Result<Value> {
        if let Some(name) = rule_reference(expression) {
            let value = self.evaluate_rule(name)?;
            if value.is_object() || value.is_array() {
                return Err(Error::Evaluation(format!(
                    "rule '{name}' yields a composite value and cannot be used in per-item logic"
                )));
            }
            return Ok(value);
        }

        match expression {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| Ok((key.clone(), self.inline_references(value)?)))
                .collect::<Result<Map<_, _>>>()
                .map(Value::Object),
            Value::Array(items) => items
                .iter()
                .map(|item| self.inline_references(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            literal => Ok(literal.clone()),
        }
    }

    fn data_with(&self, bindings: Map<String, Value>) -> Result<Cow<'_, Value>> {
        if bindings.is_empty() {
            return Ok(Cow::Borrowed(&self.data));
        }

        let mut data = match &self.data {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(Error::Evaluation(
                    "composite rule values need an object data context".to_string(),
                ));
            }
        };
        data.extend(bindings);
        Ok(Cow::Owned(Value::Object(data)))
    }
}

/// Operators whose second operand is applied to each element of the first
const PER_ITEM_OPERATORS: &[&str] = &["map", "filter", "reduce", "all", "some", "none"];

/// Operands of an operator; a lone non-array operand is a list of one
fn arguments(args: &Value) -> Vec<&Value> {
    match args {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    }
}

fn refers_to_rules(expression: &Value) -> bool {
    if rule_reference(expression).is_some() {
        return true;
    }
    match expression {
        Value::Object(map) => map.values().any(refers_to_rules),
        Value::Array(items) => items.iter().any(refers_to_rules),
        _ => false,
    }
}
