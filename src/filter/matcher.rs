use super::error::FilterError;
use super::parser::{Condition, OperatorKind};
use super::value::{TypedValue, coerce_json, coerce_text};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::cmp::Ordering;

/// How per-condition results combine into one decision per record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Logical AND
    #[default]
    All,
    /// Logical OR
    Any,
}

impl AggregationMode {
    pub fn from_or_flag(or: bool) -> Self {
        if or {
            AggregationMode::Any
        } else {
            AggregationMode::All
        }
    }

    /// Identity element of the fold (empty AND is true, empty OR is false)
    pub fn identity(&self) -> bool {
        match self {
            AggregationMode::All => true,
            AggregationMode::Any => false,
        }
    }

    pub fn fold(&self, acc: bool, result: bool) -> bool {
        match self {
            AggregationMode::All => acc && result,
            AggregationMode::Any => acc || result,
        }
    }
}

/// Apply one operator to a pair of coerced values
pub fn evaluate(
    operator: OperatorKind,
    left: &TypedValue,
    right: &TypedValue,
) -> Result<bool, FilterError> {
    match operator {
        OperatorKind::Eq => Ok(left == right),
        OperatorKind::Ne => Ok(left != right),
        OperatorKind::Match => {
            let pattern = compile_prefix_pattern(right)?;
            Ok(pattern.is_match(&left.to_string()))
        }
        OperatorKind::Ge | OperatorKind::Gt | OperatorKind::Le | OperatorKind::Lt => {
            let ordering = compare(left, right).ok_or_else(|| mismatch(operator, left, right))?;
            let Some(ordering) = ordering else {
                // NaN never orders
                return Ok(false);
            };
            Ok(match operator {
                OperatorKind::Ge => ordering != Ordering::Less,
                OperatorKind::Gt => ordering == Ordering::Greater,
                OperatorKind::Le => ordering != Ordering::Greater,
                _ => ordering == Ordering::Less,
            })
        }
    }
}

/// Ordering between two values, `None` when the tags do not order.
/// The inner `None` only happens for NaN.
fn compare(left: &TypedValue, right: &TypedValue) -> Option<Option<Ordering>> {
    match (left, right) {
        (TypedValue::Str(a), TypedValue::Str(b)) => Some(Some(a.cmp(b))),
        (TypedValue::Int(_) | TypedValue::Float(_), TypedValue::Int(_) | TypedValue::Float(_)) => {
            Some(left.numeric_cmp(right))
        }
        _ => None,
    }
}

fn mismatch(operator: OperatorKind, left: &TypedValue, right: &TypedValue) -> FilterError {
    FilterError::OperatorTypeMismatch {
        operator: operator.symbol().to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

/// Compile a `=~` literal. Only the start is anchored, so plain patterns
/// are prefix matches and `$` must be written explicitly.
fn compile_prefix_pattern(literal: &TypedValue) -> Result<Regex, FilterError> {
    let TypedValue::Str(pattern) = literal else {
        return Err(FilterError::OperatorTypeMismatch {
            operator: OperatorKind::Match.symbol().to_string(),
            left: "string",
            right: literal.type_name(),
        });
    };

    Regex::new(&format!("^(?:{pattern})")).map_err(|source| FilterError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })
}

/// A condition with its literal already coerced
#[derive(Debug, Clone)]
struct CompiledCondition {
    condition: Condition,
    literal: TypedValue,
    pattern: Option<Regex>,
}

impl CompiledCondition {
    fn compile(condition: Condition) -> Result<Self, FilterError> {
        let literal = coerce_text(&condition.literal)?;
        let pattern = match condition.operator {
            OperatorKind::Match => Some(compile_prefix_pattern(&literal)?),
            _ => None,
        };

        Ok(Self {
            condition,
            literal,
            pattern,
        })
    }

    fn test(&self, record: &Map<String, Value>, line_number: usize) -> Result<bool, FilterError> {
        let raw = record
            .get(&self.condition.field)
            .ok_or_else(|| FilterError::FieldNotFound {
                field: self.condition.field.clone(),
                line_number,
            })?;
        let value = coerce_json(raw)?;

        match &self.pattern {
            Some(pattern) => Ok(pattern.is_match(&match_subject(raw, &value))),
            None => evaluate(self.condition.operator, &value, &self.literal),
        }
    }
}

/// Text a `=~` pattern runs against. String fields keep their own spelling
/// (`"007"` stays `007`, not `7`); numbers and booleans use their rendering.
fn match_subject<'a>(raw: &'a Value, value: &'a TypedValue) -> Cow<'a, str> {
    match (raw, value) {
        (_, TypedValue::Str(s)) => Cow::Borrowed(s),
        (Value::String(s), _) => Cow::Borrowed(s),
        _ => Cow::Owned(value.to_string()),
    }
}

/// The full per-record decision: conditions, aggregation and negation
#[derive(Debug, Clone)]
pub struct RecordFilter {
    conditions: Vec<CompiledCondition>,
    mode: AggregationMode,
    reverse: bool,
}

impl RecordFilter {
    /// Coerce every literal and compile every pattern before any input is read
    pub fn new(
        conditions: Vec<Condition>,
        mode: AggregationMode,
        reverse: bool,
    ) -> Result<Self, FilterError> {
        let conditions = conditions
            .into_iter()
            .map(CompiledCondition::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            conditions,
            mode,
            reverse,
        })
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().map(|c| &c.condition)
    }

    /// Decide whether a record is emitted.
    ///
    /// Every condition is evaluated, in order, even once the aggregate is
    /// settled, so a bad field is always reported at the same condition.
    pub fn matches(
        &self,
        record: &Map<String, Value>,
        line_number: usize,
    ) -> Result<bool, FilterError> {
        let mut aggregate = self.mode.identity();
        for condition in &self.conditions {
            let result = condition.test(record, line_number)?;
            aggregate = self.mode.fold(aggregate, result);
        }

        Ok(aggregate != self.reverse)
    }
}

/// Warnings for conditions that cannot succeed on any record
pub fn condition_warnings(conditions: &[Condition]) -> Vec<String> {
    conditions
        .iter()
        .filter(|c| c.operator.is_ordering() && matches!(c.literal.as_str(), "True" | "False"))
        .map(|c| {
            format!(
                "Condition '{}' orders against a boolean and will fail on the first record",
                c
            )
        })
        .collect()
}
