use super::error::FilterError;
use super::value::NUMERIC_LITERAL;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Comparison operators accepted in a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
    Ne,
    /// Regular expression match, anchored at the start of the value
    Match,
}

impl FromStr for OperatorKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(OperatorKind::Eq),
            ">=" => Ok(OperatorKind::Ge),
            ">" => Ok(OperatorKind::Gt),
            "<=" => Ok(OperatorKind::Le),
            "<" => Ok(OperatorKind::Lt),
            "!=" => Ok(OperatorKind::Ne),
            "=~" => Ok(OperatorKind::Match),
            _ => Err(FilterError::ConditionSyntax(s.to_string())),
        }
    }
}

impl OperatorKind {
    /// Surface token of this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::Eq => "==",
            OperatorKind::Ge => ">=",
            OperatorKind::Gt => ">",
            OperatorKind::Le => "<=",
            OperatorKind::Lt => "<",
            OperatorKind::Ne => "!=",
            OperatorKind::Match => "=~",
        }
    }

    /// Whether this operator needs an ordering between its operands
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            OperatorKind::Ge | OperatorKind::Gt | OperatorKind::Le | OperatorKind::Lt
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single parsed condition (e.g. `size >= 15K`)
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Top-level record key the condition looks at
    pub field: String,
    pub operator: OperatorKind,
    /// Literal exactly as written, quotes included
    pub literal: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.literal)
    }
}

/// Parser for `<field> <operator> <literal>` conditions.
///
/// Holds the compiled grammar; build it once and reuse it for every
/// condition of the run.
#[derive(Debug, Clone)]
pub struct ConditionParser {
    grammar: Regex,
}

impl Default for ConditionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionParser {
    pub fn new() -> Self {
        // Longer operators first so `>=` is never read as `>` followed by `=`.
        let pattern = format!(
            r#"^([A-Za-z0-9_-]+)\s*(==|>=|>|<=|<|!=|=~)\s*("[^"]*"|True|False|{NUMERIC_LITERAL})$"#
        );
        let grammar = Regex::new(&pattern).expect("valid condition grammar");
        Self { grammar }
    }

    /// Parse one condition, rejecting anything that does not match end-to-end
    pub fn parse(&self, condition: &str) -> Result<Condition, FilterError> {
        let captures = self
            .grammar
            .captures(condition)
            .ok_or_else(|| FilterError::ConditionSyntax(condition.to_string()))?;

        Ok(Condition {
            field: captures[1].to_string(),
            operator: captures[2].parse()?,
            literal: captures[3].to_string(),
        })
    }

    /// Parse a full condition list; the first malformed entry fails the whole list
    pub fn parse_all<S: AsRef<str>>(&self, conditions: &[S]) -> Result<Vec<Condition>, FilterError> {
        conditions.iter().map(|c| self.parse(c.as_ref())).collect()
    }
}
