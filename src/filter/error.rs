use thiserror::Error;

/// Errors that abort a filtering run
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Line {line_number} is not a JSON object: {line}")]
    RecordDecode {
        line_number: usize,
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Condition not understood: '{0}'. Expected '<field> <operator> <literal>' with operators ==, >=, >, <=, <, !=, =~"
    )]
    ConditionSyntax(String),

    #[error("Field not found on line {line_number}: '{field}'")]
    FieldNotFound { field: String, line_number: usize },

    #[error("Literal not understood: '{0}'")]
    LiteralCoercion(String),

    #[error("Operator '{operator}' is not defined between {left} and {right}")]
    OperatorTypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Invalid regular expression '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown condition preset: '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
