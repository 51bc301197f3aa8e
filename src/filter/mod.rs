//! Condition parsing and record matching for JSON lines
//!
//! Each condition compares one top-level field of a record against a literal.
//! Literals and field values go through the same coercion rules, so `"5"`,
//! `5` and `5.0` all compare equal, and `15K` means `15 * 1000`.
//!
//! # Syntax
//!
//! ```text
//! <field> <operator> <literal>
//! ```
//!
//! - field: `[A-Za-z0-9_-]+`
//! - operator: `==`, `>=`, `>`, `<=`, `<`, `!=`, `=~`
//! - literal: `"text"`, `True`, `False`, or a number with an optional unit
//!   (`K M G T P E` for powers of 1000, `Ki Mi Gi Ti Pi Ei` for powers of 1024)
//!
//! `=~` takes a quoted regular expression and matches it at the start of the
//! field value only.
//!
//! # Examples
//!
//! ```text
//! size >= 15K                 # at least 15000
//! mem < 23Ki                  # below 23 * 1024
//! name == "a"                 # exact string
//! is_dir == True              # boolean
//! name =~ "a\d+$"             # regular expression
//! ```

pub mod error;
pub mod matcher;
pub mod parser;
pub mod stream;
pub mod value;

pub use error::FilterError;
pub use matcher::{AggregationMode, RecordFilter, condition_warnings, evaluate};
pub use parser::{Condition, ConditionParser, OperatorKind};
pub use stream::{FilterSummary, decode_record, filter_stream};
pub use value::{TypedValue, Unit, coerce_json, coerce_text};
