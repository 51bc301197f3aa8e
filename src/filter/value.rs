use super::error::FilterError;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Bare numeric literal with an optional unit suffix (`2`, `3.14`, `15K`, `23Ki`).
/// ASCII digits only, since `\d` also matches digits of other scripts.
pub(crate) const NUMERIC_LITERAL: &str = r"[0-9]+(?:\.[0-9]+)?(?:[KMGTPE]i?)?";

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?)((?:[KMGTPE]i?)?)$").expect("valid numeric literal regex")
});

/// Multiplier suffix of a numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
}

impl Unit {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "K" => Some(Unit::Kilo),
            "M" => Some(Unit::Mega),
            "G" => Some(Unit::Giga),
            "T" => Some(Unit::Tera),
            "P" => Some(Unit::Peta),
            "E" => Some(Unit::Exa),
            "Ki" => Some(Unit::Kibi),
            "Mi" => Some(Unit::Mebi),
            "Gi" => Some(Unit::Gibi),
            "Ti" => Some(Unit::Tebi),
            "Pi" => Some(Unit::Pebi),
            "Ei" => Some(Unit::Exbi),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Unit::Kilo => 1e3,
            Unit::Mega => 1e6,
            Unit::Giga => 1e9,
            Unit::Tera => 1e12,
            Unit::Peta => 1e15,
            Unit::Exa => 1e18,
            Unit::Kibi => (1u64 << 10) as f64,
            Unit::Mebi => (1u64 << 20) as f64,
            Unit::Gibi => (1u64 << 30) as f64,
            Unit::Tebi => (1u64 << 40) as f64,
            Unit::Pebi => (1u64 << 50) as f64,
            Unit::Exbi => (1u64 << 60) as f64,
        }
    }
}

/// A literal or field value after coercion
#[derive(Debug, Clone)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl TypedValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Int(_) => "int",
            TypedValue::Float(_) => "float",
            TypedValue::Str(_) => "string",
            TypedValue::Bool(_) => "bool",
        }
    }

    /// Numeric view of `Int` and `Float`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Int(i) => Some(*i as f64),
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Exact ordering between two numeric values, `None` for non-numeric
    /// tags and NaN
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Int(a), TypedValue::Int(b)) => Some(a.cmp(b)),
            (TypedValue::Float(a), TypedValue::Float(b)) => a.partial_cmp(b),
            (TypedValue::Int(a), TypedValue::Float(b)) => cmp_int_float(*a, *b),
            (TypedValue::Float(a), TypedValue::Int(b)) => {
                cmp_int_float(*b, *a).map(Ordering::reverse)
            }
            _ => None,
        }
    }
}

/// Compare without rounding `i` through `f64`, which loses precision above 2^53
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f),
        other => Some(other),
    }
}

/// Same tag compares by value; `Int` and `Float` compare by magnitude.
impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedValue::Int(a), TypedValue::Int(b)) => a == b,
            (TypedValue::Str(a), TypedValue::Str(b)) => a == b,
            (TypedValue::Bool(a), TypedValue::Bool(b)) => a == b,
            (TypedValue::Float(_) | TypedValue::Int(_), TypedValue::Float(_) | TypedValue::Int(_)) => {
                self.numeric_cmp(other) == Some(Ordering::Equal)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(i) => write!(f, "{i}"),
            TypedValue::Float(x) => write!(f, "{x}"),
            TypedValue::Str(s) => f.write_str(s),
            TypedValue::Bool(true) => f.write_str("True"),
            TypedValue::Bool(false) => f.write_str("False"),
        }
    }
}

/// Coerce literal text (or a string field value) into a typed value
pub fn coerce_text(text: &str) -> Result<TypedValue, FilterError> {
    if let Some(inner) = text.strip_prefix('"') {
        let inner = inner.strip_suffix('"').unwrap_or(inner);
        return Ok(TypedValue::Str(inner.to_string()));
    }

    match text {
        "True" => return Ok(TypedValue::Bool(true)),
        "False" => return Ok(TypedValue::Bool(false)),
        _ => {}
    }

    let Some(captures) = NUMERIC_RE.captures(text) else {
        return Ok(TypedValue::Str(text.to_string()));
    };

    let mantissa = &captures[1];
    let mantissa = if mantissa.contains('.') {
        mantissa
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|_| FilterError::LiteralCoercion(text.to_string()))?
    } else {
        match mantissa.parse::<i64>() {
            Ok(i) => TypedValue::Int(i),
            // Too large for i64; same widening as an oversized JSON number
            Err(_) => mantissa
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|_| FilterError::LiteralCoercion(text.to_string()))?,
        }
    };

    match Unit::from_suffix(&captures[2]) {
        Some(unit) => {
            let base = mantissa
                .as_f64()
                .ok_or_else(|| FilterError::LiteralCoercion(text.to_string()))?;
            Ok(TypedValue::Float(base * unit.multiplier()))
        }
        None => Ok(mantissa),
    }
}

/// Coerce a record's field value into a typed value.
///
/// Strings go through [`coerce_text`] so a field holding `"15K"` compares
/// the same way as the literal `15K`.
pub fn coerce_json(value: &Value) -> Result<TypedValue, FilterError> {
    match value {
        Value::Bool(b) => Ok(TypedValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(TypedValue::Int(i))
            } else {
                n.as_f64()
                    .map(TypedValue::Float)
                    .ok_or_else(|| FilterError::LiteralCoercion(n.to_string()))
            }
        }
        Value::String(s) => coerce_text(s),
        other => Ok(TypedValue::Str(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quoted_text_is_stripped_verbatim() {
        assert_eq!(coerce_text(r#""abc""#).unwrap(), TypedValue::Str("abc".into()));
        assert_eq!(coerce_text(r#""15K""#).unwrap(), TypedValue::Str("15K".into()));
        assert_eq!(coerce_text(r#""a\d+$""#).unwrap(), TypedValue::Str(r"a\d+$".into()));
        assert_eq!(coerce_text(r#""""#).unwrap(), TypedValue::Str(String::new()));
    }

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(coerce_text("True").unwrap(), TypedValue::Bool(true));
        assert_eq!(coerce_text("False").unwrap(), TypedValue::Bool(false));
        assert_eq!(coerce_text("true").unwrap(), TypedValue::Str("true".into()));
    }

    #[test]
    fn test_plain_numbers_keep_their_type() {
        assert!(matches!(coerce_text("42").unwrap(), TypedValue::Int(42)));
        assert!(matches!(coerce_text("3.5").unwrap(), TypedValue::Float(x) if x == 3.5));
    }

    #[test]
    fn test_units_widen_to_float() {
        assert!(matches!(coerce_text("15K").unwrap(), TypedValue::Float(x) if x == 15_000.0));
        assert!(matches!(coerce_text("23Ki").unwrap(), TypedValue::Float(x) if x == 23_552.0));
        assert!(matches!(coerce_text("1.5M").unwrap(), TypedValue::Float(x) if x == 1_500_000.0));
        assert!(matches!(coerce_text("2Gi").unwrap(), TypedValue::Float(x) if x == 2_147_483_648.0));
    }

    #[test]
    fn test_unit_multipliers() {
        assert_eq!(Unit::Exa.multiplier(), 1e18);
        assert_eq!(Unit::Exbi.multiplier(), 1_152_921_504_606_846_976.0);
        assert_eq!(Unit::from_suffix("Ti"), Some(Unit::Tebi));
        assert_eq!(Unit::from_suffix("k"), None);
    }

    #[test]
    fn test_unit_literals_equal_their_expansion() {
        assert_eq!(coerce_text("1Ki").unwrap(), coerce_json(&json!(1024)).unwrap());
        assert_eq!(coerce_text("1Mi").unwrap(), coerce_json(&json!(1024 * 1024)).unwrap());
        assert_eq!(coerce_text("15K").unwrap(), coerce_json(&json!(15000)).unwrap());
    }

    #[test]
    fn test_non_numeric_text_passes_through() {
        assert_eq!(coerce_text("abc").unwrap(), TypedValue::Str("abc".into()));
        assert_eq!(coerce_text("12abc").unwrap(), TypedValue::Str("12abc".into()));
        assert_eq!(coerce_text("-5").unwrap(), TypedValue::Str("-5".into()));
    }

    #[test]
    fn test_overflowing_mantissa_widens_to_float() {
        assert!(matches!(
            coerce_text("99999999999999999999").unwrap(),
            TypedValue::Float(x) if x == 1e20
        ));
        assert_eq!(
            coerce_json(&json!("18446744073709551615")).unwrap(),
            coerce_json(&json!(18446744073709551615u64)).unwrap()
        );
        assert!(matches!(
            coerce_json(&json!("123456789012345678901234")).unwrap(),
            TypedValue::Float(_)
        ));
    }

    #[test]
    fn test_non_ascii_digits_are_text() {
        assert_eq!(coerce_json(&json!("١٢")).unwrap(), TypedValue::Str("١٢".into()));
        assert_eq!(coerce_text("١٢K").unwrap(), TypedValue::Str("١٢K".into()));
    }

    #[test]
    fn test_json_scalars() {
        assert!(matches!(coerce_json(&json!(true)).unwrap(), TypedValue::Bool(true)));
        assert!(matches!(coerce_json(&json!(-7)).unwrap(), TypedValue::Int(-7)));
        assert!(matches!(coerce_json(&json!(2.5)).unwrap(), TypedValue::Float(x) if x == 2.5));
        assert!(matches!(coerce_json(&json!(u64::MAX)).unwrap(), TypedValue::Float(_)));
        assert_eq!(coerce_json(&json!("5")).unwrap(), TypedValue::Int(5));
        assert_eq!(coerce_json(&json!("True")).unwrap(), TypedValue::Bool(true));
    }

    #[test]
    fn test_same_rules_on_both_sides() {
        assert_eq!(coerce_text("5").unwrap(), coerce_json(&json!(5)).unwrap());
        assert_eq!(coerce_json(&json!("5")).unwrap(), coerce_json(&json!(5)).unwrap());
    }

    #[test]
    fn test_structured_values_are_stringified() {
        assert_eq!(coerce_json(&json!(null)).unwrap(), TypedValue::Str("null".into()));
        assert_eq!(coerce_json(&json!([1, 2])).unwrap(), TypedValue::Str("[1,2]".into()));
        assert_eq!(
            coerce_json(&json!({"a": 1})).unwrap(),
            TypedValue::Str(r#"{"a":1}"#.into())
        );
    }

    #[test]
    fn test_cross_tag_equality() {
        assert_eq!(TypedValue::Int(5), TypedValue::Float(5.0));
        assert_ne!(TypedValue::Int(5), TypedValue::Str("5".into()));
        assert_ne!(TypedValue::Bool(true), TypedValue::Int(1));
    }

    #[test]
    fn test_int_float_comparison_is_exact_past_f64_precision() {
        let big = TypedValue::Int(9_007_199_254_740_993);
        let near = TypedValue::Float(9_007_199_254_740_992.0);
        assert_ne!(big, near);
        assert_eq!(big.numeric_cmp(&near), Some(Ordering::Greater));
        assert_eq!(near.numeric_cmp(&big), Some(Ordering::Less));

        assert_eq!(TypedValue::Int(i64::MAX).numeric_cmp(&TypedValue::Float(9.3e18)), Some(Ordering::Less));
        assert_eq!(TypedValue::Int(5).numeric_cmp(&TypedValue::Float(5.5)), Some(Ordering::Less));
        assert_eq!(TypedValue::Int(-5).numeric_cmp(&TypedValue::Float(-5.5)), Some(Ordering::Greater));
        assert_eq!(TypedValue::Int(1).numeric_cmp(&TypedValue::Float(f64::NAN)), None);
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(TypedValue::Int(15).to_string(), "15");
        assert_eq!(TypedValue::Float(1.5).to_string(), "1.5");
        assert_eq!(TypedValue::Bool(false).to_string(), "False");
        assert_eq!(TypedValue::Str("x y".into()).to_string(), "x y");
    }
}
