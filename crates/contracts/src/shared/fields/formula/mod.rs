//! Formula evaluator for calculated fields
//!
//! A small hand-written tokenizer + recursive-descent parser over a fixed
//! grammar, evaluated against an explicit binding environment (the record
//! map). Formula strings are admin-authored, but they are still never
//! executed as code: there is no dynamic evaluation facility to inject
//! into.
//!
//! Grammar: numbers, single/double-quoted strings, `true`/`false`, bare
//! identifiers resolving to record fields, `+ - * /`, comparisons
//! `> < >= <= == !=`, parentheses, unary minus, and the fixed function
//! set `if(cond,a,b)`, `round(x,n)`, `abs(x)`, `min(...)`, `max(...)`,
//! `concat(...)`, `format_number(x,n)`.
//!
//! Rounding is half-away-from-zero on the scaled value (`f64::round`),
//! so `round(1.005 + 2.333, 2)` yields `3.34`.

mod eval;
mod parser;
mod token;

use serde_json::{Map, Value};
use std::fmt;

pub use parser::{BinOp, Expr, Func};

/// Internal failure of tokenizing, parsing or evaluation. Callers of
/// [`evaluate`] never see it; it exists so the stages can use `?`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    Syntax(String),
    UnknownField(String),
    Type(String),
    Arity(&'static str),
    NonFinite,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "syntax error: {}", msg),
            Self::UnknownField(name) => write!(f, "unknown field: {}", name),
            Self::Type(msg) => write!(f, "type error: {}", msg),
            Self::Arity(func) => write!(f, "wrong number of arguments for {}", func),
            Self::NonFinite => write!(f, "non-finite result"),
        }
    }
}

impl std::error::Error for FormulaError {}

/// Parse `formula` once, without evaluating. Used by the field manager
/// to validate admin input before saving a calculated field.
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    let tokens = token::tokenize(formula)?;
    parser::parse_tokens(&tokens)
}

/// Evaluate `formula` against a record.
///
/// Any failure (syntax error, unknown identifier, division producing a
/// non-finite value, bad argument types) resolves to `None`; nothing is
/// ever raised into the caller.
pub fn evaluate(formula: &str, record: &Map<String, Value>) -> Option<Value> {
    let expr = parse(formula).ok()?;
    eval::eval(&expr, record).ok().map(eval::to_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_round_of_sum() {
        let rec = record(&[("a", json!(1.005)), ("b", json!(2.333))]);
        assert_eq!(evaluate("round(a + b, 2)", &rec), Some(json!(3.34)));
    }

    #[test]
    fn test_arithmetic_precedence() {
        let rec = record(&[("a", json!(2)), ("b", json!(3)), ("c", json!(4))]);
        assert_eq!(evaluate("a + b * c", &rec), Some(json!(14.0)));
        assert_eq!(evaluate("(a + b) * c", &rec), Some(json!(20.0)));
        assert_eq!(evaluate("-a + 10", &rec), Some(json!(8.0)));
    }

    #[test]
    fn test_comparisons_and_if() {
        let rec = record(&[("qty", json!(120)), ("limit", json!(100))]);
        assert_eq!(evaluate("qty > limit", &rec), Some(json!(true)));
        assert_eq!(
            evaluate("if(qty > limit, qty - limit, 0)", &rec),
            Some(json!(20.0))
        );
        assert_eq!(evaluate("qty != limit", &rec), Some(json!(true)));
    }

    #[test]
    fn test_string_functions() {
        let rec = record(&[("code", json!("BT-01")), ("name", json!("Пакет"))]);
        assert_eq!(
            evaluate("concat(code, ' / ', name)", &rec),
            Some(json!("BT-01 / Пакет"))
        );
        assert_eq!(
            evaluate("format_number(1234.567, 1)", &record(&[])),
            Some(json!("1234.6"))
        );
    }

    #[test]
    fn test_min_max_abs() {
        let rec = record(&[("a", json!(-5)), ("b", json!(3))]);
        assert_eq!(evaluate("abs(a)", &rec), Some(json!(5.0)));
        assert_eq!(evaluate("min(a, b, 0)", &rec), Some(json!(-5.0)));
        assert_eq!(evaluate("max(a, b)", &rec), Some(json!(3.0)));
    }

    #[test]
    fn test_unknown_field_resolves_to_none() {
        let rec = record(&[("a", json!(1))]);
        assert_eq!(evaluate("a + missing", &rec), None);
    }

    #[test]
    fn test_division_by_zero_resolves_to_none() {
        let rec = record(&[("a", json!(1)), ("b", json!(0))]);
        assert_eq!(evaluate("a / b", &rec), None);
    }

    #[test]
    fn test_syntax_error_resolves_to_none() {
        let rec = record(&[("a", json!(1))]);
        assert_eq!(evaluate("a +", &rec), None);
        assert_eq!(evaluate("round(a", &rec), None);
        assert_eq!(evaluate("", &rec), None);
    }

    #[test]
    fn test_null_field_resolves_to_none() {
        let rec = record(&[("a", Value::Null)]);
        assert_eq!(evaluate("a + 1", &rec), None);
    }

    #[test]
    fn test_unknown_function_resolves_to_none() {
        let rec = record(&[("a", json!(1))]);
        assert_eq!(evaluate("exec(a)", &rec), None);
    }

    #[test]
    fn test_parse_validates_without_record() {
        assert!(parse("round(width_mm * height_mm, 2)").is_ok());
        assert!(parse("round(width_mm *").is_err());
    }

    #[test]
    fn test_if_arity_enforced() {
        let rec = record(&[("a", json!(1))]);
        assert_eq!(evaluate("if(a > 0, 1)", &rec), None);
    }

    #[test]
    fn test_numeric_string_field_coerced() {
        // backend stores dynamic values as JSON strings for some kinds
        let rec = record(&[("a", json!("2.5"))]);
        assert_eq!(evaluate("a * 2", &rec), Some(json!(5.0)));
    }
}
