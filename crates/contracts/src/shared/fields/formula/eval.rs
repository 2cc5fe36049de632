//! AST evaluation against an explicit binding environment

use serde_json::{Map, Number, Value as Json};

use super::parser::{BinOp, Expr, Func};
use super::FormulaError;

/// Evaluation value. Converted to/from JSON only at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
}

pub fn to_json(value: Value) -> Json {
    match value {
        Value::Number(n) => Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null),
        Value::Str(s) => Json::String(s),
        Value::Bool(b) => Json::Bool(b),
    }
}

pub fn eval(expr: &Expr, record: &Map<String, Json>) -> Result<Value, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Field(name) => lookup(name, record),
        Expr::Neg(inner) => {
            let n = number(eval(inner, record)?)?;
            Ok(Value::Number(-n))
        }
        Expr::Binary(op, left, right) => {
            let left = eval(left, record)?;
            let right = eval(right, record)?;
            binary(*op, left, right)
        }
        Expr::Call(func, args) => call(*func, args, record),
    }
}

fn lookup(name: &str, record: &Map<String, Json>) -> Result<Value, FormulaError> {
    let json = record
        .get(name)
        .ok_or_else(|| FormulaError::UnknownField(name.to_string()))?;
    match json {
        Json::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or(FormulaError::NonFinite),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        // dynamic values arrive as strings for several kinds; numeric
        // strings participate in arithmetic, the rest stay strings
        Json::String(s) => Ok(match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Str(s.clone()),
        }),
        Json::Null => Err(FormulaError::UnknownField(name.to_string())),
        other => Err(FormulaError::Type(format!(
            "field '{}' has unsupported value {}",
            name, other
        ))),
    }
}

fn number(value: Value) -> Result<f64, FormulaError> {
    match value {
        Value::Number(n) => Ok(n),
        other => Err(FormulaError::Type(format!("expected number, got {:?}", other))),
    }
}

fn finite(n: f64) -> Result<Value, FormulaError> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(FormulaError::NonFinite)
    }
}

fn binary(op: BinOp, left: Value, right: Value) -> Result<Value, FormulaError> {
    use BinOp::*;
    match op {
        Add => finite(number(left)? + number(right)?),
        Sub => finite(number(left)? - number(right)?),
        Mul => finite(number(left)? * number(right)?),
        Div => finite(number(left)? / number(right)?),
        Lt | Gt | Le | Ge => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => None,
            }
            .ok_or_else(|| FormulaError::Type("incomparable operands".into()))?;
            Ok(Value::Bool(match op {
                Lt => ordering.is_lt(),
                Gt => ordering.is_gt(),
                Le => ordering.is_le(),
                _ => ordering.is_ge(),
            }))
        }
        Eq | Ne => {
            let equal = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a == b,
                (Value::Str(a), Value::Str(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                _ => false,
            };
            Ok(Value::Bool(if op == Eq { equal } else { !equal }))
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
    }
}

/// Half-away-from-zero on the scaled value
fn round_to(x: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (x * factor).round() / factor
}

fn call(func: Func, args: &[Expr], record: &Map<String, Json>) -> Result<Value, FormulaError> {
    let eval_all = |args: &[Expr]| -> Result<Vec<Value>, FormulaError> {
        args.iter().map(|a| eval(a, record)).collect()
    };

    match func {
        Func::If => {
            if args.len() != 3 {
                return Err(FormulaError::Arity("if"));
            }
            let cond = eval(&args[0], record)?;
            if truthy(&cond) {
                eval(&args[1], record)
            } else {
                eval(&args[2], record)
            }
        }
        Func::Round => {
            if args.len() != 2 {
                return Err(FormulaError::Arity("round"));
            }
            let x = number(eval(&args[0], record)?)?;
            let digits = number(eval(&args[1], record)?)? as i32;
            finite(round_to(x, digits))
        }
        Func::Abs => {
            if args.len() != 1 {
                return Err(FormulaError::Arity("abs"));
            }
            let x = number(eval(&args[0], record)?)?;
            finite(x.abs())
        }
        Func::Min | Func::Max => {
            if args.is_empty() {
                return Err(FormulaError::Arity("min/max"));
            }
            let values = eval_all(args)?;
            let mut result = number(values[0].clone())?;
            for v in &values[1..] {
                let n = number(v.clone())?;
                result = if func == Func::Min {
                    result.min(n)
                } else {
                    result.max(n)
                };
            }
            finite(result)
        }
        Func::Concat => {
            let values = eval_all(args)?;
            Ok(Value::Str(
                values.iter().map(stringify).collect::<Vec<_>>().join(""),
            ))
        }
        Func::FormatNumber => {
            if args.len() != 2 {
                return Err(FormulaError::Arity("format_number"));
            }
            let x = number(eval(&args[0], record)?)?;
            let digits = number(eval(&args[1], record)?)?.max(0.0) as usize;
            let rounded = round_to(x, digits as i32);
            Ok(Value::Str(format!("{:.*}", digits, rounded)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero_on_scaled_value() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.005 + 2.333, 2), 3.34);
    }

    #[test]
    fn test_stringify_integers_without_fraction() {
        assert_eq!(stringify(&Value::Number(5.0)), "5");
        assert_eq!(stringify(&Value::Number(5.25)), "5.25");
        assert_eq!(stringify(&Value::Bool(true)), "true");
    }

    #[test]
    fn test_truthiness() {
        assert!(truthy(&Value::Number(0.5)));
        assert!(!truthy(&Value::Number(0.0)));
        assert!(!truthy(&Value::Str(String::new())));
        assert!(truthy(&Value::Str("x".into())));
    }
}
