//! FILENAME: expr/src/functions.rs
//! PURPOSE: The builtin function table.
//! CONTEXT: Arguments arrive already evaluated. Most functions hand back
//! the first error argument unchanged; the predicates (`isError`,
//! `isNull`, `isBlank`, `isNonBlank`) inspect their argument instead.
//! Unknown names and wrong argument counts evaluate to error values.

use crate::evaluator::access_field;
use model::{EvalResult, Value};

/// Calls the builtin `name` with evaluated arguments.
pub fn call<'a>(name: &str, args: Vec<EvalResult<'a>>) -> EvalResult<'a> {
    match name {
        // Predicates
        "isNull" => predicate(name, &args, |v| v.is_null()),
        "isError" => predicate(name, &args, |v| v.is_error()),
        "isBlank" => predicate(name, &args, is_blank),
        "isNonBlank" => predicate(name, &args, |v| !is_blank(v) && !v.is_error()),

        "coalesce" => fn_coalesce(args),

        _ => {
            if let Some(error) = args.iter().find(|a| a.is_error()) {
                return error.clone();
            }
            match name {
                "toString" => unary(name, args, fn_to_string),
                "toNumber" => unary(name, args, fn_to_number),
                "length" => unary(name, args, fn_length),
                "toUppercase" => text_transform(name, args, |s| s.to_uppercase()),
                "toLowercase" => text_transform(name, args, |s| s.to_lowercase()),
                "trim" => text_transform(name, args, |s| s.trim().to_string()),
                "get" => fn_get(args),
                _ => EvalResult::error(format!("Unknown function {}", name)),
            }
        }
    }
}

/// Names of every builtin.
pub const BUILTINS: [&str; 12] = [
    "toString",
    "toNumber",
    "length",
    "toUppercase",
    "toLowercase",
    "trim",
    "isBlank",
    "isNonBlank",
    "isNull",
    "isError",
    "coalesce",
    "get",
];

fn arity_error<'a>(name: &str, expected: usize) -> EvalResult<'a> {
    EvalResult::error(format!(
        "{} expects {} argument{}",
        name,
        expected,
        if expected == 1 { "" } else { "s" }
    ))
}

fn is_blank(result: &EvalResult<'_>) -> bool {
    match result {
        EvalResult::Value(v) => v.is_blank(),
        EvalResult::Cell(cell) => cell.value.is_blank(),
        EvalResult::Json(serde_json::Value::Null) => true,
        _ => false,
    }
}

fn predicate<'a>(
    name: &str,
    args: &[EvalResult<'a>],
    test: impl Fn(&EvalResult<'a>) -> bool,
) -> EvalResult<'a> {
    match args {
        [arg] => EvalResult::Value(Value::Boolean(test(arg))),
        _ => arity_error(name, 1),
    }
}

fn unary<'a>(
    name: &str,
    args: Vec<EvalResult<'a>>,
    f: impl FnOnce(EvalResult<'a>) -> EvalResult<'a>,
) -> EvalResult<'a> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(arg), None) => f(arg),
        _ => arity_error(name, 1),
    }
}

/// Applies `f` to the textual form of the argument. Null stays null.
fn text_transform<'a>(
    name: &str,
    args: Vec<EvalResult<'a>>,
    f: impl FnOnce(&str) -> String,
) -> EvalResult<'a> {
    unary(name, args, |arg| {
        if arg.is_null() {
            return arg;
        }
        let text = arg.to_value().to_string();
        EvalResult::Value(Value::Text(f(&text)))
    })
}

fn fn_coalesce(args: Vec<EvalResult<'_>>) -> EvalResult<'_> {
    args.into_iter()
        .find(|arg| !arg.is_null())
        .unwrap_or_else(EvalResult::null)
}

fn fn_to_string(arg: EvalResult<'_>) -> EvalResult<'_> {
    if arg.is_null() {
        return arg;
    }
    EvalResult::Value(Value::Text(arg.to_value().to_string()))
}

fn fn_to_number(arg: EvalResult<'_>) -> EvalResult<'_> {
    let value = arg.to_value();
    match &value {
        Value::Null | Value::Integer(_) | Value::Float(_) => EvalResult::Value(value),
        Value::Text(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                EvalResult::Value(Value::Integer(n))
            } else if let Ok(n) = trimmed.parse::<f64>() {
                EvalResult::Value(Value::Float(n))
            } else {
                EvalResult::error(format!("Cannot parse '{}' as a number", s))
            }
        }
        other => EvalResult::error(format!("Cannot convert '{}' to a number", other)),
    }
}

fn fn_length(arg: EvalResult<'_>) -> EvalResult<'_> {
    match &arg {
        EvalResult::List(items) => EvalResult::Value(Value::Integer(items.len() as i64)),
        EvalResult::Value(Value::Text(s)) => {
            EvalResult::Value(Value::Integer(s.chars().count() as i64))
        }
        EvalResult::Cell(cell) => match &cell.value {
            Value::Text(s) => EvalResult::Value(Value::Integer(s.chars().count() as i64)),
            _ => EvalResult::error("length expects a string or an array"),
        },
        _ => EvalResult::error("length expects a string or an array"),
    }
}

/// `get(list, i)` indexes a list (negative counts from the end);
/// `get(x, "name")` reads a field.
fn fn_get(args: Vec<EvalResult<'_>>) -> EvalResult<'_> {
    let mut args = args.into_iter();
    let (target, key) = match (args.next(), args.next(), args.next()) {
        (Some(target), Some(key), None) => (target, key),
        _ => return arity_error("get", 2),
    };

    if target.is_null() {
        return target;
    }

    match (target, key) {
        (EvalResult::List(items), EvalResult::Value(Value::Integer(i))) => {
            let len = items.len() as i64;
            let index = if i < 0 { len + i } else { i };
            if index < 0 || index >= len {
                return EvalResult::null();
            }
            items
                .into_iter()
                .nth(index as usize)
                .unwrap_or_else(EvalResult::null)
        }
        (target, EvalResult::Value(Value::Text(field))) => access_field(target, &field),
        (_, key) => EvalResult::error(format!("get cannot use '{}' as a key", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> EvalResult<'static> {
        EvalResult::Value(Value::from(s))
    }

    #[test]
    fn text_functions() {
        assert_eq!(call("toUppercase", vec![text("abc")]), text("ABC"));
        assert_eq!(call("toLowercase", vec![text("AbC")]), text("abc"));
        assert_eq!(call("trim", vec![text("  x ")]), text("x"));
        assert_eq!(call("toString", vec![Value::Integer(7).into()]), text("7"));
        assert!(call("trim", vec![EvalResult::null()]).is_null());
    }

    #[test]
    fn to_number_parses_text() {
        assert_eq!(
            call("toNumber", vec![text(" 42 ")]),
            EvalResult::Value(Value::Integer(42))
        );
        assert_eq!(
            call("toNumber", vec![text("2.5")]),
            EvalResult::Value(Value::Float(2.5))
        );
        assert!(call("toNumber", vec![text("abc")]).is_error());
    }

    #[test]
    fn errors_propagate_through_functions() {
        let err = EvalResult::error("boom");
        assert_eq!(call("toUppercase", vec![err.clone()]), err);
        assert_eq!(call("length", vec![err.clone()]), err);
        assert_eq!(
            call("isError", vec![err.clone()]),
            EvalResult::Value(Value::Boolean(true))
        );
        assert_eq!(
            call("isNonBlank", vec![err]),
            EvalResult::Value(Value::Boolean(false))
        );
    }

    #[test]
    fn unknown_functions_and_bad_arity_are_error_values() {
        assert!(call("frobnicate", vec![]).is_error());
        assert!(call("trim", vec![]).is_error());
        assert!(call("get", vec![text("a")]).is_error());
    }

    #[test]
    fn coalesce_and_predicates() {
        assert_eq!(
            call("coalesce", vec![EvalResult::null(), text("b"), text("c")]),
            text("b")
        );
        assert!(call("coalesce", vec![]).is_null());
        assert_eq!(
            call("isBlank", vec![text("")]),
            EvalResult::Value(Value::Boolean(true))
        );
    }

    #[test]
    fn get_indexes_lists() {
        let list = EvalResult::List(vec![text("a"), text("b"), text("c")]);
        assert_eq!(
            call("get", vec![list.clone(), Value::Integer(-1).into()]),
            text("c")
        );
        assert!(call("get", vec![list, Value::Integer(9).into()]).is_null());
    }
}
