//! Request validation: which operation, and is its payload usable.

use crate::error::DispatchError;
use crate::services::numeric;
use serde_json::Value;

/// Recognized operation keys, in the order they are listed to callers.
pub const OPERATION_NAMES: [&str; 5] = ["sequence", "primality", "lcm", "hcf", "ask"];

pub const MAX_SEQUENCE_LENGTH: i64 = 1000;
pub const MAX_PRIMALITY_ELEMENTS: usize = 100;
pub const MAX_QUESTION_CHARS: usize = 500;

/// The single operation a request asked for, with its checked payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<'a> {
    Sequence(usize),
    /// Array payload; its coercible elements number at most
    /// [`MAX_PRIMALITY_ELEMENTS`].
    Primality(&'a Value),
    /// Non-empty, with at least one coercible operand.
    Lcm(&'a [Value]),
    Hcf(&'a [Value]),
    /// Question with surrounding whitespace removed.
    Ask(&'a str),
}

impl Operation<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Sequence(_) => "sequence",
            Operation::Primality(_) => "primality",
            Operation::Lcm(_) => "lcm",
            Operation::Hcf(_) => "hcf",
            Operation::Ask(_) => "ask",
        }
    }
}

/// Pick the one operation in `body` and check its payload.
///
/// Runs before any computation or network call.
pub fn validate(body: &Value) -> Result<Operation<'_>, DispatchError> {
    let (name, payload) = single_operation(body)?;

    match name {
        "sequence" => validate_sequence(payload),
        "primality" => validate_primality(payload),
        "lcm" => validate_operands(name, payload).map(Operation::Lcm),
        "hcf" => validate_operands(name, payload).map(Operation::Hcf),
        "ask" => validate_question(payload),
        _ => unreachable!("single_operation only yields recognized names"),
    }
}

/// Exactly one recognized key must carry a value. An empty string counts as
/// absent; a non-object body has no keys at all.
fn single_operation(body: &Value) -> Result<(&'static str, &Value), DispatchError> {
    let mut present = OPERATION_NAMES.iter().filter_map(|&name| {
        body.get(name)
            .filter(|value| value.as_str() != Some(""))
            .map(|value| (name, value))
    });

    match (present.next(), present.next()) {
        (Some(found), None) => Ok(found),
        _ => Err(DispatchError::Validation(format!(
            "Request must contain exactly one of: {}",
            OPERATION_NAMES.join(", ")
        ))),
    }
}

fn validate_sequence(payload: &Value) -> Result<Operation<'_>, DispatchError> {
    let n = match payload {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.floor() as i64)
        }),
        Value::String(_) => numeric::truncate_integer(payload),
        _ => None,
    };

    match n {
        Some(n) if (0..=MAX_SEQUENCE_LENGTH).contains(&n) => Ok(Operation::Sequence(n as usize)),
        _ => Err(DispatchError::Validation(format!(
            "sequence must be a non-negative integer (max {})",
            MAX_SEQUENCE_LENGTH
        ))),
    }
}

fn validate_primality(payload: &Value) -> Result<Operation<'_>, DispatchError> {
    let items = payload.as_array().ok_or_else(|| {
        DispatchError::Validation("primality must be an array of integers".to_string())
    })?;

    if numeric::integers(items).len() > MAX_PRIMALITY_ELEMENTS {
        return Err(DispatchError::Validation(format!(
            "primality array too large (max {})",
            MAX_PRIMALITY_ELEMENTS
        )));
    }

    Ok(Operation::Primality(payload))
}

fn validate_operands<'a>(name: &str, payload: &'a Value) -> Result<&'a [Value], DispatchError> {
    let items = payload
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| {
            DispatchError::Validation(format!("{} must be a non-empty array of integers", name))
        })?;

    if numeric::operands(items).is_empty() {
        return Err(DispatchError::from_numeric(
            name,
            numeric::NumericError::NoValidOperands,
        ));
    }

    Ok(items)
}

fn validate_question(payload: &Value) -> Result<Operation<'_>, DispatchError> {
    let question = payload
        .as_str()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            DispatchError::Validation("ask must be a non-empty string (question)".to_string())
        })?;

    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(DispatchError::Validation(format!(
            "ask question too long (max {} characters)",
            MAX_QUESTION_CHARS
        )));
    }

    Ok(Operation::Ask(question))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<Operation<'_>, DispatchError>) -> String {
        result.expect_err("expected validation failure").to_string()
    }

    #[test]
    fn test_exactly_one_operation_required() {
        let expected = "Request must contain exactly one of: sequence, primality, lcm, hcf, ask";
        assert_eq!(message(validate(&json!({}))), expected);
        assert_eq!(message(validate(&json!({"sequence": 5, "lcm": [2, 3]}))), expected);
        assert_eq!(message(validate(&json!({"unknown": 1}))), expected);
        assert_eq!(message(validate(&json!([1, 2]))), expected);
        assert_eq!(validate(&json!({"sequence": 5})).unwrap(), Operation::Sequence(5));
    }

    #[test]
    fn test_empty_string_counts_as_absent() {
        let body = json!({"sequence": 5, "ask": ""});
        assert_eq!(validate(&body).unwrap(), Operation::Sequence(5));
    }

    #[test]
    fn test_null_counts_as_present() {
        assert!(validate(&json!({"sequence": 5, "lcm": null})).is_err());
        assert!(matches!(
            validate(&json!({"sequence": null})),
            Err(DispatchError::Validation(_))
        ));
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let body = json!({"hcf": [4, 6], "note": "hi"});
        assert!(matches!(validate(&body).unwrap(), Operation::Hcf(items) if items.len() == 2));
    }

    #[test]
    fn test_sequence_range_and_coercion() {
        assert_eq!(validate(&json!({"sequence": 0})).unwrap(), Operation::Sequence(0));
        assert_eq!(validate(&json!({"sequence": 1000})).unwrap(), Operation::Sequence(1000));
        assert_eq!(validate(&json!({"sequence": "12"})).unwrap(), Operation::Sequence(12));
        assert_eq!(validate(&json!({"sequence": "7 terms"})).unwrap(), Operation::Sequence(7));
        assert_eq!(validate(&json!({"sequence": 4.8})).unwrap(), Operation::Sequence(4));

        for bad in [json!(1001), json!(-1), json!(-0.5), json!("abc"), json!(true), json!([5])] {
            assert_eq!(
                message(validate(&json!({ "sequence": bad }))),
                "sequence must be a non-negative integer (max 1000)"
            );
        }
    }

    #[test]
    fn test_primality_shape_and_cap() {
        assert_eq!(
            message(validate(&json!({"primality": 7}))),
            "primality must be an array of integers"
        );

        let hundred: Vec<i64> = (1..=100).collect();
        assert!(validate(&json!({ "primality": hundred })).is_ok());

        let too_many: Vec<i64> = (1..=101).collect();
        assert_eq!(
            message(validate(&json!({ "primality": too_many }))),
            "primality array too large (max 100)"
        );

        // The cap counts coercible elements only.
        let mut padded: Vec<Value> = (1..=100).map(|n| json!(n)).collect();
        padded.extend((0..50).map(|_| json!("x")));
        assert!(validate(&json!({ "primality": padded })).is_ok());
    }

    #[test]
    fn test_operand_arrays() {
        assert_eq!(
            message(validate(&json!({"lcm": []}))),
            "lcm must be a non-empty array of integers"
        );
        assert_eq!(
            message(validate(&json!({"hcf": "12,18"}))),
            "hcf must be a non-empty array of integers"
        );

        let body = json!({"hcf": ["a", {"n": 4}]});
        let gap = validate(&body);
        assert!(matches!(gap, Err(DispatchError::ComputationGap(_))));
        assert_eq!(message(gap), "hcf array must contain valid integers");

        // Loosely numeric elements are operands, not gaps.
        let body = json!({"lcm": ["a", true]});
        assert!(matches!(validate(&body), Ok(Operation::Lcm(items)) if items.len() == 2));
    }

    #[test]
    fn test_question_rules() {
        assert_eq!(
            validate(&json!({"ask": "  Capital of France?  "})).unwrap(),
            Operation::Ask("Capital of France?")
        );
        assert_eq!(
            message(validate(&json!({"ask": "   "}))),
            "ask must be a non-empty string (question)"
        );
        assert_eq!(
            message(validate(&json!({"ask": 42}))),
            "ask must be a non-empty string (question)"
        );

        let exactly_max = format!("  {}  ", "q".repeat(500));
        assert!(validate(&json!({ "ask": exactly_max })).is_ok());
        assert_eq!(
            message(validate(&json!({ "ask": "q".repeat(501) }))),
            "ask question too long (max 500 characters)"
        );
    }
}
