//! Seating request parsing.
//!
//! Accepts the loosely typed body callers send:
//! `{"departments": "cs - 1" | ["cs - 1", ...], "classrooms": 3, "studentsPerClass": 30}`.

use crate::service::seating_service::{
    SeatingError, SeatingRequest, DEFAULT_CLASSROOMS, DEFAULT_STUDENTS_PER_CLASS,
};
use serde_json::{Map, Value};

const DEPARTMENTS_KEY: &str = "departments";
const CLASSROOMS_KEY: &str = "classrooms";
const STUDENTS_PER_CLASS_KEY: &str = "studentsPerClass";

/// Parses raw request text.
///
/// # Errors
/// - `MalformedRequest` when the text is not a JSON object.
/// - Everything [`parse_seating_request`] returns.
pub fn parse_seating_request_str(body: &str) -> Result<SeatingRequest, SeatingError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| SeatingError::MalformedRequest(err.to_string()))?;
    parse_seating_request(&value)
}

/// Validates a JSON request body.
///
/// - `departments` may be one string or an array; blank entries are skipped.
/// - `classrooms` and `studentsPerClass` accept integers, integral strings and
///   floats (truncated); both are floored at 1.
///
/// # Errors
/// - `MalformedRequest` when `body` is not an object.
/// - `NoCohortsRequested` when no department label remains.
/// - `InvalidParameter` when a numeric field cannot be read as an integer.
pub fn parse_seating_request(body: &Value) -> Result<SeatingRequest, SeatingError> {
    let Some(fields) = body.as_object() else {
        return Err(SeatingError::MalformedRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    let cohorts = requested_cohorts(fields.get(DEPARTMENTS_KEY));
    if cohorts.is_empty() {
        return Err(SeatingError::NoCohortsRequested);
    }

    Ok(SeatingRequest {
        cohorts,
        classrooms: count_field(fields, CLASSROOMS_KEY, DEFAULT_CLASSROOMS)?,
        students_per_class: count_field(fields, STUDENTS_PER_CLASS_KEY, DEFAULT_STUDENTS_PER_CLASS)?,
    })
}

fn requested_cohorts(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(label)) => non_blank(label).into_iter().collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(label) => non_blank(label),
                Value::Number(number) if !is_zero(number) => non_blank(&number.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn count_field(
    fields: &Map<String, Value>,
    field: &'static str,
    default: usize,
) -> Result<usize, SeatingError> {
    let Some(value) = fields.get(field) else {
        return Ok(default);
    };

    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    };

    match parsed {
        Some(count) => Ok(usize::try_from(count.max(1)).unwrap_or(usize::MAX)),
        None => Err(SeatingError::InvalidParameter {
            field,
            value: value.to_string(),
        }),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_zero(number: &serde_json::Number) -> bool {
    number.as_f64() == Some(0.0)
}

#[cfg(test)]
mod tests {
    use super::{parse_seating_request, parse_seating_request_str};
    use crate::service::seating_service::SeatingError;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_counts_missing() {
        let request = parse_seating_request(&json!({"departments": " cs - 1 "})).unwrap();
        assert_eq!(request.cohorts, vec!["cs - 1"]);
        assert_eq!(request.classrooms, 3);
        assert_eq!(request.students_per_class, 30);
    }

    #[test]
    fn counts_accept_strings_and_floats_and_floor_at_one() {
        let request = parse_seating_request(&json!({
            "departments": ["cs - 1", "", "  ", null, "ee - 1"],
            "classrooms": " 4 ",
            "studentsPerClass": -7
        }))
        .unwrap();
        assert_eq!(request.cohorts, vec!["cs - 1", "ee - 1"]);
        assert_eq!(request.classrooms, 4);
        assert_eq!(request.students_per_class, 1);

        let request =
            parse_seating_request(&json!({"departments": "cs - 1", "classrooms": 2.9})).unwrap();
        assert_eq!(request.classrooms, 2);
    }

    #[test]
    fn non_integer_count_is_invalid_parameter() {
        let err = parse_seating_request(&json!({"departments": "cs - 1", "classrooms": "three"}))
            .unwrap_err();
        assert!(matches!(
            err,
            SeatingError::InvalidParameter { field: "classrooms", .. }
        ));

        let err = parse_seating_request(&json!({"departments": "cs - 1", "studentsPerClass": null}))
            .unwrap_err();
        assert!(matches!(
            err,
            SeatingError::InvalidParameter { field: "studentsPerClass", .. }
        ));
    }

    #[test]
    fn blank_departments_are_rejected() {
        let err = parse_seating_request(&json!({"departments": "   "})).unwrap_err();
        assert!(matches!(err, SeatingError::NoCohortsRequested));

        let err = parse_seating_request(&json!({"classrooms": 2})).unwrap_err();
        assert!(matches!(err, SeatingError::NoCohortsRequested));
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            parse_seating_request_str("[1, 2]").unwrap_err(),
            SeatingError::MalformedRequest(_)
        ));
        assert!(matches!(
            parse_seating_request_str("not json").unwrap_err(),
            SeatingError::MalformedRequest(_)
        ));
    }
}
