use serde::Serialize;
use serde_json::{Map, Value};
use validator::ValidateEmail;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 255;
const PHONE_MAX: usize = 50;
const TITLE_MIN: usize = 1;
const TITLE_MAX: usize = 255;

/// A validated enrollment submission. Only [`EnrollmentRequest::parse`]
/// produces one from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub student_name: String,
    pub student_email: String,
    pub phone: Option<String>,
    pub course_id: i64,
    pub course_title: String,
}

/// One rejected field in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub loc: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
}

impl FieldViolation {
    fn new(field: &str, kind: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![field.to_string()],
            kind: kind.to_string(),
            msg: msg.into(),
        }
    }

    /// The body as a whole could not be read as JSON.
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::new("body", "json_invalid", msg)
    }

    pub fn field(&self) -> &str {
        self.loc.first().map(String::as_str).unwrap_or_default()
    }
}

impl EnrollmentRequest {
    /// Parses a raw request body. A missing body is treated as `{}`.
    ///
    /// Every field is checked; all violations are returned together.
    pub fn parse(body: Option<&str>) -> Result<Self, Vec<FieldViolation>> {
        let value: Value = serde_json::from_str(body.unwrap_or("{}"))
            .map_err(|e| vec![FieldViolation::invalid_body(format!("Invalid JSON: {}", e))])?;

        let Value::Object(fields) = value else {
            return Err(vec![FieldViolation::new(
                "body",
                "object_type",
                "Input should be a valid dictionary",
            )]);
        };

        Self::from_fields(&fields)
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let student_name =
            validate_text(fields, "student_name", NAME_MIN, NAME_MAX, &mut violations);
        let student_email = validate_email(fields, "student_email", &mut violations);
        let phone = validate_optional_text(fields, "phone", PHONE_MAX, &mut violations);
        let course_id = validate_positive_int(fields, "course_id", &mut violations);
        let course_title =
            validate_text(fields, "course_title", TITLE_MIN, TITLE_MAX, &mut violations);

        match (student_name, student_email, phone, course_id, course_title) {
            (
                Some(student_name),
                Some(student_email),
                Some(phone),
                Some(course_id),
                Some(course_title),
            ) => {
                Ok(Self {
                    student_name,
                    student_email,
                    phone,
                    course_id,
                    course_title,
                })
            }
            _ => Err(violations),
        }
    }
}

fn missing(field: &str) -> FieldViolation {
    FieldViolation::new(field, "missing", "Field required")
}

fn expect_string(
    fields: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.get(field) {
        None => {
            violations.push(missing(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                "string_type",
                "Input should be a valid string",
            ));
            None
        }
    }
}

fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) -> bool {
    let len = value.chars().count();
    if len < min {
        let unit = if min == 1 { "character" } else { "characters" };
        violations.push(FieldViolation::new(
            field,
            "string_too_short",
            format!("String should have at least {} {}", min, unit),
        ));
        return false;
    }
    if len > max {
        violations.push(FieldViolation::new(
            field,
            "string_too_long",
            format!("String should have at most {} characters", max),
        ));
        return false;
    }
    true
}

pub fn validate_text(
    fields: &Map<String, Value>,
    field: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let value = expect_string(fields, field, violations)?;
    check_length(field, &value, min, max, violations).then_some(value)
}

/// `null` and an absent key both mean "no value".
pub fn validate_optional_text(
    fields: &Map<String, Value>,
    field: &str,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => {
            check_length(field, s, 0, max, violations).then(|| Some(s.clone()))
        }
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                "string_type",
                "Input should be a valid string",
            ));
            None
        }
    }
}

pub fn validate_email(
    fields: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let value = expect_string(fields, field, violations)?;
    if value.validate_email() && has_deliverable_domain(&value) {
        Some(value)
    } else {
        violations.push(FieldViolation::new(
            field,
            "value_error",
            "value is not a valid email address",
        ));
        None
    }
}

/// Domain must be a dotted name; bare hosts and `[...]` literals are refused.
fn has_deliverable_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !domain.starts_with('[')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub fn validate_positive_int(
    fields: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<i64> {
    let value = match fields.get(field) {
        None => {
            violations.push(missing(field));
            return None;
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(_) => None,
    };

    match value {
        Some(v) if v > 0 => Some(v),
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                "greater_than",
                "Input should be greater than 0",
            ));
            None
        }
        None => {
            violations.push(FieldViolation::new(
                field,
                "int_type",
                "Input should be a valid integer",
            ));
            None
        }
    }
}
