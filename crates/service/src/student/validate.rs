//! Raw payload to [`NewStudent`] conversion.
//!
//! All violations are collected rather than stopping at the first one, so a form
//! can flag every bad field in a single round trip.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::domain::{fields, Grade, NewStudent, StudentPayload};
use super::errors::{Rule, ValidationErrors};

pub fn validate(payload: &StudentPayload) -> Result<NewStudent, ValidationErrors> {
    let mut errs = ValidationErrors::default();

    let name = text(payload, fields::NAME, &mut errs);
    let email = text(payload, fields::EMAIL, &mut errs).map(|e| e.to_lowercase());
    let course = text(payload, fields::COURSE, &mut errs);
    let batch = text(payload, fields::BATCH, &mut errs);
    let grade = grade(payload, &mut errs);
    let date_of_admission = date(payload, &mut errs);

    match (name, email, course, batch, grade, date_of_admission) {
        (Some(name), Some(email), Some(course), Some(batch), Some(grade), Some(date_of_admission)) if errs.is_empty() => {
            Ok(NewStudent { name, email, course, batch, grade, date_of_admission })
        }
        _ => Err(errs),
    }
}

/// Required text, trimmed. Numbers are accepted as their decimal text.
fn text(payload: &StudentPayload, field: &'static str, errs: &mut ValidationErrors) -> Option<String> {
    let raw = match payload.get(field) {
        None | Some(Value::Null) => {
            errs.push(field, Rule::Required, format!("{field} is required"));
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errs.push(field, Rule::NotText, format!("{field} must be text"));
            return None;
        }
    };
    if raw.is_empty() {
        errs.push(field, Rule::Empty, format!("{field} must not be empty"));
        return None;
    }
    if let Some(max) = fields::max_len(field) {
        if raw.chars().count() > max {
            errs.push(field, Rule::TooLong, format!("{field} must be at most {max} characters"));
            return None;
        }
    }
    Some(raw)
}

fn grade(payload: &StudentPayload, errs: &mut ValidationErrors) -> Option<Grade> {
    let field = fields::GRADE;
    match payload.get(field) {
        None | Some(Value::Null) => {
            errs.push(field, Rule::Required, format!("{field} is required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errs.push(field, Rule::Empty, format!("{field} must not be empty"));
            None
        }
        Some(Value::String(s)) => {
            let parsed = Grade::parse(s);
            if parsed.is_none() {
                errs.push(field, Rule::InvalidGrade, format!("{field} must be one of A+, A, B+, B, C+, C, D, F"));
            }
            parsed
        }
        Some(_) => {
            errs.push(field, Rule::InvalidGrade, format!("{field} must be one of A+, A, B+, B, C+, C, D, F"));
            None
        }
    }
}

fn date(payload: &StudentPayload, errs: &mut ValidationErrors) -> Option<NaiveDate> {
    let field = fields::DATE_OF_ADMISSION;
    let raw = match payload.get(field) {
        None | Some(Value::Null) => {
            errs.push(field, Rule::Required, format!("{field} is required"));
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errs.push(field, Rule::InvalidDate, format!("{field} must be an ISO date string"));
            return None;
        }
    };
    if raw.is_empty() {
        errs.push(field, Rule::Empty, format!("{field} must not be empty"));
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errs.push(field, Rule::InvalidDate, format!("{field} `{raw}` is not a valid calendar date"));
    }
    parsed
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC calendar day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc).date_naive()))
}
