use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Wire names of the student fields.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const COURSE: &str = "course";
    pub const BATCH: &str = "batch";
    pub const GRADE: &str = "grade";
    pub const DATE_OF_ADMISSION: &str = "dateOfAdmission";

    /// Longest accepted value, in characters. Matches the `student` table columns.
    pub fn max_len(field: &str) -> Option<usize> {
        match field {
            NAME | COURSE => Some(256),
            EMAIL => Some(320),
            BATCH => Some(64),
            _ => None,
        }
    }
}

/// Letter grade; the wire form is the bare letter with an optional `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub const ALL: [Grade; 8] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::CPlus,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Exact match against the wire form; `a`, ` A` and `A-` are not grades.
    pub fn parse(s: &str) -> Option<Grade> {
        Grade::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::parse(s).ok_or_else(|| format!("`{s}` is not one of A+, A, B+, B, C+, C, D, F"))
    }
}

/// Untyped field bag exactly as a JSON caller sent it.
///
/// Nothing reads this except [`crate::student::validate::validate`]; keys the
/// validator does not know (`_id`, `createdAt`, `__v`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentPayload(pub Map<String, Value>);

impl StudentPayload {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }
}

impl From<Map<String, Value>> for StudentPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<&NewStudent> for StudentPayload {
    fn from(s: &NewStudent) -> Self {
        let mut p = StudentPayload::default();
        p.insert(fields::NAME, s.name.clone())
            .insert(fields::EMAIL, s.email.clone())
            .insert(fields::COURSE, s.course.clone())
            .insert(fields::BATCH, s.batch.clone())
            .insert(fields::GRADE, s.grade.as_str())
            .insert(fields::DATE_OF_ADMISSION, s.date_of_admission.format("%Y-%m-%d").to_string());
        p
    }
}

/// Validated and normalised field set: text trimmed, email lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch: String,
    pub grade: Grade,
    pub date_of_admission: NaiveDate,
}

/// A persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch: String,
    pub grade: Grade,
    pub date_of_admission: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn from_parts(id: Uuid, fields: NewStudent, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            course: fields.course,
            batch: fields.batch,
            grade: fields.grade,
            date_of_admission: fields.date_of_admission,
            created_at,
            updated_at,
        }
    }

    /// Replace every mutable field, keeping identity and creation time.
    pub fn apply(&mut self, fields: NewStudent, updated_at: DateTime<Utc>) {
        self.name = fields.name;
        self.email = fields.email;
        self.course = fields.course;
        self.batch = fields.batch;
        self.grade = fields.grade;
        self.date_of_admission = fields.date_of_admission;
        self.updated_at = updated_at;
    }

    pub fn fields(&self) -> NewStudent {
        NewStudent {
            name: self.name.clone(),
            email: self.email.clone(),
            course: self.course.clone(),
            batch: self.batch.clone(),
            grade: self.grade,
            date_of_admission: self.date_of_admission,
        }
    }
}
