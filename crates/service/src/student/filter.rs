//! Case-insensitive substring search over name, email and course.
//!
//! Pure functions over an already fetched snapshot: nothing here locks, caches or
//! mutates. Call again whenever the snapshot or the term changes.

use super::domain::Student;

/// A case-folded search term. The empty term matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    /// Only an absent or zero-length term means "everything"; whitespace is a
    /// legitimate substring to look for.
    pub fn new(raw: Option<&str>) -> Self {
        Self(raw.filter(|t| !t.is_empty()).map(str::to_lowercase))
    }

    pub fn all() -> Self {
        Self(None)
    }

    pub fn is_all(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn matches(&self, student: &Student) -> bool {
        let Some(term) = &self.0 else { return true };
        [&student.name, &student.email, &student.course]
            .into_iter()
            .any(|field| field.to_lowercase().contains(term.as_str()))
    }
}

impl From<&str> for SearchTerm {
    fn from(raw: &str) -> Self {
        SearchTerm::new(Some(raw))
    }
}

/// Lazily yield the records matching `term`, in snapshot order.
pub fn search<'a>(records: &'a [Student], term: &'a SearchTerm) -> impl Iterator<Item = &'a Student> + 'a {
    records.iter().filter(move |s| term.matches(s))
}
