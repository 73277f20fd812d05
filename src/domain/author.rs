//! Author entity and its validation rules.

use crate::error::FieldViolation;

/// Longest accepted first or last name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Repository-assigned author identifier.
pub type AuthorId = i64;

// == Author ==
/// An author as stored by the repository. `id` is None until first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Option<AuthorId>,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// Creates an unsaved author.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn with_id(mut self, id: AuthorId) -> Self {
        self.id = Some(id);
        self
    }

    // == Validate ==
    /// Checks every field rule and returns all violations, empty when valid.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_name("firstName", &self.first_name, &mut violations);
        check_name("lastName", &self.last_name, &mut violations);
        violations
    }
}

fn check_name(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(field, "This value should not be blank."));
    } else if value.chars().count() > MAX_NAME_LENGTH {
        violations.push(FieldViolation::new(
            field,
            format!(
                "This value is too long. It should have {} characters or less.",
                MAX_NAME_LENGTH
            ),
        ));
    }
}
