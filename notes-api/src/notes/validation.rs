use serde::{Deserialize, Serialize};

use super::CreateNote;

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 5;

/// One failed rule for one field of a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub value: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.into(),
        }
    }
}

fn min_len(field: &str, value: &str, min: usize, message: &str) -> Option<Violation> {
    (value.chars().count() < min).then(|| Violation::new(field, message, value))
}

/// Checks a create request and returns every violated rule, in field order.
pub fn validate(input: &CreateNote) -> Vec<Violation> {
    [
        min_len("title", &input.title, MIN_TITLE_LEN, "Enter a valid title"),
        min_len(
            "description",
            &input.description,
            MIN_DESCRIPTION_LEN,
            "Description must be atleast 5 characters",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
