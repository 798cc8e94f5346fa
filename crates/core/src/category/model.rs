//! Category model definitions

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

pub const NAME_MAX_LEN: usize = 50;
/// Color applied when a draft does not carry one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// Incoming category fields for create and update.
#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub name: String,
    pub color: Option<String>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Check field constraints. An empty list means the draft is acceptable.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name cannot be empty"));
        } else if self.name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::new(
                "name",
                format!("Name cannot exceed {NAME_MAX_LEN} characters"),
            ));
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                errors.push(FieldError::new(
                    "color",
                    format!("Color must be a hex value like {DEFAULT_COLOR}"),
                ));
            }
        }
        errors
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_name() {
        let errors = CategoryDraft::new("  ").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn validate_rejects_oversized_name() {
        let errors = CategoryDraft::new("x".repeat(NAME_MAX_LEN + 1)).validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn validate_checks_color_shape() {
        assert!(CategoryDraft::new("Work")
            .with_color("#A1b2C3")
            .validate()
            .is_empty());

        for bad in ["3B82F6", "#3B82F", "#3B82F6F", "#GGGGGG", "blue"] {
            let errors = CategoryDraft::new("Work").with_color(bad).validate();
            assert_eq!(errors.len(), 1, "expected {bad:?} to be rejected");
            assert_eq!(errors[0].field, "color");
        }
    }

    #[test]
    fn validate_accepts_boundary_name() {
        let errors = CategoryDraft::new("x".repeat(NAME_MAX_LEN)).validate();
        assert!(errors.is_empty());
    }
}
