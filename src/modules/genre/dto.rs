use serde::Deserialize;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateGenreRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

// Same rule movie requests apply to genre names, so any created genre can be
// resolved by name later.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Name should not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        for name in ["", "   ", "\t"] {
            let req = CreateGenreRequest { name: name.into() };
            let errors = req.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("name"));
        }

        assert!(CreateGenreRequest { name: "Noir".into() }.validate().is_ok());
    }
}
