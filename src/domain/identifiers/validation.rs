/// Validates an identifier string.
///
/// Checks:
/// - Non-empty
/// - No path separators (/, \)
/// - Not "." or ".."
/// - Characters are alphanumeric, '-', or '_'
pub fn validate_identifier(id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    if id.contains('/') || id.contains('\\') {
        return false;
    }
    if id == "." || id == ".." {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates a project name, which also becomes a directory name.
///
/// Stricter than `validate_identifier`: the first character must be a letter.
pub fn validate_project_name(name: &str) -> bool {
    validate_identifier(name) && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

#[macro_export]
macro_rules! impl_validated_id {
    ($name:ident, $validator:path, $err_variant:path) => {
        impl $name {
            /// Validate and create a new instance.
            pub fn new(id: &str) -> Result<Self, $crate::domain::AppError> {
                if $validator(id) { Ok(Self(id.to_string())) } else { Err($err_variant(id.to_string())) }
            }

            /// Return the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(validate_identifier("valid-id"));
        assert!(validate_identifier("valid_id"));
        assert!(validate_identifier("ValidId123"));
    }

    #[test]
    fn invalid_identifiers() {
        assert!(!validate_identifier(""));
        assert!(!validate_identifier("invalid/id"));
        assert!(!validate_identifier("invalid\\id"));
        assert!(!validate_identifier(".."));
        assert!(!validate_identifier("has space"));
        assert!(!validate_identifier("dotted.name"));
    }

    #[test]
    fn project_name_must_start_with_letter() {
        assert!(validate_project_name("shop"));
        assert!(validate_project_name("shop_api-2"));
        assert!(!validate_project_name("2shop"));
        assert!(!validate_project_name("_shop"));
        assert!(!validate_project_name(""));
    }
}
