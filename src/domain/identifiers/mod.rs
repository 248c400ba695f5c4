pub mod validation;

use crate::domain::AppError;
use crate::impl_validated_id;

/// A validated project name.
///
/// Guarantees:
/// - Starts with an ASCII letter
/// - Contains only alphanumeric characters, `-`, or `_`
/// - No path traversal components
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl_validated_id!(ProjectName, validation::validate_project_name, AppError::InvalidProjectName);

/// A validated feature key (e.g. `mail`, `button`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(String);

impl_validated_id!(FeatureKey, validation::validate_identifier, AppError::InvalidFeatureKey);
