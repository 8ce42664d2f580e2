use std::collections::BTreeSet;

use thiserror::Error;

use crate::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires one of [{0}]")]
    Forbidden(String),
}

/// Decide whether an effective permission set satisfies a route requirement.
///
/// Any-of policy: the check passes when the caller holds at least one of the
/// required permissions. An empty requirement always passes; it marks routes
/// that need authentication but no specific grant.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(granted: &BTreeSet<Permission>, required: &[Permission]) -> Result<(), AuthzError> {
    if required.is_empty() {
        return Ok(());
    }

    if required.iter().any(|p| granted.contains(p)) {
        return Ok(());
    }

    let wanted = required
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AuthzError::Forbidden(wanted))
}
