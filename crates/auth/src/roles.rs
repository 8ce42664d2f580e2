use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role code used for RBAC (e.g. "admin", "viewer").
///
/// Roles are opaque short strings at this layer; which permissions a role
/// grants is association data owned by the credential store, never encoded
/// here or inside tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
