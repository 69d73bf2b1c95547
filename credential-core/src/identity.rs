use crate::errors::{Error, Result};
use crate::token::AccessToken;
use std::fmt;

/// Claim names consulted in order when deriving the tenant identity. The
/// primary claim is the provisioning-time customer identifier; the standard
/// subject claim is the fallback.
pub const TENANT_CLAIMS: &[&str] = &["customer_id", "sub"];

/// Stable identifier for the calling tenant. Non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::IdentityMissing);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the tenant identity from the request's verified access token.
///
/// Fails `Unauthenticated` when no token is present and `IdentityMissing`
/// when none of the candidate claims yields a non-empty string. Pure read of
/// already-verified data; no recovery beyond the claim fallback.
pub fn extract_tenant_id(token: Option<&AccessToken>) -> Result<TenantId> {
    let token = token.ok_or(Error::Unauthenticated)?;

    TENANT_CLAIMS
        .iter()
        .find_map(|claim| token.claim_str(claim))
        .map(|value| TenantId(value.to_string()))
        .ok_or(Error::IdentityMissing)
}
