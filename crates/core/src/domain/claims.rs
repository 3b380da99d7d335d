// Caller Claims
//
// The gateway in front of the API extracts token claims; this service only
// consumes them. Auth policy itself is out of scope here.

use serde::{Deserialize, Serialize};

/// Identity claims forwarded by the fronting gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallerClaims {
    /// Stable subject identifier (preferred)
    #[serde(default)]
    pub sub: Option<String>,

    /// Username claim (fallback when no subject is present)
    #[serde(default)]
    pub username: Option<String>,
}

impl CallerClaims {
    /// Resolve the user id with the tiered strategy: subject first, then
    /// username. Blank values count as absent. Returns None when neither
    /// claim yields an identity.
    pub fn resolve_user_id(&self) -> Option<String> {
        for claim in [&self.sub, &self.username] {
            if let Some(value) = claim {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }
}
