use serde::{Deserialize, Serialize};

/// Roles allowed to read the project dashboard.
const DASHBOARD_ROLES: [&str; 2] = ["admin", "manager"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    /// Workspace role carried by the token. Tokens minted before roles were
    /// introduced may not carry one; those are treated as unprivileged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Whether this token's role grants access to the dashboard endpoints.
    ///
    /// A missing role denies access (fail-safe).
    pub fn can_view_dashboard(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| DASHBOARD_ROLES.iter().any(|r| role.eq_ignore_ascii_case(r)))
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
