// User Identity Domain Model

/// Resolved notification identity for one user.
///
/// Looked up per job from the identity directory, never cached across jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
}
