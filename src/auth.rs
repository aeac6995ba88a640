/// Credentials and ownership context attached to every portal request.
///
/// The portal scopes uploads and jobs to a group and the authenticated
/// user; both ids travel as form fields alongside the token header.
/// Passed explicitly into the transport and orchestrator so tests can
/// inject fake credentials.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: String,
    pub user_id: i64,
    pub group_id: i64,
}

impl AuthContext {
    pub fn new(token: impl Into<String>, user_id: i64, group_id: i64) -> AuthContext {
        AuthContext { token: token.into(), user_id, group_id }
    }

    /// Value of the `Authorization` header the portal expects.
    pub fn authorization_header(&self) -> String {
        format!("Token {}", self.token)
    }
}
