//! Current-user identity held by the session.

use secrecy::SecretString;

use kitae_core::UserId;

/// The authenticated user for the current browsing session.
///
/// Produced by whichever auth provider the host wired up; this crate only
/// consumes the resulting identity and bearer token.
#[derive(Clone)]
pub struct CurrentUser {
    /// Server-side user id.
    pub id: UserId,
    /// Email used for payment-provider contact fields.
    pub email: String,
    /// Display name, when the provider supplies one.
    pub name: Option<String>,
    /// Bearer token attached to every API request.
    pub access_token: SecretString,
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
