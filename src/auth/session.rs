/// The client-side credential pair (token + role) as an explicit object with
/// a create/clear lifecycle, instead of storage keyed by string constants.
/// Opened at login, cleared wholesale at logout or when the guard rejects a
/// dead token. `was_cleared` lets the HTTP layer tell a client to drop its
/// persisted copy.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    role: Option<String>,
    cleared: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn open(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role.into()),
            cleared: false,
        }
    }

    /// Builds the per-request view of the store from a bearer token. The
    /// role half lives only on the client and is re-derived from the claims.
    pub fn from_bearer(token: Option<String>) -> Self {
        Self {
            token,
            role: None,
            cleared: false,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.role.is_none()
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.role = None;
        self.cleared = true;
    }

    pub fn was_cleared(&self) -> bool {
        self.cleared
    }
}
