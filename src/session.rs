//! Session context.
//!
//! The login flow (external to this crate) returns a user identity and a
//! bearer token; both live here for the session's lifetime and are injected
//! into the API client instead of being read from ambient globals, so tests
//! stay deterministic. The token is wiped from memory at logout.

use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

/// Console role. Only `owner` is recognized by name; every other role
/// string the server hands out is treated as a branch manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Owner,
    BranchManager,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("owner") {
            Role::Owner
        } else {
            Role::BranchManager
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Owner => "owner".to_string(),
            Role::BranchManager => "manager".to_string(),
        }
    }
}

/// The identity payload persisted after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub username: String,
    pub role: Role,
    /// Home branch. Present for branch managers; owners may not have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// An authenticated console session: who is logged in, plus the bearer
/// token every API request carries.
pub struct Session {
    user: UserIdentity,
    token: Zeroizing<String>,
}

impl Session {
    pub fn new(user: UserIdentity, token: String) -> Self {
        Self {
            user,
            token: Zeroizing::new(token),
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// The raw bearer token for the `Authorization` header. Empty after
    /// logout.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// The branch this session is scoped to: `None` means cross-branch
    /// visibility (owner), `Some` restricts order and stock views to one
    /// branch (branch manager).
    pub fn visible_branch(&self) -> Option<&str> {
        match self.user.role {
            Role::Owner => None,
            Role::BranchManager => self.user.branch.as_deref(),
        }
    }

    /// Wipe the token at logout. `Zeroizing` clears the old buffer rather
    /// than leaving the secret in freed memory.
    pub fn clear_token(&mut self) {
        self.token = Zeroizing::new(String::new());
        info!(username = %self.user.username, "session token cleared");
    }
}

#[cfg(test)]
pub(crate) fn test_session(role: Role, branch: Option<&str>) -> Session {
    Session::new(
        UserIdentity {
            name: "Test User".to_string(),
            username: "tester".to_string(),
            role,
            branch: branch.map(str::to_string),
        },
        "test-token".to_string(),
    )
}
