//! Role-based access-control rules
//!
//! Roles form a closed enumeration ranked by mutation privilege, and every
//! mutating action is gated by an explicit capability predicate. Anonymous
//! actors are represented as `None` and never satisfy a role check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User role, ranked by mutation privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Authenticated actor attached to a request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Catalog mutation (create/update/delete Category/Genre/Title): admin only
pub fn can_mutate_catalog(actor: Option<&AuthUser>) -> bool {
    actor.map(|u| u.role.is_admin()).unwrap_or(false)
}

/// The user admin surface is reserved for admins
pub fn can_manage_users(actor: Option<&AuthUser>) -> bool {
    actor.map(|u| u.role.is_admin()).unwrap_or(false)
}

/// Review/Comment update/delete: the author, a moderator, or an admin
pub fn can_modify_contribution(actor: &AuthUser, author_id: Uuid) -> bool {
    actor.id == author_id || actor.role.is_moderator() || actor.role.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            role,
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn only_admin_mutates_catalog() {
        assert!(can_mutate_catalog(Some(&actor(Role::Admin))));
        assert!(!can_mutate_catalog(Some(&actor(Role::Moderator))));
        assert!(!can_mutate_catalog(Some(&actor(Role::User))));
    }

    #[test]
    fn anonymous_never_satisfies_role_checks() {
        assert!(!can_mutate_catalog(None));
        assert!(!can_manage_users(None));
    }

    #[test]
    fn author_can_modify_own_contribution() {
        let user = actor(Role::User);
        assert!(can_modify_contribution(&user, user.id));
    }

    #[test]
    fn moderator_and_admin_can_modify_any_contribution() {
        let someone_else = Uuid::new_v4();
        assert!(can_modify_contribution(&actor(Role::Moderator), someone_else));
        assert!(can_modify_contribution(&actor(Role::Admin), someone_else));
        assert!(!can_modify_contribution(&actor(Role::User), someone_else));
    }
}
