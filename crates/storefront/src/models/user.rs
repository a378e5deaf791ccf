//! User and group membership models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use arcadia_core::UserId;

/// Group granted to every registered account.
pub const GROUP_CLIENT: &str = "client";

/// Group allowed to manage the catalog and orders.
pub const GROUP_MANAGER: &str = "manager";

/// A user account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// A user together with their group memberships, as seen by extractors.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub groups: Vec<String>,
}

impl CurrentUser {
    /// Authorization is plain group membership: managers are superusers
    /// or members of the `manager` group.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.user.is_superuser || self.groups.iter().any(|g| g == GROUP_MANAGER)
    }

    /// The user's ID.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool) -> User {
        User {
            id: UserId::new(1),
            username: "player1".to_string(),
            email: "player1@example.com".to_string(),
            is_superuser,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_manager_by_group() {
        let current = CurrentUser {
            user: user(false),
            groups: vec![GROUP_CLIENT.to_string(), GROUP_MANAGER.to_string()],
        };
        assert!(current.is_manager());
    }

    #[test]
    fn test_manager_by_superuser() {
        let current = CurrentUser {
            user: user(true),
            groups: vec![],
        };
        assert!(current.is_manager());
    }

    #[test]
    fn test_client_is_not_manager() {
        let current = CurrentUser {
            user: user(false),
            groups: vec![GROUP_CLIENT.to_string()],
        };
        assert!(!current.is_manager());
    }
}
