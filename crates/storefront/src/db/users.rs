//! User account and group membership repository.

use sqlx::PgPool;

use arcadia_core::UserId;

use crate::models::user::{CurrentUser, User, GROUP_CLIENT};

use super::RepositoryError;

const USER_COLUMNS: &str = "id, username, email, is_superuser, created_at";

/// Repository for account operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user and enroll them in the `client` group.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the username is already taken.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "username already taken"))?;

        sqlx::query(
            "INSERT INTO user_groups (user_id, group_id) \
             SELECT $1, id FROM groups WHERE name = $2 \
             ON CONFLICT DO NOTHING",
        )
        .bind(user.id)
        .bind(GROUP_CLIENT)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// The stored password hash for a username, for login verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(UserId, String)>, RepositoryError> {
        let row: Option<(UserId, String)> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// Group names the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn groups_of(&self, user_id: UserId) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT g.name FROM groups g \
             JOIN user_groups ug ON ug.group_id = g.id \
             WHERE ug.user_id = $1 ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// A user together with their groups, for request extractors.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_current(
        &self,
        user_id: UserId,
    ) -> Result<Option<CurrentUser>, RepositoryError> {
        let Some(user) = self.get_by_id(user_id).await? else {
            return Ok(None);
        };
        let groups = self.groups_of(user_id).await?;
        Ok(Some(CurrentUser { user, groups }))
    }

    /// Enroll a user in a group by name. No-op if already a member or if
    /// the group does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn add_to_group(
        &self,
        user_id: UserId,
        group_name: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_groups (user_id, group_id) \
             SELECT $1, id FROM groups WHERE name = $2 \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(group_name)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Create a group if it does not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn ensure_group(&self, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
