use kubedeck_application::UserRepository;

use super::*;

const USER_COLUMNS: &str =
    "name, alias, email, password_hash, roles, disabled, created_at, last_login_at";

#[async_trait]
impl UserRepository for PostgresRbacRepository {
    async fn find_user(&self, name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(|error| AppError::Internal(format!("failed to find user '{name}': {error}")))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, user: User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (name, alias, email, password_hash, roles, disabled, created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&user.name)
        .bind(&user.alias)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .bind(user.disabled)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|error| insert_error(error, &format!("user '{}'", user.name)))
    }

    async fn save_user(&self, user: User) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET alias = $2, email = $3, password_hash = $4, roles = $5, disabled = $6,
                last_login_at = $7
            WHERE name = $1
            "#,
        )
        .bind(&user.name)
        .bind(&user.alias)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .bind(user.disabled)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save user '{}': {error}", user.name))
        })?;

        require_affected(result.rows_affected(), &format!("user '{}'", user.name))
    }

    async fn delete_user(&self, name: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete user '{name}': {error}"))
            })?;

        require_affected(result.rows_affected(), &format!("user '{name}'"))
    }
}
