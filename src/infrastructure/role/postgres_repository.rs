//! PostgreSQL role repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of RoleRepository
#[derive(Debug, Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query("SELECT id, name, permissions FROM roles WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get role: {}", e)))?;

        row.as_ref().map(row_to_role).transpose()
    }

    async fn save(&self, role: Role) -> Result<Role, DomainError> {
        let permissions: Vec<&str> = role.permissions().iter().map(String::as_str).collect();

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, permissions)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, permissions = EXCLUDED.permissions
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(&permissions)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save role: {}", e)))?;

        Ok(role)
    }
}

fn row_to_role(row: &PgRow) -> Result<Role, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode role row: {}", e));

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let permissions: Vec<String> = row.try_get("permissions").map_err(decode)?;

    Role::new(RoleId::from(id), name)
        .map(|role| role.with_permissions(permissions))
        .map_err(|e| DomainError::storage(format!("Invalid role row: {}", e)))
}
