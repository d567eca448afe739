//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::role::RoleId;
use crate::domain::user::{ProfileDetails, User, UserId, UserRepository};
use crate::domain::DomainError;

const EMAIL_CONSTRAINT: &str = "users_email_key";

const SELECT_USERS: &str = r#"
    SELECT u.id, u.first_name, u.last_name, u.email, u.password_hash,
           u.created_at, u.updated_at,
           p.address, p.birth_date, p.profile_image_url,
           COALESCE(array_remove(array_agg(ur.role_id), NULL), '{}') AS role_ids
    FROM users u
    LEFT JOIN user_profiles p ON p.user_id = u.id
    LEFT JOIN user_roles ur ON ur.user_id = u.id
"#;

const GROUP_USERS: &str = "GROUP BY u.id, p.user_id";

/// PostgreSQL implementation of UserRepository
///
/// A user spans `users`, `user_profiles` and `user_roles`; `save` writes all
/// three in one transaction.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("{} {} ORDER BY u.id", SELECT_USERS, GROUP_USERS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE u.id = $1 {}", SELECT_USERS, GROUP_USERS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE u.email = $1 {}", SELECT_USERS, GROUP_USERS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let failed = |e: sqlx::Error| DomainError::storage(format!("Failed to save user: {}", e));

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_email_violation(&e) {
                DomainError::email_already_exists(user.email())
            } else {
                failed(e)
            }
        })?;

        match user.profile() {
            Some(profile) => {
                sqlx::query(
                    r#"
                    INSERT INTO user_profiles (user_id, address, birth_date, profile_image_url)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (user_id) DO UPDATE
                    SET address = EXCLUDED.address,
                        birth_date = EXCLUDED.birth_date,
                        profile_image_url = EXCLUDED.profile_image_url
                    "#,
                )
                .bind(user.id().as_uuid())
                .bind(profile.address())
                .bind(profile.birth_date())
                .bind(profile.profile_image_url())
                .execute(&mut *tx)
                .await
                .map_err(failed)?;
            }
            None => {
                sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
                    .bind(user.id().as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(failed)?;
            }
        }

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        let role_ids: Vec<Uuid> = user.roles().iter().map(|r| *r.as_uuid()).collect();
        if !role_ids.is_empty() {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(user.id().as_uuid())
            .bind(&role_ids)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        }

        tx.commit().await.map_err(failed)?;

        Ok(user)
    }

    async fn delete(&self, user: &User) -> Result<(), DomainError> {
        if self.delete_by_id(user.id()).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("User '{}' not found", user.id())))
        }
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError> {
        // Profile and role links cascade
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn is_email_violation(error: &sqlx::Error) -> bool {
    is_email_constraint(error.as_database_error().and_then(|db| db.constraint()))
}

fn is_email_constraint(constraint: Option<&str>) -> bool {
    constraint == Some(EMAIL_CONSTRAINT)
}

/// Columns of one aggregated user row
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    address: Option<String>,
    birth_date: Option<NaiveDate>,
    profile_image_url: Option<String>,
    role_ids: Vec<Uuid>,
}

impl UserRow {
    fn decode(row: &PgRow) -> Result<Self, DomainError> {
        let decode =
            |e: sqlx::Error| DomainError::storage(format!("Failed to decode user row: {}", e));

        Ok(Self {
            id: row.try_get("id").map_err(decode)?,
            first_name: row.try_get("first_name").map_err(decode)?,
            last_name: row.try_get("last_name").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            password_hash: row.try_get("password_hash").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
            address: row.try_get("address").map_err(decode)?,
            birth_date: row.try_get("birth_date").map_err(decode)?,
            profile_image_url: row.try_get("profile_image_url").map_err(decode)?,
            role_ids: row.try_get("role_ids").map_err(decode)?,
        })
    }

    /// A profile is attached only when the LEFT JOIN matched, i.e. all of
    /// its columns are present
    fn into_user(self) -> User {
        let mut user = User::new(
            UserId::from(self.id),
            self.first_name,
            self.last_name,
            self.email,
            self.password_hash,
        );

        for role_id in self.role_ids {
            user.assign_role(RoleId::from(role_id));
        }

        if let (Some(address), Some(birth_date), Some(profile_image_url)) =
            (self.address, self.birth_date, self.profile_image_url)
        {
            user.upsert_profile(ProfileDetails {
                address,
                birth_date,
                profile_image_url,
            });
        }

        user.with_timestamps(self.created_at, self.updated_at)
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    UserRow::decode(row).map(UserRow::into_user)
}
