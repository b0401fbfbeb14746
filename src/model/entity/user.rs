use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::web::AuthenticatedUser;
use crate::web::UserRole;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: Uuid,
    username: String,
    email: String,
    #[serde(skip)]
    password_hash: String,
    full_name: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserEntityCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Option<String>,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::User
    }
}

impl UserEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn hash(&self) -> &str {
        &self.password_hash
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }
}

#[async_trait]
impl CrudRepository<UserEntity, UserEntityCreate, Uuid> for UserEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreate,
    ) -> DatabaseResult<Self> {
        let role = data.role.unwrap_or_else(|| UserRole::User.to_string());
        let result = sqlx::query("INSERT INTO users (id, username, email, password_hash, full_name, role) VALUES ($1,$2,$3,$4,$5,$6) RETURNING id, created_at")
            .bind(Uuid::new_v4())
            .bind(&data.username)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.full_name)
            .bind(&role)
            .fetch_one(mm.executor())
            .await
            .map_err(crate::model::DatabaseError::from_sqlx)?;

        let id = result.try_get("id")?;
        let created_at = result.try_get("created_at")?;
        Ok(UserEntity {
            id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            role,
            is_active: true,
            created_at,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE users SET username = $1, full_name = $2 WHERE id = $3")
            .bind(&data.username)
            .bind(&data.full_name)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.username = data.username;
        self.full_name = data.full_name;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM users ORDER BY created_at LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserEntity, UserEntityCreate, Uuid);

#[async_trait]
impl HasOwner for UserEntity {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.id) // owners of users are themselves
    }
}

impl UserEntity {
    pub async fn find_by_username(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }

    pub async fn find_by_email(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        email: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }

    /// First-run bootstrap: a fresh install needs at least one account able
    /// to reach the admin surface.
    pub async fn ensure_bootstrap_admin(mm: &ModelManager) -> crate::error::AppResult<()> {
        let actor = AuthenticatedUser::admin();
        if Self::find_by_username(mm, &actor, "admin").await?.is_some() {
            return Ok(());
        }

        let hash = crate::auth::hash_password("admin")?;
        Self::create(
            mm,
            &actor,
            UserEntityCreate {
                username: String::from("admin"),
                email: String::from("admin@localhost"),
                password_hash: hash,
                full_name: String::from("Administrator"),
                role: Some(UserRole::SuperAdmin.to_string()),
            },
        )
        .await?;

        tracing::warn!("created default admin account, change its password");
        Ok(())
    }
}
