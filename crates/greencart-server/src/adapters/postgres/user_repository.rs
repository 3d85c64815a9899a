//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use greencart::{DomainError, SellerProfile, User, UserRepository};

use super::{db_error, parse_column};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    city: String,
    profile_image: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_column("role", &row.role)?,
            city: row.city,
            profile_image: row.profile_image,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SellerProfileRow {
    user_id: Uuid,
    business_name: String,
    business_description: String,
    business_address: String,
    phone_number: String,
    tax_id: String,
    bank_account_number: String,
    bank_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<SellerProfileRow> for SellerProfile {
    fn from(row: SellerProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            business_name: row.business_name,
            business_description: row.business_description,
            business_address: row.business_address,
            phone_number: row.phone_number,
            tax_id: row.tax_id,
            bank_account_number: row.bank_account_number,
            bank_name: row.bank_name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, city, profile_image,
                               is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username, email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash, role = EXCLUDED.role,
                city = EXCLUDED.city, profile_image = EXCLUDED.profile_image,
                is_active = EXCLUDED.is_active, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.city)
        .bind(&user.profile_image)
        .bind(user.is_active)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        User::try_from(row)
    }

    async fn save_seller_profile(
        &self,
        profile: &SellerProfile,
    ) -> Result<SellerProfile, DomainError> {
        let row = sqlx::query_as::<_, SellerProfileRow>(
            r#"
            INSERT INTO seller_profiles (user_id, business_name, business_description,
                                         business_address, phone_number, tax_id,
                                         bank_account_number, bank_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE
            SET business_name = EXCLUDED.business_name,
                business_description = EXCLUDED.business_description,
                business_address = EXCLUDED.business_address,
                phone_number = EXCLUDED.phone_number,
                tax_id = EXCLUDED.tax_id,
                bank_account_number = EXCLUDED.bank_account_number,
                bank_name = EXCLUDED.bank_name
            RETURNING *
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.business_name)
        .bind(&profile.business_description)
        .bind(&profile.business_address)
        .bind(&profile.phone_number)
        .bind(&profile.tax_id)
        .bind(&profile.bank_account_number)
        .bind(&profile.bank_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }
}
