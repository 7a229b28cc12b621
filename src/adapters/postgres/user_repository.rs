//! PostgreSQL implementation of UserRepository.
//!
//! The entitlement check runs inside a transaction that locks the user row
//! with `SELECT ... FOR UPDATE`, so concurrent readings for the same user are
//! serialized by the database.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::ledger::{ConsumeResult, CreditAmount, LedgerState, Price};
use crate::domain::user::{Age, Gender, Profile, UserAccount};
use crate::ports::{UserRepository, UserStatistics};

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    username: String,
    first_name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    balance: i64,
    free_used: bool,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let age = row.age.map(parse_age).transpose()?;
        let gender = row.gender.as_deref().map(parse_gender).transpose()?;
        let ledger = LedgerState::new(row.balance, row.free_used).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid ledger row: {}", e))
        })?;

        Ok(UserAccount {
            id: UserId::new(row.user_id),
            handle: row.username,
            name: row.first_name,
            age,
            gender,
            ledger,
        })
    }
}

fn parse_age(value: i32) -> Result<Age, DomainError> {
    u32::try_from(value).map(Age::new).map_err(|_| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid age value: {}", value))
    })
}

fn parse_gender(s: &str) -> Result<Gender, DomainError> {
    match s {
        "M" => Ok(Gender::Male),
        "F" => Ok(Gender::Female),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid gender value: {}", s),
        )),
    }
}

fn age_to_column(age: Age) -> Result<i32, DomainError> {
    i32::try_from(age.years())
        .map_err(|_| DomainError::validation("age", format!("Age {} is out of range", age)))
}

fn not_found(id: UserId) -> DomainError {
    DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", id))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_or_create(&self, id: UserId, handle: &str) -> Result<UserAccount, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(id.as_i64())
        .bind(handle)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert user: {}", e)))?;

        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    async fn find(&self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, username, first_name, age, gender, balance, free_used
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn save_profile(&self, id: UserId, profile: &Profile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET first_name = $2, age = $3, gender = $4
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&profile.name)
        .bind(age_to_column(profile.age)?)
        .bind(profile.gender.code())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn credit(&self, id: UserId, amount: CreditAmount) -> Result<i64, DomainError> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users SET balance = balance + $2
            WHERE user_id = $1
            RETURNING balance
            "#,
        )
        .bind(id.as_i64())
        .bind(amount.units())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to credit balance: {}", e)))?;

        balance.ok_or_else(|| not_found(id))
    }

    async fn consume_entitlement(
        &self,
        id: UserId,
        price: Price,
    ) -> Result<ConsumeResult, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        let row: Option<(i64, bool)> = sqlx::query_as(
            r#"
            SELECT balance, free_used
            FROM users
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to lock user row: {}", e)))?;

        let (balance, free_used) = row.ok_or_else(|| not_found(id))?;
        let mut ledger = LedgerState::new(balance, free_used).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid ledger row: {}", e))
        })?;

        let result = ledger.consume(price);

        if result.is_granted() {
            sqlx::query(
                r#"
                UPDATE users SET balance = $2, free_used = $3
                WHERE user_id = $1
                "#,
            )
            .bind(id.as_i64())
            .bind(ledger.balance)
            .bind(ledger.free_used)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to debit user: {}", e)))?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(result)
    }

    async fn statistics(&self) -> Result<UserStatistics, DomainError> {
        let (user_count, total_balance): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*)::BIGINT, COALESCE(SUM(balance), 0)::BIGINT
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to compute statistics: {}", e)))?;

        Ok(UserStatistics {
            user_count,
            total_balance,
        })
    }
}
