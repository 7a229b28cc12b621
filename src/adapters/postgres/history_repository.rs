//! PostgreSQL implementation of HistoryRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ReadingId, Timestamp, UserId};
use crate::domain::reading::{NewReading, Reading};
use crate::ports::HistoryRepository;

/// PostgreSQL implementation of the HistoryRepository port.
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    user_id: i64,
    question: String,
    cards: String,
    answer: String,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for Reading {
    fn from(row: HistoryRow) -> Self {
        Reading {
            id: ReadingId::new(row.id),
            user_id: UserId::new(row.user_id),
            question: row.question,
            cards: Reading::split_cards(&row.cards),
            answer: row.answer,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepository {
    async fn append(&self, reading: NewReading) -> Result<Reading, DomainError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO history (user_id, question, cards, answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(reading.user_id.as_i64())
        .bind(reading.question.as_str())
        .bind(reading.cards_joined())
        .bind(&reading.answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to append history: {}", e)))?;

        Ok(Reading::from_new(
            ReadingId::new(id),
            reading,
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Reading>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, question, cards, answer, created_at
            FROM history
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list history: {}", e)))?;

        Ok(rows.into_iter().map(Reading::from).collect())
    }
}
