use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::payment::{PaymentIntent, PaymentStatus};
use crate::domain::repositories::PaymentIntentRepository;

/// PostgreSQL implementation of PaymentIntentRepository
pub struct PostgresPaymentIntentRepository {
    pool: PgPool,
}

impl PostgresPaymentIntentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentIntentRow {
    id: Uuid,
    registration_id: Uuid,
    amount: Decimal,
    merchant_order_id: String,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl From<PaymentIntentRow> for PaymentIntent {
    fn from(row: PaymentIntentRow) -> Self {
        PaymentIntent::from_persistence(
            row.id,
            row.registration_id,
            row.amount,
            row.merchant_order_id,
            row.status,
            row.created_at,
            row.concluded_at,
        )
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, registration_id, amount, merchant_order_id,
           status, created_at, concluded_at
    FROM payment_intents
"#;

#[async_trait]
impl PaymentIntentRepository for PostgresPaymentIntentRepository {
    async fn save(&self, intent: &PaymentIntent) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO payment_intents (
                id, registration_id, amount, merchant_order_id,
                status, created_at, concluded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                concluded_at = EXCLUDED.concluded_at
            "#,
        )
        .bind(intent.id())
        .bind(intent.registration_id())
        .bind(intent.amount())
        .bind(intent.merchant_order_id())
        .bind(intent.status())
        .bind(intent.created_at())
        .bind(intent.concluded_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save payment intent: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentIntent>, String> {
        let row = sqlx::query_as::<_, PaymentIntentRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find payment intent by id: {}", e))?;

        Ok(row.map(PaymentIntent::from))
    }

    async fn find_by_merchant_order_id(
        &self,
        merchant_order_id: &str,
    ) -> Result<Option<PaymentIntent>, String> {
        let row = sqlx::query_as::<_, PaymentIntentRow>(&format!(
            "{} WHERE merchant_order_id = $1",
            SELECT_COLUMNS
        ))
        .bind(merchant_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find payment intent by merchant order: {}", e))?;

        Ok(row.map(PaymentIntent::from))
    }

    async fn find_outstanding_for_registration(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<PaymentIntent>, String> {
        let row = sqlx::query_as::<_, PaymentIntentRow>(&format!(
            "{} WHERE registration_id = $1 AND status IN ('created', 'pending')",
            SELECT_COLUMNS
        ))
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find outstanding payment intent: {}", e))?;

        Ok(row.map(PaymentIntent::from))
    }
}
