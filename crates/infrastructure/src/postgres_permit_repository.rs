//! PostgreSQL-backed permit repository.
//!
//! Workflow writes are single `UPDATE`/`DELETE` statements guarded by
//! `status = ANY($expected)`, so a concurrent change makes the write match
//! nothing instead of overwriting another actor's decision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use sika_application::{PermitListQuery, PermitRepository};
use sika_core::{AppError, AppResult};
use sika_domain::{
    Permit, PermitDetails, PermitId, PermitStatus, Transition, UserId, format_permit_number,
    legacy,
};

mod rows;
mod writes;

use rows::{PERMIT_COLUMNS, PermitRow, details_columns, stored_statuses};

/// PostgreSQL implementation of the permit repository port.
#[derive(Clone)]
pub struct PostgresPermitRepository {
    pool: PgPool,
}

impl PostgresPermitRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermitRepository for PostgresPermitRepository {
    async fn create_permit(
        &self,
        owner_id: UserId,
        details: PermitDetails,
        created_at: DateTime<Utc>,
    ) -> AppResult<Permit> {
        let sequence: i64 = sqlx::query_scalar("SELECT nextval('permit_number_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to reserve permit number: {error}"))
            })?;
        let permit_number = format_permit_number(created_at.date_naive(), sequence);
        let columns = details_columns(&details)?;

        let statement = format!(
            r#"
            INSERT INTO permits (
                permit_number,
                work_description,
                work_location,
                zone,
                work_type,
                risk_level,
                start_date,
                end_date,
                coordinates,
                performing_authority,
                company,
                area_authority,
                site_controller_name,
                safety_measures,
                related_documents,
                status,
                owner_id,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING {PERMIT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PermitRow>(&statement)
            .bind(permit_number.as_str())
            .bind(columns.work_description)
            .bind(columns.work_location)
            .bind(columns.zone)
            .bind(columns.work_type)
            .bind(columns.risk_level)
            .bind(columns.start_date)
            .bind(columns.end_date)
            .bind(columns.coordinates)
            .bind(columns.performing_authority)
            .bind(columns.company)
            .bind(columns.area_authority)
            .bind(columns.site_controller_name)
            .bind(columns.safety_measures)
            .bind(columns.related_documents)
            .bind(PermitStatus::Draft.as_str())
            .bind(owner_id.as_i64())
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create permit '{permit_number}' for user '{owner_id}': {error}"
                ))
            })?;

        row.try_into()
    }

    async fn find_permit(&self, permit_id: PermitId) -> AppResult<Option<Permit>> {
        let statement = format!("SELECT {PERMIT_COLUMNS} FROM permits WHERE id = $1");

        let row = sqlx::query_as::<_, PermitRow>(&statement)
            .bind(permit_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find permit '{permit_id}': {error}"))
            })?;

        row.map(Permit::try_from).transpose()
    }

    async fn list_permits(&self, query: PermitListQuery) -> AppResult<Vec<Permit>> {
        let statement = format!(
            r#"
            SELECT {PERMIT_COLUMNS}
            FROM permits
            WHERE ($1::BIGINT IS NULL OR owner_id = $1)
              AND (cardinality($2::TEXT[]) = 0 OR status = ANY($2))
              AND ($3::TEXT IS NULL OR zone = $3)
            ORDER BY created_at DESC, id DESC
            "#
        );

        let rows = sqlx::query_as::<_, PermitRow>(&statement)
            .bind(query.owner_id.map(|owner_id| owner_id.as_i64()))
            .bind(stored_statuses(&query.statuses))
            .bind(query.zone.map(|zone| zone.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list permits: {error}")))?;

        rows.into_iter().map(Permit::try_from).collect()
    }

    async fn update_details(
        &self,
        permit_id: PermitId,
        expected: &[PermitStatus],
        details: PermitDetails,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        self.update_details_impl(permit_id, expected, details, updated_at)
            .await
    }

    async fn apply_transition(
        &self,
        permit_id: PermitId,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        self.apply_transition_impl(permit_id, transition, at).await
    }

    async fn delete_permit(&self, permit_id: PermitId, expected: PermitStatus) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permits WHERE id = $1 AND status = ANY($2)")
            .bind(permit_id.as_i64())
            .bind(stored_statuses(&[expected]))
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permit '{permit_id}': {error}"))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests;
