use sika_domain::TransitionEffect;

use super::*;

/// Approval metadata columns written by one transition. `None` keeps the
/// stored value.
#[derive(Default)]
struct TransitionColumns {
    aa_approved_by: Option<i64>,
    aa_approved_at: Option<DateTime<Utc>>,
    aa_comments: Option<String>,
    sc_approved_by: Option<i64>,
    sc_approved_at: Option<DateTime<Utc>>,
    sc_comments: Option<String>,
    rejected_by: Option<i64>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
}

impl From<&TransitionEffect> for TransitionColumns {
    fn from(effect: &TransitionEffect) -> Self {
        match effect {
            TransitionEffect::Submitted
            | TransitionEffect::Completed
            | TransitionEffect::Cancelled => Self::default(),
            TransitionEffect::AreaApproved(record) => Self {
                aa_approved_by: Some(record.by.as_i64()),
                aa_approved_at: Some(record.at),
                aa_comments: record.comment.clone(),
                ..Self::default()
            },
            TransitionEffect::SiteApproved(record) => Self {
                sc_approved_by: Some(record.by.as_i64()),
                sc_approved_at: Some(record.at),
                sc_comments: record.comment.clone(),
                ..Self::default()
            },
            TransitionEffect::Rejected(record) => Self {
                rejected_by: Some(record.by.as_i64()),
                rejected_at: Some(record.at),
                rejection_reason: Some(record.reason.clone()),
                ..Self::default()
            },
        }
    }
}

impl PostgresPermitRepository {
    pub(super) async fn update_details_impl(
        &self,
        permit_id: PermitId,
        expected: &[PermitStatus],
        details: PermitDetails,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        let columns = details_columns(&details)?;
        let statement = format!(
            r#"
            UPDATE permits
            SET
                work_description = $3,
                work_location = $4,
                zone = $5,
                work_type = $6,
                risk_level = $7,
                start_date = $8,
                end_date = $9,
                coordinates = $10,
                performing_authority = $11,
                company = $12,
                area_authority = $13,
                site_controller_name = $14,
                safety_measures = $15,
                related_documents = $16,
                updated_at = $17
            WHERE id = $1 AND status = ANY($2)
            RETURNING {PERMIT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PermitRow>(&statement)
            .bind(permit_id.as_i64())
            .bind(stored_statuses(expected))
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
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to update permit '{permit_id}': {error}"))
            })?;

        row.map(Permit::try_from).transpose()
    }

    pub(super) async fn apply_transition_impl(
        &self,
        permit_id: PermitId,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Permit>> {
        let columns = TransitionColumns::from(transition.effect());
        let statement = format!(
            r#"
            UPDATE permits
            SET
                status = $3,
                updated_at = $4,
                aa_approved_by = COALESCE($5::BIGINT, aa_approved_by),
                aa_approved_at = COALESCE($6::TIMESTAMPTZ, aa_approved_at),
                aa_comments = CASE WHEN $5::BIGINT IS NULL THEN aa_comments ELSE $7::TEXT END,
                sc_approved_by = COALESCE($8::BIGINT, sc_approved_by),
                sc_approved_at = COALESCE($9::TIMESTAMPTZ, sc_approved_at),
                sc_comments = CASE WHEN $8::BIGINT IS NULL THEN sc_comments ELSE $10::TEXT END,
                rejected_by = COALESCE($11::BIGINT, rejected_by),
                rejected_at = COALESCE($12::TIMESTAMPTZ, rejected_at),
                rejection_reason = COALESCE($13::TEXT, rejection_reason)
            WHERE id = $1 AND status = ANY($2)
            RETURNING {PERMIT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PermitRow>(&statement)
            .bind(permit_id.as_i64())
            .bind(stored_statuses(transition.expected()))
            .bind(transition.to().as_str())
            .bind(at)
            .bind(columns.aa_approved_by)
            .bind(columns.aa_approved_at)
            .bind(columns.aa_comments)
            .bind(columns.sc_approved_by)
            .bind(columns.sc_approved_at)
            .bind(columns.sc_comments)
            .bind(columns.rejected_by)
            .bind(columns.rejected_at)
            .bind(columns.rejection_reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to move permit '{permit_id}' to {}: {error}",
                    transition.to()
                ))
            })?;

        row.map(Permit::try_from).transpose()
    }
}
