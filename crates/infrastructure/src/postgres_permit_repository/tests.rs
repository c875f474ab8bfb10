use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sika_application::{PermitListQuery, PermitRepository};
use sika_domain::{
    Actor, Permit, PermitDetails, PermitDraft, PermitId, PermitStatus, RelatedDocuments, Role,
    SiteCoordinates, UserId, WorkType, Zone, plan_approval, plan_cancel, plan_rejection,
    plan_submit,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresPermitRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres permit repository tests: {error}");
    }

    Some(pool)
}

async fn insert_user(pool: &PgPool, role: &str) -> UserId {
    let unique = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, 'not-a-real-hash', $3)
            RETURNING id
            "#,
    )
    .bind(format!("{role} user"))
    .bind(format!("{}-{unique}@sika.example", role.to_lowercase()))
    .bind(role)
    .fetch_one(pool)
    .await;

    assert!(inserted.is_ok(), "{inserted:?}");
    UserId::new(inserted.unwrap_or_else(|_| unreachable!()))
}

fn start() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .map(|value| value.and_utc())
        .unwrap_or_else(|| unreachable!())
}

fn details(zone: Zone) -> PermitDetails {
    let mut related_documents = RelatedDocuments::default();
    related_documents.jsa.checked = true;
    related_documents.jsa.number = "JSA-001".to_owned();

    let details = PermitDetails::new(PermitDraft {
        work_description: "Replace flange gasket".to_owned(),
        work_location: None,
        zone,
        work_type: Some(WorkType::HotWorkFlame),
        risk_level: None,
        start_date: start(),
        end_date: start() + Duration::days(1),
        coordinates: SiteCoordinates::new(42.5, 17.25).ok(),
        performing_authority: Some("Budi".to_owned()),
        company: Some("PT Contoh".to_owned()),
        area_authority: None,
        site_controller_name: None,
        safety_measures: Some("Gas test before start".to_owned()),
        related_documents,
    });
    assert!(details.is_ok());
    details.unwrap_or_else(|_| unreachable!())
}

async fn create(repository: &PostgresPermitRepository, owner: UserId, zone: Zone) -> Permit {
    let permit = repository
        .create_permit(owner, details(zone), Utc::now())
        .await;
    assert!(permit.is_ok(), "{permit:?}");
    permit.unwrap_or_else(|_| unreachable!())
}

async fn stored(repository: &PostgresPermitRepository, permit_id: PermitId) -> Option<Permit> {
    repository.find_permit(permit_id).await.ok().flatten()
}

#[tokio::test]
async fn create_assigns_number_and_round_trips_details() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = insert_user(&pool, "PTWC").await;

    let permit = create(&repository, owner, Zone::Prc).await;

    assert_eq!(permit.status, PermitStatus::Draft);
    assert!(permit.permit_number.starts_with("PERMIT-"));
    assert_eq!(permit.details.work_location(), "PRC");
    assert_eq!(
        permit.details.coordinates().map(|point| (point.x(), point.y())),
        Some((42.5, 17.25))
    );
    assert_eq!(permit.details.related_documents().jsa.number, "JSA-001");
    assert_eq!(stored(&repository, permit.id).await, Some(permit));
}

#[tokio::test]
async fn transitions_are_conditional_on_current_status() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = Actor::new(insert_user(&pool, "PTWC").await, Role::PermitController);
    let area = Actor::new(insert_user(&pool, "AA").await, Role::AreaAuthority);
    let permit = create(&repository, owner.id, Zone::Utl).await;

    let submit = plan_submit(&permit, &owner);
    assert!(submit.is_ok());
    let submit = submit.unwrap_or_else(|_| unreachable!());

    let first = repository.apply_transition(permit.id, &submit, Utc::now()).await;
    assert_eq!(
        first.ok().flatten().map(|permit| permit.status),
        Some(PermitStatus::PendingAaApproval)
    );

    let replayed = repository.apply_transition(permit.id, &submit, Utc::now()).await;
    assert!(matches!(replayed, Ok(None)));

    let pending = stored(&repository, permit.id).await;
    assert!(pending.is_some());
    let pending = pending.unwrap_or_else(|| unreachable!());
    let approve = plan_approval(&pending, &area, Role::AreaAuthority, Some(" ok "), Utc::now());
    assert!(approve.is_ok());
    let approve = approve.unwrap_or_else(|_| unreachable!());

    let approved = repository.apply_transition(permit.id, &approve, Utc::now()).await;
    let approved = approved.ok().flatten();
    assert_eq!(
        approved.as_ref().map(|permit| permit.status),
        Some(PermitStatus::AaApproved)
    );
    assert_eq!(
        approved
            .as_ref()
            .and_then(|permit| permit.aa_approval.as_ref())
            .map(|record| (record.by, record.comment.clone())),
        Some((area.id, Some("ok".to_owned())))
    );
    assert_eq!(approved.and_then(|permit| permit.sc_approval), None);
}

#[tokio::test]
async fn cancelling_keeps_recorded_approvals() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = Actor::new(insert_user(&pool, "PTWC").await, Role::PermitController);
    let area = Actor::new(insert_user(&pool, "AA").await, Role::AreaAuthority);
    let permit = create(&repository, owner.id, Zone::Gms).await;

    let submit = plan_submit(&permit, &owner).unwrap_or_else(|_| unreachable!());
    let pending = repository
        .apply_transition(permit.id, &submit, Utc::now())
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());
    let approve = plan_approval(&pending, &area, Role::AreaAuthority, None, Utc::now())
        .unwrap_or_else(|_| unreachable!());
    let approved = repository
        .apply_transition(permit.id, &approve, Utc::now())
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());

    let cancel = plan_cancel(&approved, &owner).unwrap_or_else(|_| unreachable!());
    let cancelled = repository
        .apply_transition(permit.id, &cancel, Utc::now())
        .await
        .ok()
        .flatten();
    assert_eq!(
        cancelled.as_ref().map(|permit| permit.status),
        Some(PermitStatus::Cancelled)
    );
    assert_eq!(
        cancelled
            .and_then(|permit| permit.aa_approval)
            .map(|record| record.by),
        Some(area.id)
    );

    let replayed = repository.apply_transition(permit.id, &cancel, Utc::now()).await;
    assert!(matches!(replayed, Ok(None)));
}

#[tokio::test]
async fn concurrent_approvals_have_a_single_winner() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = Arc::new(PostgresPermitRepository::new(pool.clone()));
    let owner = Actor::new(insert_user(&pool, "PTWC").await, Role::PermitController);
    let area = Actor::new(insert_user(&pool, "AA").await, Role::AreaAuthority);
    let permit = create(&repository, owner.id, Zone::Bld).await;
    let submit = plan_submit(&permit, &owner).unwrap_or_else(|_| unreachable!());
    assert!(
        repository
            .apply_transition(permit.id, &submit, Utc::now())
            .await
            .is_ok()
    );
    let pending = stored(&repository, permit.id)
        .await
        .unwrap_or_else(|| unreachable!());

    let approve = plan_approval(&pending, &area, Role::AreaAuthority, None, Utc::now())
        .unwrap_or_else(|_| unreachable!());
    let reject = plan_rejection(&pending, &area, Role::AreaAuthority, "gas test missing", Utc::now())
        .unwrap_or_else(|_| unreachable!());

    let (approved, rejected) = tokio::join!(
        repository.apply_transition(permit.id, &approve, Utc::now()),
        repository.apply_transition(permit.id, &reject, Utc::now()),
    );
    let approved = approved.ok().flatten();
    let rejected = rejected.ok().flatten();

    assert_eq!(
        usize::from(approved.is_some()) + usize::from(rejected.is_some()),
        1
    );

    let current = stored(&repository, permit.id)
        .await
        .unwrap_or_else(|| unreachable!());
    if approved.is_some() {
        assert_eq!(current.status, PermitStatus::AaApproved);
        assert!(current.rejection.is_none());
    } else {
        assert_eq!(current.status, PermitStatus::RejectedByAa);
        assert!(current.aa_approval.is_none());
    }
}

#[tokio::test]
async fn legacy_rows_read_as_canonical_values() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = Actor::new(insert_user(&pool, "PTWC").await, Role::PermitController);
    let permit = create(&repository, owner.id, Zone::Gms).await;

    let rewrite = sqlx::query(
        r#"
            UPDATE permits
            SET status = 'SUBMITTED',
                coordinates = '{"x": 10, "y": 20}',
                related_documents = '{"l2ra": true, "confineSpace": {"checked": true, "number": 7}}'
            WHERE id = $1
            "#,
    )
    .bind(permit.id.as_i64())
    .execute(&pool)
    .await;
    assert!(rewrite.is_ok());

    let legacy = stored(&repository, permit.id).await;
    assert!(legacy.is_some());
    let legacy = legacy.unwrap_or_else(|| unreachable!());
    assert_eq!(legacy.status, PermitStatus::PendingAaApproval);
    assert_eq!(
        legacy.details.coordinates().map(|point| (point.x(), point.y())),
        Some((10.0, 20.0))
    );
    assert!(legacy.details.related_documents().ra.checked);
    assert_eq!(legacy.details.related_documents().csep.number, "7");

    let pending_aa = repository
        .list_permits(PermitListQuery {
            owner_id: Some(owner.id),
            statuses: vec![PermitStatus::PendingAaApproval],
            zone: None,
        })
        .await;
    assert_eq!(pending_aa.map(|permits| permits.len()).ok(), Some(1));

    let area = Actor::new(insert_user(&pool, "AA").await, Role::AreaAuthority);
    let approve = plan_approval(&legacy, &area, Role::AreaAuthority, None, Utc::now())
        .unwrap_or_else(|_| unreachable!());
    let approved = repository.apply_transition(permit.id, &approve, Utc::now()).await;
    assert_eq!(
        approved.ok().flatten().map(|permit| permit.status),
        Some(PermitStatus::AaApproved)
    );
}

#[tokio::test]
async fn list_filters_by_owner_status_and_zone() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = insert_user(&pool, "PTWC").await;
    let other = insert_user(&pool, "PTWC").await;

    let older = create(&repository, owner, Zone::Ccr).await;
    let newer = create(&repository, owner, Zone::Oy).await;
    create(&repository, other, Zone::Ccr).await;

    let mine = repository
        .list_permits(PermitListQuery {
            owner_id: Some(owner),
            ..PermitListQuery::default()
        })
        .await;
    assert_eq!(
        mine.map(|permits| permits.iter().map(|permit| permit.id).collect::<Vec<_>>())
            .ok(),
        Some(vec![newer.id, older.id])
    );

    let mine_in_ccr = repository
        .list_permits(PermitListQuery {
            owner_id: Some(owner),
            statuses: vec![PermitStatus::Draft],
            zone: Some(Zone::Ccr),
        })
        .await;
    assert_eq!(
        mine_in_ccr
            .map(|permits| permits.iter().map(|permit| permit.id).collect::<Vec<_>>())
            .ok(),
        Some(vec![older.id])
    );

    let mine_active = repository
        .list_permits(PermitListQuery {
            owner_id: Some(owner),
            statuses: vec![PermitStatus::Active],
            zone: None,
        })
        .await;
    assert_eq!(mine_active.map(|permits| permits.is_empty()).ok(), Some(true));
}

#[tokio::test]
async fn edits_and_deletes_respect_expected_status() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPermitRepository::new(pool.clone());
    let owner = Actor::new(insert_user(&pool, "PTWC").await, Role::PermitController);
    let permit = create(&repository, owner.id, Zone::Nbl).await;

    let edited = repository
        .update_details(permit.id, &[PermitStatus::Draft], details(Zone::Ws), Utc::now())
        .await;
    assert_eq!(
        edited.ok().flatten().map(|permit| permit.details.zone()),
        Some(Zone::Ws)
    );

    let submit = plan_submit(&permit, &owner).unwrap_or_else(|_| unreachable!());
    assert!(
        repository
            .apply_transition(permit.id, &submit, Utc::now())
            .await
            .is_ok()
    );

    let late_edit = repository
        .update_details(permit.id, &[PermitStatus::Draft], details(Zone::Prc), Utc::now())
        .await;
    assert!(matches!(late_edit, Ok(None)));

    let wrong_status_delete = repository
        .delete_permit(permit.id, PermitStatus::Draft)
        .await;
    assert!(matches!(wrong_status_delete, Ok(false)));

    let deleted = repository
        .delete_permit(permit.id, PermitStatus::PendingAaApproval)
        .await;
    assert!(matches!(deleted, Ok(true)));
    assert_eq!(stored(&repository, permit.id).await, None);
}
