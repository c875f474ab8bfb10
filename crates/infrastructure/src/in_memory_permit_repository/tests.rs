use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sika_application::{
    PermitFilter, PermitListQuery, PermitRepository, PermitService, RegisterUserParams,
    UserService,
};
use sika_core::{AppError, UserIdentity};
use sika_domain::{
    DashboardStats, PermitDetails, PermitDraft, PermitStatus, RelatedDocuments, Role,
    SiteCoordinates, SitePhase, User, UserId, WorkType, Zone,
};

use super::InMemoryPermitRepository;
use crate::{Argon2PasswordHasher, InMemoryUserRepository};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|value| value.and_utc())
        .unwrap_or_else(|| unreachable!())
}

fn hot_work_draft() -> PermitDraft {
    PermitDraft {
        work_description: "Weld replacement spool on cooling line".to_owned(),
        work_location: None,
        zone: Zone::Prc,
        work_type: Some(WorkType::HotWorkFlame),
        risk_level: None,
        start_date: at(10, 0),
        end_date: at(11, 0),
        coordinates: SiteCoordinates::parse("35.5;62").ok(),
        performing_authority: Some("Budi".to_owned()),
        company: Some("PT Contoh".to_owned()),
        area_authority: Some("Siti".to_owned()),
        site_controller_name: Some("Dewi".to_owned()),
        safety_measures: Some("Fire watch and extinguisher".to_owned()),
        related_documents: RelatedDocuments::default(),
    }
}

fn details() -> PermitDetails {
    PermitDetails::new(hot_work_draft()).unwrap_or_else(|_| unreachable!())
}

struct Site {
    users: UserService,
    permits: PermitService,
}

fn site() -> Site {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let permit_repository = Arc::new(InMemoryPermitRepository::new());

    Site {
        users: UserService::new(user_repository.clone(), Arc::new(Argon2PasswordHasher::new())),
        permits: PermitService::new(permit_repository, user_repository),
    }
}

async fn register(site: &Site, email: &str, role: Role) -> User {
    let registered = site
        .users
        .register_user(RegisterUserParams {
            name: format!("{role} user"),
            email: email.to_owned(),
            password: "correct-horse".to_owned(),
            role,
        })
        .await;
    assert!(registered.is_ok(), "{registered:?}");
    registered.unwrap_or_else(|_| unreachable!())
}

async fn login(site: &Site, email: &str) -> UserIdentity {
    let user = site.users.login(email, "correct-horse").await;
    assert!(user.is_ok(), "{user:?}");
    let user = user.unwrap_or_else(|_| unreachable!());
    UserIdentity::new(user.id.as_i64(), user.name.as_str(), user.email.as_str())
}

#[tokio::test]
async fn list_orders_newest_first_and_filters() {
    let repository = InMemoryPermitRepository::new();
    let owner = UserId::new(1);

    let older = repository.create_permit(owner, details(), at(10, 8)).await;
    let newer = repository.create_permit(owner, details(), at(10, 9)).await;
    let other = repository
        .create_permit(UserId::new(2), details(), at(10, 10))
        .await;
    assert!(older.is_ok() && newer.is_ok() && other.is_ok());
    let older = older.unwrap_or_else(|_| unreachable!());
    let newer = newer.unwrap_or_else(|_| unreachable!());

    assert_eq!(older.permit_number, "PERMIT-20250110-0001");

    let listed = repository
        .list_permits(PermitListQuery {
            owner_id: Some(owner),
            ..PermitListQuery::default()
        })
        .await;
    assert_eq!(
        listed
            .map(|permits| permits.iter().map(|permit| permit.id).collect::<Vec<_>>())
            .ok(),
        Some(vec![newer.id, older.id])
    );

    let active = repository
        .list_permits(PermitListQuery {
            statuses: vec![PermitStatus::Active],
            ..PermitListQuery::default()
        })
        .await;
    assert_eq!(active.map(|permits| permits.len()).ok(), Some(0));
}

#[tokio::test]
async fn guarded_writes_miss_when_status_moved_on() {
    let repository = InMemoryPermitRepository::new();
    let permit = repository
        .create_permit(UserId::new(1), details(), at(10, 8))
        .await
        .unwrap_or_else(|_| unreachable!());

    let edit = repository
        .update_details(permit.id, &[PermitStatus::PendingAaApproval], details(), at(10, 9))
        .await;
    assert!(matches!(edit, Ok(None)));

    let delete = repository
        .delete_permit(permit.id, PermitStatus::Active)
        .await;
    assert!(matches!(delete, Ok(false)));

    let delete = repository.delete_permit(permit.id, PermitStatus::Draft).await;
    assert!(matches!(delete, Ok(true)));
    assert!(matches!(repository.find_permit(permit.id).await, Ok(None)));
}

#[tokio::test]
async fn hot_work_permit_goes_live_after_both_approvals() {
    let site = site();
    register(&site, "ptwc@sika.example", Role::PermitController).await;
    let area = register(&site, "aa@sika.example", Role::AreaAuthority).await;
    let controller = register(&site, "sc@sika.example", Role::SiteController).await;

    let ptwc = login(&site, "ptwc@sika.example").await;
    let aa = login(&site, "aa@sika.example").await;
    let sc = login(&site, "sc@sika.example").await;

    let today = Utc::now() - Duration::hours(1);
    let permit = site
        .permits
        .create_permit(
            &ptwc,
            PermitDraft {
                start_date: today,
                end_date: today + Duration::days(1),
                ..hot_work_draft()
            },
        )
        .await;
    assert!(permit.is_ok(), "{permit:?}");
    let permit = permit.unwrap_or_else(|_| unreachable!());
    assert_eq!(permit.status, PermitStatus::Draft);

    assert!(site.permits.submit_permit(&ptwc, permit.id).await.is_ok());

    let early = site
        .permits
        .approve_permit(&sc, permit.id, Role::SiteController, None)
        .await;
    assert!(matches!(early, Err(AppError::Conflict(_))));

    let queue = site.permits.dashboard(&aa, Role::AreaAuthority).await;
    assert!(matches!(
        queue.map(|dashboard| dashboard.stats).ok(),
        Some(DashboardStats::ApprovalQueue { pending_approval: 1, .. })
    ));

    assert!(
        site.permits
            .approve_permit(&aa, permit.id, Role::AreaAuthority, Some("area isolated"))
            .await
            .is_ok()
    );
    let live = site
        .permits
        .approve_permit(&sc, permit.id, Role::SiteController, None)
        .await;
    assert!(live.is_ok(), "{live:?}");
    let live = live.unwrap_or_else(|_| unreachable!());

    assert_eq!(live.status, PermitStatus::Active);
    assert_eq!(live.aa_approval.map(|record| record.by), Some(area.id));
    assert_eq!(live.sc_approval.map(|record| record.by), Some(controller.id));

    let map = site.permits.site_map(&ptwc, Some(Zone::Prc)).await;
    assert!(map.is_ok());
    let map = map.unwrap_or_else(|_| unreachable!());
    assert_eq!(map.pins.len(), 1);
    assert_eq!(map.pins.first().map(|pin| (pin.x, pin.y)), Some((35.5, 62.0)));
    assert_eq!(map.pins.first().map(|pin| pin.phase), Some(SitePhase::Running));

    let delete = site.permits.delete_permit(&ptwc, permit.id).await;
    assert!(matches!(delete, Err(AppError::Conflict(_))));

    let mine = site
        .permits
        .list_permits(
            &ptwc,
            PermitFilter {
                status: Some(PermitStatus::Active),
                ..PermitFilter::default()
            },
        )
        .await;
    assert_eq!(mine.map(|permits| permits.len()).ok(), Some(1));

    let closed = site.permits.complete_permit(&ptwc, permit.id).await;
    assert_eq!(
        closed.map(|permit| permit.status).ok(),
        Some(PermitStatus::Completed)
    );
    assert!(site.permits.delete_permit(&ptwc, permit.id).await.is_ok());
}
