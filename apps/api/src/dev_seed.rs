use chrono::{Duration, Utc};
use sika_application::{PermitFilter, RegisterUserParams};
use sika_core::{AppError, AppResult, UserIdentity};
use sika_domain::{
    PermitDraft, RelatedDocument, RelatedDocuments, RiskLevel, Role, SiteCoordinates, User,
    UserId, WorkType, Zone,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::api_services;
use crate::state::AppState;

const DEV_SEED_PASSWORD: &str = "sika-dev-password";

struct SeedUser {
    name: &'static str,
    email: &'static str,
    role: Role,
}

const DEV_SEED_USERS: [SeedUser; 4] = [
    SeedUser {
        name: "Permit Controller",
        email: "ptwc@sika.local",
        role: Role::PermitController,
    },
    SeedUser {
        name: "Area Authority",
        email: "aa@sika.local",
        role: Role::AreaAuthority,
    },
    SeedUser {
        name: "Site Controller",
        email: "sc@sika.local",
        role: Role::SiteController,
    },
    SeedUser {
        name: "Administrator",
        email: "admin@sika.local",
        role: Role::Admin,
    },
];

/// Loads demo users and a handful of permits in different stages.
///
/// Safe to run repeatedly: existing accounts are reused and permits are only
/// seeded when the permit controller owns none yet.
pub async fn run(pool: PgPool, config: &ApiConfig) -> AppResult<()> {
    let state = api_services::build_app_state(pool, config);

    let mut identities = Vec::with_capacity(DEV_SEED_USERS.len());
    for seed_user in &DEV_SEED_USERS {
        let user = ensure_seed_user(&state, seed_user).await?;
        identities.push(UserIdentity::new(
            user.id.as_i64(),
            user.name.as_str(),
            user.email.as_str(),
        ));
    }
    let [controller, area_authority, site_controller, _admin] = identities.as_slice() else {
        return Err(AppError::Internal("seed users were not created".to_owned()));
    };

    let owned = state
        .permit_service
        .list_permits(
            controller,
            PermitFilter {
                owner_id: Some(UserId::new(controller.user_id())),
                ..PermitFilter::default()
            },
        )
        .await?;
    if !owned.is_empty() {
        info!(permits = owned.len(), "seed permits already present");
        return Ok(());
    }

    let service = &state.permit_service;

    service
        .create_permit(
            controller,
            draft_permit(Zone::Bld, None, None, "Replace office HVAC filters"),
        )
        .await?;

    let pending = service
        .create_permit(
            controller,
            draft_permit(
                Zone::Utl,
                Some(WorkType::ColdWorkBreaking),
                Some("20;70"),
                "Open cooling water line for valve swap",
            ),
        )
        .await?;
    service.submit_permit(controller, pending.id).await?;

    let area_approved = service
        .create_permit(
            controller,
            draft_permit(
                Zone::Gms,
                Some(WorkType::HotWorkSpark),
                Some("62.5;35"),
                "Grind supports on metering skid",
            ),
        )
        .await?;
    service.submit_permit(controller, area_approved.id).await?;
    service
        .approve_permit(
            area_authority,
            area_approved.id,
            Role::AreaAuthority,
            Some("Gas test before every shift"),
        )
        .await?;

    let active = service
        .create_permit(
            controller,
            draft_permit(
                Zone::Prc,
                Some(WorkType::HotWorkFlame),
                Some("35.5;62"),
                "Weld repair on separator inlet nozzle",
            ),
        )
        .await?;
    service.submit_permit(controller, active.id).await?;
    service
        .approve_permit(area_authority, active.id, Role::AreaAuthority, None)
        .await?;
    service
        .approve_permit(site_controller, active.id, Role::SiteController, None)
        .await?;

    let rejected = service
        .create_permit(
            controller,
            draft_permit(
                Zone::Ccr,
                Some(WorkType::ColdWork),
                Some("80;20"),
                "Re-terminate control panel cabling",
            ),
        )
        .await?;
    service.submit_permit(controller, rejected.id).await?;
    service
        .reject_permit(
            area_authority,
            rejected.id,
            Role::AreaAuthority,
            "Isolation certificate missing",
        )
        .await?;

    info!(
        users = DEV_SEED_USERS.len(),
        permits = 5,
        "development seed data loaded"
    );
    Ok(())
}

async fn ensure_seed_user(state: &AppState, seed_user: &SeedUser) -> AppResult<User> {
    let registered = state
        .user_service
        .register_user(RegisterUserParams {
            name: seed_user.name.to_owned(),
            email: seed_user.email.to_owned(),
            password: DEV_SEED_PASSWORD.to_owned(),
            role: seed_user.role,
        })
        .await;

    match registered {
        Ok(user) => {
            info!(email = seed_user.email, role = %seed_user.role, "seed user created");
            Ok(user)
        }
        Err(AppError::Conflict(_)) => {
            state
                .user_service
                .login(seed_user.email, DEV_SEED_PASSWORD)
                .await
        }
        Err(error) => Err(error),
    }
}

fn draft_permit(
    zone: Zone,
    work_type: Option<WorkType>,
    coordinates: Option<&str>,
    work_description: &str,
) -> PermitDraft {
    let start_date = Utc::now() + Duration::days(1);
    let hot_work = matches!(
        work_type,
        Some(WorkType::HotWorkSpark | WorkType::HotWorkFlame)
    );

    PermitDraft {
        work_description: work_description.to_owned(),
        work_location: None,
        zone,
        work_type,
        risk_level: Some(if hot_work { RiskLevel::High } else { RiskLevel::Medium }),
        start_date,
        end_date: start_date + Duration::hours(10),
        coordinates: coordinates.and_then(|text| SiteCoordinates::parse(text).ok()),
        performing_authority: Some("Budi Santoso".to_owned()),
        company: Some("PT Mitra Teknik".to_owned()),
        area_authority: None,
        site_controller_name: None,
        safety_measures: hot_work.then(|| "Fire watch, gas test, spark screens".to_owned()),
        related_documents: RelatedDocuments {
            jsa: RelatedDocument {
                checked: true,
                number: "JSA-001".to_owned(),
            },
            ..RelatedDocuments::default()
        },
    }
}
