use std::sync::Arc;

use sika_application::{PermitService, UserService};
use sika_infrastructure::{
    Argon2PasswordHasher, PostgresPermitRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let permit_repository = Arc::new(PostgresPermitRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    AppState {
        permit_service: PermitService::new(permit_repository, user_repository.clone()),
        user_service: UserService::new(user_repository, password_hasher),
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
    }
}
