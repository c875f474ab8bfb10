use sika_application::{PermitService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permit_service: PermitService,
    pub user_service: UserService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
