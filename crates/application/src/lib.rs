//! Application services and ports.

#![forbid(unsafe_code)]

mod permit_ports;
mod permit_service;
mod user_service;

pub use permit_ports::{PermitListQuery, PermitRepository};
pub use permit_service::{PermitFilter, PermitService};
pub use user_service::{
    NewUserRecord, PasswordHasher, RegisterUserParams, UserCredentials, UserRepository,
    UserService,
};
