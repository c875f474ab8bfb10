//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_permit_repository;
mod in_memory_user_repository;
mod postgres_permit_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_permit_repository::InMemoryPermitRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_permit_repository::PostgresPermitRepository;
pub use postgres_user_repository::PostgresUserRepository;
