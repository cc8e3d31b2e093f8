//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_rbac_repository;
mod postgres_rbac_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_rbac_repository::PostgresRbacRepository;
