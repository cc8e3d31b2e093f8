pub mod health;
pub mod permissions;
pub mod projects;
pub mod roles;
pub mod users;
