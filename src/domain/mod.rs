//! Domain entities and value objects shared by flows, services and routes.

pub mod address;
pub mod auth;
pub mod ticket;
pub mod types;
