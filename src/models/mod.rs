//! Models loaded from configuration and request state.

pub mod auth;
pub mod config;
