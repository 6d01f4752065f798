//! Infrastructure layer - storage backends, auth plumbing and services

pub mod auth;
pub mod logging;
pub mod membership;
pub mod storage;
pub mod team;
pub mod user;
