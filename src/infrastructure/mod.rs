//! Infrastructure layer - Storage adapters and account services

pub mod logging;
pub mod observability;
pub mod role;
pub mod storage;
pub mod user;
