//! Infrastructure layer - Storage and service implementations

pub mod logging;
pub mod storage;
pub mod user;
