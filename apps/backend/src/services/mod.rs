//! Backend services

pub mod scheduler;
pub mod sessions;
