//! HTTP route handlers

pub mod subjects;
pub mod test_sessions;
