//! Database record structures matching table schemas.

pub mod admin_responses;
pub mod complaints;
pub mod feedback;
pub mod history;
pub mod users;
