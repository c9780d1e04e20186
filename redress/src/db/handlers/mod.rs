//! Repository implementations for CRUD operations.

pub mod admin_responses;
pub mod complaints;
pub mod feedback;
pub mod history;
pub mod repository;
pub mod users;

pub use admin_responses::AdminResponses;
pub use complaints::Complaints;
pub use feedback::Feedback;
pub use history::ComplaintHistory;
pub use repository::Repository;
pub use users::Users;
