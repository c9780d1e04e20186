//! Request/response data structures for API communication.
//!
//! These models define the wire shape of every endpoint: which fields a
//! client may set, which are server-assigned, and which are derived at
//! serialization time. Each entity enumerates its fields explicitly; there is
//! no wildcard exposure of entity attributes.

pub mod admin_responses;
pub mod auth;
pub mod complaints;
pub mod feedback;
pub mod history;
pub mod pagination;
pub mod users;
