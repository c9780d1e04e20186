//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login, profile, and avatar upload
//! - [`complaints`]: Complaint lifecycle, history, and admin responses
//! - [`feedback`]: General feedback submission and listing
//!
//! Handlers return [`crate::errors::Error`], which converts to the
//! appropriate HTTP status code and JSON error body.

pub mod auth;
pub mod complaints;
pub mod feedback;
