//! Authentication and authorization.
//!
//! Two ways of presenting a session:
//!
//! - **Session cookie**: browsers log in via `/api/v1/auth/login` and receive
//!   the JWT in a secure, HTTP-only cookie.
//! - **Bearer token**: programmatic clients send the same JWT in an
//!   `Authorization: Bearer <token>` header.
//!
//! Both carry the same claims and are verified against the configured
//! `secret_key`. Authorization is role-based: handlers call
//! [`current_user::require_admin`] where an operation is staff-only, and
//! otherwise scope queries to the authenticated user's own rows.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated user in handlers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification

pub mod current_user;
pub mod password;
pub mod session;
