//! # API Route Modules
//!
//! - `users`: guarded endpoints for the authenticated caller
//!   (`/current_identity`, `/users`).
//! - `tokens`: unguarded credential-to-token exchange (`/user_token`).

pub mod tokens;
pub mod users;
