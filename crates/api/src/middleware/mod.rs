// API Middleware
//
// Request processing shared across route groups. Learner routes are open;
// admin routes sit behind the bearer-token check in `auth`.

pub mod auth;

pub use auth::{admin_middleware, AdminUser, AuthState};
