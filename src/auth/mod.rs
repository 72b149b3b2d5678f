// src/auth/mod.rs

pub mod guard;
pub mod middleware;
pub mod session;
pub mod token;

pub use guard::{check_access, Access, AuthError};
pub use middleware::RoleGuard;
pub use session::Session;
pub use token::{Claims, Role, TokenKeys};
