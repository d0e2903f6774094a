//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management

pub mod cookie;
pub mod password;
