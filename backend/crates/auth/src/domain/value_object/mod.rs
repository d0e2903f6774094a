//! Value Objects
//!
//! Validated domain primitives. Construction is the validation boundary;
//! a held value is always well-formed.

pub mod display_name;
pub mod email;
pub mod token_family;
pub mod user_password;
pub mod user_role;

pub use display_name::DisplayName;
pub use email::Email;
pub use token_family::TokenFamily;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
