//! Application Layer
//!
//! Use cases orchestrating the domain layer.

pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod rotate;
pub mod token;

pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use rotate::RotateUseCase;
pub use token::{TokenClaims, TokenPair, TokenService};
