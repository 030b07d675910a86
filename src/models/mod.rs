pub mod config;
pub mod user;

pub use config::{AppConfig, AuthLogConfig, ServerConfig, UserAccount};
pub use user::{AuthResponse, Claims, LoginRequest, User, UserInfo, UserRole};
