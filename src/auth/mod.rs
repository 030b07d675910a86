pub mod jwt;
pub mod password;

pub use jwt::{claims_for, create_token, validate_token};
pub use password::{hash_password, verify_password};
