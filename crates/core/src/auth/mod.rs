//! Password hashing for user credentials.

mod password;

pub use password::{PasswordError, hash_password, verify_password, verify_password_or_dummy};
