//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id, configurable work factor)
//! - JWT token generation and validation
//! - Authentication coordination
//!
//! The library knows nothing about accounts or session storage. Services own
//! those concerns and adapt these primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(8, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Authenticator, Claims, PasswordHasher};
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     PasswordHasher::with_cost(8, 1, 1).unwrap(),
//! );
//!
//! let hash = auth.hash_password("password123").unwrap();
//! auth.verify_credentials("password123", Some(&hash)).unwrap();
//!
//! let claims = Claims::for_session("user123", "auth", 24);
//! let token = auth.generate_token(&claims).unwrap();
//! let decoded: Claims = auth.validate_token(&token).unwrap();
//! assert_eq!(decoded.access(), Some("auth"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
