use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

const ACCESS_CLAIM: &str = "access";

/// Generic JWT claims structure.
///
/// Supports standard RFC 7519 claims plus custom fields via `extra` map.
/// All standard fields are optional for maximum flexibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a session token with automatic expiration.
    ///
    /// Every call draws a fresh `jti`, so two tokens minted for the same
    /// subject within the same second still differ.
    ///
    /// # Arguments
    /// * `subject` - Unique principal identifier
    /// * `access` - Access scope label (stored in `extra.access`)
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with sub, exp, iat, jti and access set
    pub fn for_session(subject: impl ToString, access: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(expiration_hours);

        Self::new()
            .with_subject(subject)
            .with_issued_at(now.timestamp())
            .with_expiration(expiration.timestamp())
            .with_jwt_id(Uuid::new_v4().to_string())
            .with_extra(ACCESS_CLAIM, access)
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set JWT ID.
    pub fn with_jwt_id(mut self, jti: String) -> Self {
        self.jti = Some(jti);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get the access scope from extra fields.
    pub fn access(&self) -> Option<&str> {
        self.extra.get(ACCESS_CLAIM).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("user123");
        assert_eq!(claims.sub, Some("user123".to_string()));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_for_session() {
        let claims = Claims::for_session("user123", "auth", 24);

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.access(), Some("auth"));
        assert!(claims.jti.is_some());

        let exp = claims.exp.unwrap();
        let iat = claims.iat.unwrap();
        assert_eq!(exp - iat, 24 * 60 * 60);
    }

    #[test]
    fn test_for_session_ids_are_unique() {
        let first = Claims::for_session("user123", "auth", 1);
        let second = Claims::for_session("user123", "auth", 1);

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_expiration(1234567890)
            .with_issued_at(1234567800)
            .with_extra("access", "auth");

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iat, Some(1234567800));
        assert_eq!(claims.access(), Some("auth"));
    }

    #[test]
    fn test_access_missing() {
        let claims = Claims::new().with_extra("access", 42);
        assert_eq!(claims.access(), None);
    }
}
