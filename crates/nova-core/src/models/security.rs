//! Admin security settings.
//!
//! Secrets are persisted as Argon2id PHC hashes. Documents written before
//! hashing carry the plaintext `adminKey`/`securityPin`; those fields are
//! read, hashed on the next session start, and never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Slot;

/// Admin key installed on first start.
pub const DEFAULT_ADMIN_KEY: &str = "noVa_sa_2025";
/// Security PIN installed on first start.
pub const DEFAULT_SECURITY_PIN: &str = "123456";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    /// Argon2id hash of the admin key. Empty until provisioned.
    pub admin_key_hash: String,
    /// Argon2id hash of the security PIN. Empty until provisioned.
    pub security_pin_hash: String,
    pub is_mfa_enabled: bool,
    #[serde(with = "crate::models::timestamp")]
    pub last_rotation: DateTime<Utc>,
    /// Hash of the trimmed, lower-cased recovery answer. `None` disables
    /// recovery.
    pub recovery_answer_hash: Option<String>,
    /// Plaintext key from an unhashed document.
    #[serde(skip_serializing)]
    pub admin_key: Option<String>,
    /// Plaintext PIN from an unhashed document.
    #[serde(skip_serializing)]
    pub security_pin: Option<String>,
}

impl SecuritySettings {
    /// True once both secrets are hashed and no plaintext is pending.
    pub fn is_provisioned(&self) -> bool {
        !self.admin_key_hash.is_empty()
            && !self.security_pin_hash.is_empty()
            && self.admin_key.is_none()
            && self.security_pin.is_none()
    }

    /// Plaintext admin key to hash when provisioning: the unhashed
    /// legacy value, else the built-in default.
    pub fn pending_admin_key(&self) -> Option<&str> {
        match &self.admin_key {
            Some(key) => Some(key),
            None if self.admin_key_hash.is_empty() => Some(DEFAULT_ADMIN_KEY),
            None => None,
        }
    }

    pub fn pending_security_pin(&self) -> Option<&str> {
        match &self.security_pin {
            Some(pin) => Some(pin),
            None if self.security_pin_hash.is_empty() => Some(DEFAULT_SECURITY_PIN),
            None => None,
        }
    }

    pub fn has_recovery(&self) -> bool {
        self.recovery_answer_hash.is_some()
    }
}

impl Slot for SecuritySettings {
    const KEY: &'static str = "nova_security_settings";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_settings_need_default_secrets() {
        let settings = SecuritySettings::default();
        assert!(!settings.is_provisioned());
        assert_eq!(settings.pending_admin_key(), Some("noVa_sa_2025"));
        assert_eq!(settings.pending_security_pin(), Some("123456"));
        assert!(!settings.has_recovery());
    }

    #[test]
    fn unhashed_document_keeps_its_secrets_pending() {
        let json = r#"{
            "adminKey": "k",
            "isMfaEnabled": true,
            "securityPin": "0000",
            "lastRotation": 1735689600000
        }"#;
        let settings: SecuritySettings = serde_json::from_str(json).unwrap();

        assert!(settings.is_mfa_enabled);
        assert!(!settings.is_provisioned());
        assert_eq!(settings.pending_admin_key(), Some("k"));
        assert_eq!(settings.pending_security_pin(), Some("0000"));
        assert_eq!(settings.last_rotation.timestamp(), 1_735_689_600);
    }

    #[test]
    fn plaintext_is_never_written() {
        let settings = SecuritySettings {
            admin_key_hash: "$argon2id$stub".into(),
            security_pin_hash: "$argon2id$stub".into(),
            admin_key: Some("k".into()),
            security_pin: Some("0000".into()),
            ..SecuritySettings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("adminKey").is_none());
        assert!(json.get("securityPin").is_none());
        assert_eq!(json["adminKeyHash"], "$argon2id$stub");
    }
}
