//! Audit recorder.

use chrono::{DateTime, Utc};
use nova_core::models::audit::{
    ANONYMOUS_ACTOR, AuditEventKind, AuditLogEntry, AuditTrail, CreateAuditLogEntry,
};
use tracing::{info, warn};

/// Prepend an entry to `trail`, attributed to `actor_email` (or the
/// anonymous actor when it is empty). `retention` caps the trail.
pub fn record<'a>(
    trail: &'a mut AuditTrail,
    kind: AuditEventKind,
    actor_email: &str,
    details: impl Into<String>,
    retention: Option<usize>,
    now: DateTime<Utc>,
) -> &'a AuditLogEntry {
    let user_name = if actor_email.is_empty() {
        ANONYMOUS_ACTOR.to_string()
    } else {
        actor_email.to_string()
    };
    let entry = AuditLogEntry::new(
        CreateAuditLogEntry {
            kind,
            user_name,
            details: details.into(),
        },
        now,
    );

    if kind.is_denial() {
        warn!(kind = %kind, actor = %entry.user_name, details = %entry.details, "Audit");
    } else {
        info!(kind = %kind, actor = %entry.user_name, details = %entry.details, "Audit");
    }

    trail.prepend(entry, retention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn most_recent_entry_is_first() {
        let mut trail = AuditTrail::default();
        let start = Utc::now();
        let kinds = [
            AuditEventKind::LoginSuccess,
            AuditEventKind::DeniedPassword,
            AuditEventKind::Success,
        ];
        for (i, kind) in kinds.into_iter().enumerate() {
            record(
                &mut trail,
                kind,
                "ada@gmail.com",
                format!("event {i}"),
                None,
                start + Duration::seconds(i as i64),
            );
        }

        assert_eq!(trail.len(), 3);
        let first = trail.latest().unwrap();
        assert_eq!(first.kind, AuditEventKind::Success);
        assert_eq!(first.details, "event 2");
        assert!(
            trail
                .entries()
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp)
        );
    }

    #[test]
    fn empty_actor_is_anonymous() {
        let mut trail = AuditTrail::default();
        let entry = record(
            &mut trail,
            AuditEventKind::LoginFailed,
            "",
            "bad email",
            None,
            Utc::now(),
        );
        assert_eq!(entry.user_name, ANONYMOUS_ACTOR);
    }

    #[test]
    fn retention_caps_the_trail() {
        let mut trail = AuditTrail::default();
        for _ in 0..5 {
            record(
                &mut trail,
                AuditEventKind::KeyRotation,
                "root@gmail.com",
                "Key rotated.",
                Some(2),
                Utc::now(),
            );
        }
        assert_eq!(trail.len(), 2);
    }
}
