use crate::audit::AuditLog;
use crate::message::{Message, SenderAddress};
use std::sync::Arc;

/// What the DKIM capability reports for one verification run. `identity` is
/// the signature's `i=` tag and `domain` its `d=` tag; when both are present
/// the identity is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DkimVerification {
    pub valid: bool,
    pub identity: Option<String>,
    pub domain: Option<String>,
}

/// Failures out of the DKIM capability. The distinction only matters for the
/// audit trail; both variants resolve to "not authentic".
#[derive(Debug, Clone, thiserror::Error)]
pub enum DkimError {
    /// The library rejected the signature itself (malformed tag list, key
    /// fetch failure, body hash mismatch, ...).
    #[error("DKIM verification failed: {0}")]
    Verification(String),
    /// Anything else that went wrong while verifying.
    #[error("{0}")]
    Other(String),
}

/// External DKIM verification capability. Implementations receive the
/// message's serialized form and must be reentrant; the gate may be called
/// from multiple worker threads at once.
pub trait DkimVerify: Send + Sync {
    fn verify(&self, message: &[u8]) -> Result<DkimVerification, DkimError>;
}

/// Wraps the DKIM capability and applies the sender comparison policy.
pub struct DkimAdapter {
    verifier: Box<dyn DkimVerify>,
    audit: Arc<dyn AuditLog>,
}

impl DkimAdapter {
    pub fn new(verifier: Box<dyn DkimVerify>, audit: Arc<dyn AuditLog>) -> Self {
        DkimAdapter { verifier, audit }
    }

    /// True iff the message carries a valid signature whose `i=` identity
    /// equals the sender address, or failing that, whose `d=` domain equals
    /// the sender's domain. Comparisons are ASCII case-insensitive. Any
    /// verifier error is logged and treated as no valid signature.
    pub fn sender_matches(&self, sender: &SenderAddress, message: &dyn Message) -> bool {
        let verification = match self.verifier.verify(message.canonical_bytes()) {
            Ok(verification) => verification,
            Err(err @ DkimError::Verification(_)) => {
                self.audit.log(
                    "error",
                    &format!("DKIM exception when verifying bounce recipient: {err}"),
                );
                return false;
            }
            Err(err) => {
                self.audit.log(
                    "error",
                    &format!("Exception when verifying bounce recipient: {err}"),
                );
                return false;
            }
        };

        if !verification.valid {
            return false;
        }

        if let Some(identity) = verification.identity.as_deref() {
            return identity.eq_ignore_ascii_case(sender.as_str());
        }

        if let Some(signing_domain) = verification.domain.as_deref() {
            // A sender without an @ has no domain and can never match.
            return match sender.domain() {
                Some(sender_domain) => signing_domain.eq_ignore_ascii_case(sender_domain),
                None => false,
            };
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::testing::RecordingLog;
    use crate::message::ParsedMessage;

    struct StaticVerifier(Result<DkimVerification, DkimError>);

    impl DkimVerify for StaticVerifier {
        fn verify(&self, _message: &[u8]) -> Result<DkimVerification, DkimError> {
            self.0.clone()
        }
    }

    fn adapter(result: Result<DkimVerification, DkimError>) -> (DkimAdapter, Arc<RecordingLog>) {
        let audit = Arc::new(RecordingLog::default());
        let adapter = DkimAdapter::new(Box::new(StaticVerifier(result)), audit.clone());
        (adapter, audit)
    }

    fn message() -> ParsedMessage {
        ParsedMessage::parse("Subject: delivery failure\r\n\r\n")
    }

    #[test]
    fn identity_match_is_case_insensitive() {
        let (adapter, _) = adapter(Ok(DkimVerification {
            valid: true,
            identity: Some("Alice@Example.COM".to_string()),
            domain: None,
        }));
        assert!(adapter.sender_matches(&"alice@example.com".into(), &message()));
    }

    #[test]
    fn identity_takes_precedence_over_domain() {
        // i= names someone else even though d= would align
        let (adapter, _) = adapter(Ok(DkimVerification {
            valid: true,
            identity: Some("mallory@example.com".to_string()),
            domain: Some("example.com".to_string()),
        }));
        assert!(!adapter.sender_matches(&"alice@example.com".into(), &message()));
    }

    #[test]
    fn domain_match_when_no_identity() {
        let (adapter, _) = adapter(Ok(DkimVerification {
            valid: true,
            identity: None,
            domain: Some("EXAMPLE.org".to_string()),
        }));
        assert!(adapter.sender_matches(&"bob@example.org".into(), &message()));
        assert!(!adapter.sender_matches(&"bob@example.net".into(), &message()));
    }

    #[test]
    fn valid_signature_without_fields_does_not_match() {
        let (adapter, _) = adapter(Ok(DkimVerification {
            valid: true,
            identity: None,
            domain: None,
        }));
        assert!(!adapter.sender_matches(&"alice@example.com".into(), &message()));
    }

    #[test]
    fn invalid_signature_does_not_match() {
        let (adapter, audit) = adapter(Ok(DkimVerification {
            valid: false,
            identity: Some("alice@example.com".to_string()),
            domain: None,
        }));
        assert!(!adapter.sender_matches(&"alice@example.com".into(), &message()));
        assert!(audit.entries().is_empty());
    }

    #[test]
    fn verification_error_is_logged_and_fails_closed() {
        let (adapter, audit) = adapter(Err(DkimError::Verification("bad tag list".to_string())));
        assert!(!adapter.sender_matches(&"alice@example.com".into(), &message()));

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "error");
        assert!(entries[0].1.contains("bad tag list"));
    }

    #[test]
    fn unexpected_error_is_logged_and_fails_closed() {
        let (adapter, audit) = adapter(Err(DkimError::Other("resolver panic".to_string())));
        assert!(!adapter.sender_matches(&"alice@example.com".into(), &message()));
        assert_eq!(audit.entries().len(), 1);
    }

    #[test]
    fn sender_without_domain_never_matches_by_domain() {
        let (adapter, _) = adapter(Ok(DkimVerification {
            valid: true,
            identity: None,
            domain: Some("example.com".to_string()),
        }));
        assert!(!adapter.sender_matches(&"postmaster".into(), &message()));
    }
}
