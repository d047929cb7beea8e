use crate::audit::AuditLog;
use crate::dkim::{DkimAdapter, DkimVerify};
use crate::message::{Message, SenderAddress};
use crate::spf::{SpfAdapter, SpfQuery};
use std::sync::Arc;

/// Combines the DKIM and SPF paths into a single trust decision. Either
/// signal alone authenticates; there is no scoring.
pub struct AuthenticityEngine {
    dkim: DkimAdapter,
    spf: SpfAdapter,
}

impl AuthenticityEngine {
    pub fn new(
        dkim: Box<dyn DkimVerify>,
        spf: Box<dyn SpfQuery>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        AuthenticityEngine {
            dkim: DkimAdapter::new(dkim, audit),
            spf: SpfAdapter::new(spf),
        }
    }

    /// DKIM first; SPF is only consulted when the signature path did not
    /// authenticate, since it costs a header parse and a DNS-bound policy
    /// query while DKIM is local. Never panics and never propagates verifier
    /// errors.
    pub fn is_authentic(&self, sender: &SenderAddress, message: &dyn Message) -> bool {
        self.dkim.sender_matches(sender, message) || self.spf.sender_passes(sender, message)
    }
}
