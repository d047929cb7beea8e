use crate::audit::AuditLog;
use crate::authenticity::AuthenticityEngine;
use crate::message::{Message, SenderAddress};
use std::collections::HashMap;
use std::sync::Arc;

/// Metadata carried alongside a bounce through the delivery pipeline; the
/// gate passes it through to the collaborator untouched.
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext {
    pub msgdata: HashMap<String, String>,
    /// Delivery error text that triggered the bounce, when the pipeline has
    /// one.
    pub error: Option<String>,
}

/// How a single bounce evaluation ended. Terminal; no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceDisposition {
    Forwarded,
    Suppressed,
}

/// The mailing list's original, unauthenticated bounce-delivery behavior.
/// The gate wraps it without modifying it.
pub trait BounceDelivery: Send + Sync {
    fn bounce(&self, message: &dyn Message, context: &DeliveryContext) -> anyhow::Result<()>;
}

/// Policy wrapper invoked by the delivery path: authenticate the asserted
/// sender, then either hand the bounce to the real processor or silently
/// drop it. Suppression is never reported to the sender, only audited —
/// answering a spoofed bounce would itself be backscatter.
pub struct BounceGate {
    engine: AuthenticityEngine,
    delivery: Box<dyn BounceDelivery>,
    audit: Arc<dyn AuditLog>,
    audit_suppressions: bool,
}

impl BounceGate {
    pub fn new(
        engine: AuthenticityEngine,
        delivery: Box<dyn BounceDelivery>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        BounceGate {
            engine,
            delivery,
            audit,
            audit_suppressions: true,
        }
    }

    pub fn with_config(mut self, config: &crate::config::Config) -> Self {
        self.audit_suppressions = config.audit_suppressions;
        self
    }

    /// Evaluate one bounce. Stateless across calls; safe to invoke from
    /// multiple workers concurrently.
    pub fn handle_bounce(
        &self,
        sender: &SenderAddress,
        message: &dyn Message,
        context: &DeliveryContext,
    ) -> anyhow::Result<BounceDisposition> {
        if self.engine.is_authentic(sender, message) {
            self.delivery.bounce(message, context)?;
            return Ok(BounceDisposition::Forwarded);
        }

        if self.audit_suppressions {
            let msgid = message.header("Message-ID").unwrap_or("n/a");
            self.audit.log(
                "vette",
                &format!(
                    "Suppressing bounce to unauthenticated sender, msgid: {msgid}, sender: {sender}"
                ),
            );
        }
        Ok(BounceDisposition::Suppressed)
    }
}
