use crate::message::{Message, SenderAddress};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "from host (ident [ip])" taken from the topmost Received header; the
    // second hostname token inside the parentheses is optional and the
    // bracketed literal may be IPv4 or an "IPv6:..." form.
    static ref RECEIVED_FROM: Regex =
        Regex::new(r"(?i)\s*from\s+\S+\s+\((?:\S+\s+)?\[([^\]]+)\]\)").unwrap();
}

/// SPF check outcomes, RFC 7208 §8 plus `Inapplicable` for implementations
/// that cannot evaluate the query at all. Only `Pass` authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfOutcome {
    Pass,
    Fail,
    SoftFail,
    Neutral,
    None,
    TempError,
    PermError,
    Inapplicable,
}

#[derive(Debug, Clone)]
pub struct SpfResponse {
    pub outcome: SpfOutcome,
    pub extended_code: Option<String>,
    pub explanation: Option<String>,
}

impl SpfResponse {
    pub fn outcome(outcome: SpfOutcome) -> Self {
        SpfResponse {
            outcome,
            extended_code: None,
            explanation: None,
        }
    }
}

/// External SPF policy-check capability.
///
/// `check` performs DNS-dependent blocking work; implementations must bound
/// it (see `Config::spf_timeout_seconds`) and report expiry as `TempError`
/// rather than blocking. Callers on a cooperative scheduler should run the
/// check off their main loop.
pub trait SpfQuery: Send + Sync {
    fn check(&self, ip: &str, sender: &SenderAddress, helo: Option<&str>) -> SpfResponse;
}

/// Extracts the claimed originating IP from the message trace and runs it
/// through the SPF capability.
pub struct SpfAdapter {
    query: Box<dyn SpfQuery>,
}

impl SpfAdapter {
    pub fn new(query: Box<dyn SpfQuery>) -> Self {
        SpfAdapter { query }
    }

    /// True iff the first (most recent) Received header names a bracketed
    /// source IP and the SPF check for that IP and sender is exactly `Pass`.
    /// Only the first hop is consulted; every earlier hop in the trace was
    /// written by hosts the verifier cannot trust.
    pub fn sender_passes(&self, sender: &SenderAddress, message: &dyn Message) -> bool {
        let received = message.received_headers();
        let Some(first_hop) = received.first() else {
            return false;
        };

        let Some(captures) = RECEIVED_FROM.captures(first_hop) else {
            return false;
        };
        let ip = &captures[1];

        let response = self.query.check(ip, sender, None);
        response.outcome == SpfOutcome::Pass
    }
}
