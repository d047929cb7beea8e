use std::fmt;

/// An RFC 5321 style sender address, `local-part@domain`.
///
/// Domain extraction splits on the *first* `@`. An address without an `@`
/// yields no domain; callers comparing against a signing domain must treat
/// that as a mismatch rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderAddress(String);

impl SenderAddress {
    pub fn new(address: impl Into<String>) -> Self {
        SenderAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The portion after the first `@`, or `None` for a malformed address.
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, domain)| domain)
    }
}

impl fmt::Display for SenderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderAddress {
    fn from(address: &str) -> Self {
        SenderAddress::new(address)
    }
}

/// Read-only view of a bounce message. The gate never mutates a message;
/// callers that already hold a parsed representation implement this directly,
/// everyone else can wrap raw bytes in [`ParsedMessage`].
pub trait Message {
    /// The serialized form handed to DKIM verification.
    fn canonical_bytes(&self) -> &[u8];

    /// All `Received` trace headers in message order, i.e. the most recently
    /// added hop first.
    fn received_headers(&self) -> Vec<&str>;

    /// First header with the given name, case-insensitive, unfolded.
    fn header(&self, name: &str) -> Option<&str>;
}

/// A minimal parsed message: the raw bytes plus an ordered header list with
/// RFC 5322 continuation lines unfolded. Body content is kept only inside
/// `canonical_bytes`; nothing in the bounce decision reads it.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    raw: Vec<u8>,
    headers: Vec<(String, String)>,
}

impl ParsedMessage {
    pub fn parse(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let headers = parse_headers(&raw);
        ParsedMessage { raw, headers }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl Message for ParsedMessage {
    fn canonical_bytes(&self) -> &[u8] {
        &self.raw
    }

    fn received_headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("Received"))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Split the header block (everything before the first blank line) into
/// `(name, value)` pairs, joining folded continuation lines with a space.
/// Malformed lines without a colon are skipped.
fn parse_headers(raw: &[u8]) -> Vec<(String, String)> {
    let text = String::from_utf8_lossy(raw);
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            break; // end of header block
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim_start());
            }
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                headers.push((name.trim().to_string(), value.trim_start().to_string()));
            }
            None => continue,
        }
    }

    headers
}
