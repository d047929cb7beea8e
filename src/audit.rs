/// Categorized audit logging, injected so tests can record entries instead of
/// writing to the process logger.
pub trait AuditLog: Send + Sync {
    fn log(&self, category: &str, message: &str);
}

/// Default sink backed by the `log` facade. The category becomes the log
/// target; verifier failures go out at error level, everything else
/// (suppression notices in particular) at info.
#[derive(Debug, Default)]
pub struct Syslog;

impl AuditLog for Syslog {
    fn log(&self, category: &str, message: &str) {
        match category {
            "error" => log::error!(target: "bounce_guard", "{category}: {message}"),
            _ => log::info!(target: "bounce_guard", "{category}: {message}"),
        }
    }
}
