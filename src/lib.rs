pub mod audit;
pub mod authenticity;
pub mod config;
pub mod dkim;
pub mod gate;
pub mod message;
pub mod spf;

pub use audit::{AuditLog, Syslog};
pub use authenticity::AuthenticityEngine;
pub use config::Config;
pub use dkim::{DkimError, DkimVerification, DkimVerify};
pub use gate::{BounceDelivery, BounceDisposition, BounceGate, DeliveryContext};
pub use message::{Message, ParsedMessage, SenderAddress};
pub use spf::{SpfOutcome, SpfQuery, SpfResponse};
