//! Shared constants used across the application

use std::time::Duration;

/// How long a transient error banner stays visible before it is dismissed.
pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(4);

/// Banner text shown when a turn fails. Transport errors and non-2xx
/// responses surface identically; the details go to the diagnostic log.
pub const REQUEST_FAILED_BANNER: &str = "Request failed. Check the endpoint and try again.";

/// Reply substituted when the response payload carries no text field.
pub const FALLBACK_REPLY: &str = "No response received.";
