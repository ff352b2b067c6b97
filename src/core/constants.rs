//! Wire-level string constants
//!
//! This module defines string constants used throughout the application
//! for chat message roles and the CORS policy shared by every response.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// Assistant role identifier
    pub const ASSISTANT: &str = "assistant";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// CORS policy values attached to every response
pub mod cors {
    /// Any origin may call the proxy; the front-end is a static site.
    pub const ALLOW_ORIGIN: &str = "*";

    /// The proxy surface only ever accepts POST plus preflight.
    pub const ALLOW_METHODS: &str = "POST, OPTIONS";

    /// Only the JSON content type header is needed by callers.
    pub const ALLOW_HEADERS: &str = "Content-Type";
}
