//! Upstream provider clients
//!
//! One client per upstream API. The two deliberately do not share a
//! trait: the Gemini side passes responses through verbatim while the
//! Groq side reshapes them, and that asymmetry is part of the contract.

pub mod gemini;
pub mod groq;

pub use gemini::GeminiClient;
pub use groq::GroqClient;
