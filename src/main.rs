//! Fan-site chat proxy server
//!
//! Binary entry point: loads configuration, initializes logging, and
//! serves the proxy endpoints the front-end chat widget calls.

use lore_chat_proxy::api::endpoints::{AppState, create_router};
use lore_chat_proxy::core::config::Config;
use lore_chat_proxy::core::logging::init_logging;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // Pick up .env-provisioned credentials before reading config
    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    // Print startup banner
    print_startup_banner(&config);

    // Missing credentials are a per-request failure, not a startup one:
    // secrets can be provisioned independently of code deployment.
    if !config.gemini_configured() {
        warn!("GEMINI_API_KEY is not configured; /api/gemini will answer 500");
    }
    if !config.groq_configured() {
        warn!("GROQ_API_KEY is not configured; /api/groq will answer 500");
    }

    // Create application state and router
    let state = AppState::from_config(config.clone());
    let app = create_router(state);

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🗡️  Lore Chat Proxy v0.1.0");
    println!("✅ Configuration loaded successfully");
    println!("   Gemini Model: {}", config.gemini_model);
    println!("   Groq Model: {}", config.groq_model);
    println!(
        "   Gemini Credential: {}",
        if config.gemini_configured() {
            "Configured"
        } else {
            "Missing"
        }
    );
    println!(
        "   Groq Credential: {}",
        if config.groq_configured() {
            "Configured"
        } else {
            "Missing"
        }
    );
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("Lore Chat Proxy v0.1.0");
    println!();
    println!("Usage: lore-chat-proxy [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  GEMINI_API_KEY - Gemini API key (per-request 500 when absent)");
    println!("  GROQ_API_KEY - Groq API key (per-request 500 when absent)");
    println!("  CONFIG_PATH - Path to TOML config (default: config.toml)");
    println!();
    println!("Config file tables (all optional):");
    println!("  [gemini]  api_key, base_url, model");
    println!("  [groq]    api_key, base_url, model, temperature, max_tokens");
    println!("  [server]  host (default 0.0.0.0), port (default 8787), log_level");
    println!("  [request] request_timeout (default 90s)");
    println!();
    println!("Endpoints:");
    println!("  POST /api/gemini - single-turn generation proxy");
    println!("  POST /api/groq   - multi-turn chat-completion proxy");
    println!("  GET  /health     - liveness probe");
}
