//! Server command implementation

use anyhow::Result;
use spendlens_server::{parse_origins, ServerConfig, DEFAULT_MAX_BODY_BYTES};
use tracing::warn;

/// Build the server config from flags, falling back to environment values
///
/// `env_origins` is SPENDLENS_ALLOWED_ORIGINS, `env_max_body` is
/// SPENDLENS_MAX_BODY_BYTES.
pub fn resolve_server_config(
    flag_origins: Vec<String>,
    env_origins: Option<&str>,
    env_max_body: Option<&str>,
) -> ServerConfig {
    let allowed_origins = if flag_origins.is_empty() {
        env_origins.map(parse_origins).unwrap_or_default()
    } else {
        flag_origins
    };

    let max_body_bytes = match env_max_body.map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_MAX_BODY_BYTES,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(
                    value = raw,
                    "Invalid SPENDLENS_MAX_BODY_BYTES, using default of {}", DEFAULT_MAX_BODY_BYTES
                );
                DEFAULT_MAX_BODY_BYTES
            }
        },
    };

    ServerConfig {
        allowed_origins,
        max_body_bytes,
    }
}

pub async fn cmd_serve(host: &str, port: u16, allowed_origins: Vec<String>) -> Result<()> {
    let env_origins = std::env::var("SPENDLENS_ALLOWED_ORIGINS").ok();
    let env_max_body = std::env::var("SPENDLENS_MAX_BODY_BYTES").ok();
    let config = resolve_server_config(
        allowed_origins,
        env_origins.as_deref(),
        env_max_body.as_deref(),
    );

    println!("🚀 Starting SpendLens web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Endpoint:  POST /analyze-expenses");
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: any origin");
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }
    println!("   Max body:  {} bytes", config.max_body_bytes);
    println!();
    println!("   Press Ctrl+C to stop");

    spendlens_server::serve(host, port, config).await?;

    Ok(())
}
