use std::process::exit;

use eyre::Result;
use tracing::info;
use weather_mcp::tools::{ToolState, register_all};
use weather_mcp::{McpServer, OwmClient, OwmConfig, ServerConfig, ToolRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let api_key = match std::env::var("OPENWEATHER_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("OPENWEATHER_API_KEY is not set.");
            eprintln!("Get a key at https://openweathermap.org/api and export it:");
            eprintln!("  export OPENWEATHER_API_KEY=your-key");
            exit(1);
        }
    };

    let client = match OwmClient::new(OwmConfig::new(api_key)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to construct HTTP client: {e}");
            exit(1);
        }
    };

    // Fail fast on a bad key rather than serving tools that cannot work.
    if let Err(e) = client.validate_api_key().await {
        eprintln!("OpenWeatherMap API key validation failed: {e}");
        eprintln!("Check that the key is active and has access to the weather API.");
        exit(1);
    }
    info!("OpenWeatherMap API key validated");

    let mut registry = ToolRegistry::new();
    register_all(&mut registry, &ToolState::new(client));

    let mut config = ServerConfig::default();
    if let Ok(host) = std::env::var("WEATHER_MCP_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("WEATHER_MCP_PORT") {
        config.port = port.parse().unwrap_or(config.port);
    }

    McpServer::new(config, registry).start().await
}
