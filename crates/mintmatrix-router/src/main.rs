//! Mint Matrix Router CLI
//!
//! Starts the HTTP server for IP relationship views and royalty claims.

use mintmatrix_router::{config::RouterConfig, start_server, RouterError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), RouterError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        RouterConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: mintmatrix-router --config <path-to-config.toml>");
        eprintln!();
        let mut config = RouterConfig::default_test_config();
        config.apply_env(env::var(mintmatrix_router::config::API_KEY_ENV).ok());
        config
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Mint Matrix Router - IP relationship views and royalty claims");
    println!();
    println!("USAGE:");
    println!("    mintmatrix-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    STORY_API_KEY      Story Protocol API key (overrides [story].api_key)");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port");
    println!("    - [story]: api_base_url, api_key, chain, page_size, max_total");
    println!("    - [retry]: max_attempts, backoff_step_ms");
    println!("    - [royalty]: gateway_url, wip_address, merc20_address");
    println!("    - [agent_keys]: ttl_secs");
    println!();
}
