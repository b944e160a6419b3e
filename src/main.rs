// src/main.rs

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use avax_defi_agent::{
    api::create_router,
    blockchain::{
        wallet_provider::wallet_from_private_key, Address, DryRunWalletProvider,
        EvmWalletProvider, WalletProvider,
    },
    config::Config,
    runtime::AgentRuntime,
    AppState,
};
use ethers_signers::Signer;
use secrecy::ExposeSecret;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const STDIO_USER: &str = "console-user";
const STDIO_ROOM: &str = "console";

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let app = create_router(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            return;
        }
    };

    info!("🚀 API server running on http://{}", addr);
    info!("Available endpoints:");
    info!("  POST /api/chat - Send messages to the agent");
    info!("  GET /api/health - Check server status");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

// --- Console chat over stdin/stdout ---
async fn run_stdio_chat(state: AppState) {
    info!("🚀 Reading chat messages from stdin...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, leaving console chat");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);
                let reply = state.runtime.respond(STDIO_USER, STDIO_ROOM, line).await;

                if let Err(e) = stdout.write_all(format!("{}\n", reply).as_bytes()).await {
                    error!("Failed to write response: {}", e);
                    break;
                }
                if let Err(e) = stdout.flush().await {
                    error!("Failed to flush response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }
}

fn build_wallet_provider(config: &Config) -> Arc<dyn WalletProvider> {
    if config.dry_run {
        let address = config
            .evm_private_key
            .as_ref()
            .and_then(|key| wallet_from_private_key(key.expose_secret(), config.chain_id).ok())
            .map(|wallet| wallet.address())
            .unwrap_or_else(Address::zero);
        warn!("DRY_RUN is set: contract calls are recorded, not broadcast");
        Arc::new(DryRunWalletProvider::new(&config.chain_name, address))
    } else {
        Arc::new(EvmWalletProvider::from_config(config))
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avax_defi_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    info!(
        "Serving {} (chain id {}) via {}",
        config.chain_name, config.chain_id, config.rpc_url
    );

    let wallet_provider = build_wallet_provider(&config);

    let runtime = match AgentRuntime::from_config(&config, wallet_provider) {
        Ok(runtime) => Arc::new(runtime),
        Err(e) => {
            error!("❌ Failed to initialize agent runtime: {:#}", e);
            return;
        }
    };
    runtime.initialize();

    let app_state = AppState::new(config, runtime.clone());

    // Console chat when asked for, HTTP otherwise
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--stdio".to_string()) || env::var("STDIO_MODE").is_ok() {
        run_stdio_chat(app_state).await;
    } else {
        run_http_server(app_state).await;
    }

    runtime.shutdown();
}
