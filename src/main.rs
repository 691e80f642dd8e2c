//! NthKey CLI Application
//!
//! A command-line interface for setting up a multisig wallet.

use clap::{Parser, Subcommand};
use nthkey::api::{create_router, ApiState};
use nthkey::cli::{self, AppState};
use nthkey::storage::{Storage, StorageConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nthkey")]
#[command(version = "0.1.0")]
#[command(about = "Multisig wallet setup: cosigners, threshold and key exchange", long_about = None)]
struct Cli {
    /// Data directory for wallet state
    #[arg(short, long, default_value = ".nthkey_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local signer key
    Init {
        /// Display name announced to cosigners
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show signers and wallet status
    Status,

    /// Cosigner operations
    Cosigner {
        #[command(subcommand)]
        action: CosignerCommands,
    },

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Export our public key for cosigners
    Export {
        /// Output file path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the recovery phrase of the active wallet
    Mnemonic,

    /// REST API server
    Api {
        #[command(subcommand)]
        action: ApiCommands,
    },
}

#[derive(Subcommand)]
enum CosignerCommands {
    /// Import a cosigner from an exchange file
    Add {
        /// Exchange file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Remove all cosigners
    Wipe,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create an M-of-N wallet from the current cosigners
    Create {
        /// Signatures required (M)
        #[arg(short, long, default_value = "2")]
        threshold: usize,
    },

    /// Destroy the wallet
    Wipe,
}

#[derive(Subcommand)]
enum ApiCommands {
    /// Start the REST API server
    Start {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need loaded state)
    if let Commands::Init { name } = &cli.command {
        return cli::cmd_init(&cli.data_dir, name.as_deref());
    }

    // Handle API commands with tokio runtime
    if let Commands::Api { ref action } = cli.command {
        return run_api_command(action, &cli.data_dir);
    }

    let mut state = AppState::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),
        Commands::Api { .. } => unreachable!(),

        Commands::Status => {
            cli::cmd_status(&state)?;
        }

        Commands::Cosigner { action } => match action {
            CosignerCommands::Add { file } => {
                cli::cmd_cosigner_add(&mut state, &file)?;
            }
            CosignerCommands::Wipe => {
                cli::cmd_cosigner_wipe(&mut state)?;
            }
        },

        Commands::Wallet { action } => match action {
            WalletCommands::Create { threshold } => {
                cli::cmd_wallet_create(&mut state, threshold)?;
            }
            WalletCommands::Wipe => {
                cli::cmd_wallet_wipe(&mut state)?;
            }
        },

        Commands::Export { output } => {
            cli::cmd_export(&state, output.as_deref())?;
        }

        Commands::Mnemonic => {
            cli::cmd_mnemonic(&state)?;
        }
    }

    Ok(())
}

fn run_api_command(action: &ApiCommands, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match action {
            ApiCommands::Start { port } => {
                let storage = Storage::new(StorageConfig {
                    data_dir: data_dir.to_path_buf(),
                    ..Default::default()
                })?;
                let service = storage.load_or_create("")?;
                println!("🔑 Local signer: {}", service.local_fingerprint_hex());

                let app = create_router(ApiState::new(service, storage));

                let addr = format!("0.0.0.0:{}", port);
                println!("🚀 REST API server starting on http://localhost:{}", port);
                println!();
                println!("📖 Available endpoints:");
                println!("   GET    /health                  - Health check");
                println!("   GET    /api/status              - Signers and wallet");
                println!("   GET    /api/cosigners           - List cosigners");
                println!("   POST   /api/cosigners           - Import cosigner");
                println!("   DELETE /api/cosigners           - Wipe cosigners");
                println!("   GET    /api/wallet              - Active wallet");
                println!("   POST   /api/wallet              - Create wallet");
                println!("   DELETE /api/wallet              - Wipe wallet");
                println!("   GET    /api/wallet/preview      - Check a threshold");
                println!("   GET    /api/export              - Our public key");
                println!("   POST   /api/mnemonic/reveal     - Recovery phrase");
                println!();

                // Every mutation is saved as it happens
                tokio::spawn(async move {
                    tokio::signal::ctrl_c().await.ok();
                    println!("\n📴 Shutting down API server...");
                    std::process::exit(0);
                });

                let listener = tokio::net::TcpListener::bind(&addr).await?;
                log::info!("Listening on {}", addr);
                axum::serve(listener, app).await?;
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
