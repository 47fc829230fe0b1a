mod api;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use vinforge_config::Config;
use vinforge_decode::{check_vin_validity, VpicClient};
use vinforge_ocr::TesseractEngine;
use vinforge_pipeline::build_records;
use vinforge_sheets::SheetsClient;

use api::AppState;

#[derive(Parser)]
#[command(name = "vinforge")]
#[command(about = "VinForge — vehicle-inspection receipt backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the VinForge API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// OCR a batch of document photos and print the vehicle records
    Extract {
        /// Image files, one vehicle report per image
        #[arg(required = true)]
        images: Vec<String>,
    },
    /// Check one VIN against the decode authority
    Decode { vin: String },
    /// Search historical clients in the receipt sheet
    Clients { term: String },
    /// Append a receipt JSON file to the receipt sheet
    Submit { file: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    config.validate()?;

    vinforge_logging::init_logger(&config.log_level, config.log_dir.as_deref());

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Extract { images } => {
            let engine = ocr_engine(&config);
            let authority = vpic_client(&config);
            let records = build_records(&engine, &authority, &images).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Decode { vin } => {
            let authority = vpic_client(&config);
            let validation = check_vin_validity(&authority, &vin).await;
            println!("{}", serde_json::to_string_pretty(&validation)?);
        }
        Commands::Clients { term } => {
            let sheets = sheets_client(&config)
                .ok_or_else(|| anyhow::anyhow!("VINFORGE_SHEETS_URL is not configured"))?;
            let clients = sheets.search_clients(&term).await?;
            println!("{}", serde_json::to_string_pretty(&clients)?);
        }
        Commands::Submit { file } => {
            let sheets = sheets_client(&config)
                .ok_or_else(|| anyhow::anyhow!("VINFORGE_SHEETS_URL is not configured"))?;
            let raw = std::fs::read_to_string(&file)?;
            let receipt: vinforge_core::ReceiptData = serde_json::from_str(&raw)?;
            sheets.append_receipt(&receipt).await?;
            println!("Receipt {} appended", receipt.id);
        }
    }

    Ok(())
}

fn vpic_client(config: &Config) -> VpicClient {
    VpicClient::with_timeout(Duration::from_secs(config.decode_timeout_secs))
        .with_base_url(config.vpic_base_url.clone())
}

fn ocr_engine(config: &Config) -> TesseractEngine {
    TesseractEngine::new(config.tesseract_binary.clone())
        .with_language(config.tesseract_lang.clone())
        .with_timeout(Duration::from_secs(config.ocr_timeout_secs))
}

fn sheets_client(config: &Config) -> Option<SheetsClient> {
    config.sheets_webapp_url.as_ref().map(|url| {
        SheetsClient::with_timeout(url.clone(), Duration::from_secs(config.sheets_timeout_secs))
    })
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        "Starting VinForge API server"
    );

    let state = Arc::new(AppState {
        ocr: Arc::new(ocr_engine(&config)),
        authority: Arc::new(vpic_client(&config)),
        sheets: sheets_client(&config),
    });

    if state.sheets.is_none() {
        info!("No sheet web-app URL configured; client search and receipt submit are disabled");
    }

    // The wizard UI is served elsewhere; allow it to call this API.
    let app = api::build_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "VinForge API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
