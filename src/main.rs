//! Face measurement HTTP server.

use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use face_measure::config::config::AppConfig;
use face_measure::helper::measurement::MeasurementEngine;
use face_measure::modules::face_mesh_client::FaceMeshClient;
use face_measure::pipeline::pipeline::MeasurementPipeline;
use face_measure::server;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// gRPC endpoint of the face mesh inference server
    #[arg(long)]
    landmark_endpoint: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(endpoint) = args.landmark_endpoint {
        config.landmark_provider.endpoint = endpoint;
    }
    config.validate()?;

    info!("Landmark provider: {} ({})", config.landmark_provider.endpoint, config.landmark_provider.model_name);
    let provider = FaceMeshClient::new(config.landmark_provider.clone())?;
    let pipeline = MeasurementPipeline::new(Arc::new(provider), MeasurementEngine::new(config.measurement.clone()));

    server::serve(&config, pipeline).await
}
