use actix_web::{App, HttpServer, rt, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::env;
use std::io;
use std::time::Duration;

use block_lotto::api::{self, AppState};
use block_lotto::chain::load_csv_file;
use block_lotto::lottery::LotteryConfig;

/// Process-level settings; lottery format lives in `LotteryConfig`.
struct ServerConfig {
    host: String,
    port: u16,
    blocks_csv: Option<String>,
    update_interval_secs: u64,
    auto_update_draws: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            blocks_csv: env::var("BLOCKS_CSV").ok().filter(|v| !v.is_empty()),
            update_interval_secs: env::var("UPDATE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            auto_update_draws: env::var("AUTO_UPDATE_DRAWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let server = ServerConfig::from_env();
    let config = LotteryConfig::from_env();
    config.validate().map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(config));

    if let Some(path) = &server.blocks_csv {
        let blocks = load_csv_file(path).map_err(io::Error::other)?;
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let added = ledger.append(blocks).map_err(io::Error::other)?;
        info!("Loaded {added} blocks from {path}");
    }

    if server.auto_update_draws && server.update_interval_secs > 0 {
        let job_state = state.clone();
        let every = Duration::from_secs(server.update_interval_secs);
        rt::spawn(async move {
            let mut interval = rt::time::interval(every);
            loop {
                interval.tick().await;
                if let Err(e) = job_state
                    .updater
                    .update_draws(&job_state.ledger, &job_state.draws)
                {
                    warn!("Scheduled draw update failed: {e}");
                }
            }
        });
        info!(
            "Scheduled task started, checking for new blocks every {}s",
            server.update_interval_secs
        );
    }

    println!(
        "🎲 Starting lotto API at http://{}:{}",
        server.host, server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
