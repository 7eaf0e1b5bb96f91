mod blocks;
mod draws;
mod health;
mod jobs;
pub mod models;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(draws::get_index)
            .service(draws::get_draws)
            .service(draws::get_draw)
            .service(draws::verify_draw)
            .service(draws::get_config)
            .service(jobs::trigger_draw)
            .service(jobs::refresh_statistics)
            .service(jobs::get_stats)
            .service(blocks::post_blocks),
    );
}
