use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, ErrorResponse, TriggerResponse};
use crate::error::UpdateError;

/// Produce every draw whose block window is complete.
#[post("/trigger-draw/")]
pub async fn trigger_draw(state: web::Data<AppState>) -> impl Responder {
    match state.updater.update_draws(&state.ledger, &state.draws) {
        Ok(created) => {
            let num_draws = state.draws.lock().expect("mutex poisoned").len();
            info!("TRIGGER - created={created} total={num_draws}");
            HttpResponse::Ok().json(TriggerResponse { created, num_draws })
        }
        Err(e) => {
            warn!("TRIGGER - failed: {e}");
            let body = ErrorResponse {
                error: e.to_string(),
            };
            match e {
                UpdateError::Source(_) => HttpResponse::Conflict().json(body),
                UpdateError::Lottery(_) => HttpResponse::BadRequest().json(body),
            }
        }
    }
}

/// Recompute frequency statistics over all draws.
#[post("/refresh-statistics/")]
pub async fn refresh_statistics(state: web::Data<AppState>) -> impl Responder {
    match state.updater.refresh_statistics(&state.draws) {
        Some(stats) => HttpResponse::Ok().json(stats),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "no draws yet".to_string(),
        }),
    }
}

/// Latest statistics snapshot.
#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let store = state.draws.lock().expect("mutex poisoned");
    match store.statistics() {
        Some(stats) => HttpResponse::Ok().json(stats),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "statistics not computed yet".to_string(),
        }),
    }
}
