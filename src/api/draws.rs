use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{
    AppState, DrawDetailResponse, DrawsResponse, ErrorResponse, INDEX_LIMIT, IndexResponse,
    VerifyRequest,
};
use crate::chain::HashSource;
use crate::lottery::verify;

/// Latest draws plus chain progress.
#[get("/index/")]
pub async fn get_index(state: web::Data<AppState>) -> impl Responder {
    let (draws, num_draws) = {
        let store = state.draws.lock().expect("mutex poisoned");
        let recent: Vec<_> = store.latest(INDEX_LIMIT).into_iter().cloned().collect();
        (recent, store.len())
    };
    let current_height = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.tip_height()
    };

    HttpResponse::Ok().json(IndexResponse {
        last_draw_height: draws.first().map_or(0, |d| d.end_height()),
        draws,
        num_draws,
        current_height,
    })
}

/// Every stored draw, oldest first.
#[get("/draws/")]
pub async fn get_draws(state: web::Data<AppState>) -> impl Responder {
    let store = state.draws.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DrawsResponse {
        draws: store.all().into_iter().cloned().collect(),
    })
}

/// One draw with the blocks it was derived from.
#[get("/draw/{id}/")]
pub async fn get_draw(state: web::Data<AppState>, path: web::Path<(u64,)>) -> impl Responder {
    let id = path.into_inner().0;

    let draw = {
        let store = state.draws.lock().expect("mutex poisoned");
        store.get(id).cloned()
    };
    let Some(draw) = draw else {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: format!("invalid draw number {id}"),
        });
    };

    let blocks = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (draw.start_height()..=draw.end_height())
            .filter_map(|h| ledger.get(h).cloned())
            .collect()
    };

    HttpResponse::Ok().json(DrawDetailResponse { draw, blocks })
}

/// Recompute numbers from caller-supplied hashes and compare.
#[post("/verify/")]
pub async fn verify_draw(
    state: web::Data<AppState>,
    body: web::Json<VerifyRequest>,
) -> impl Responder {
    match verify(
        &body.hashes,
        body.timestamp.as_deref(),
        &body.front,
        body.back,
        state.config(),
    ) {
        Ok(verification) => {
            debug!(
                "VERIFY - hashes={} valid={}",
                body.hashes.len(),
                verification.valid
            );
            HttpResponse::Ok().json(verification)
        }
        Err(e) => {
            warn!("VERIFY - rejected: {e}");
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Active lottery format.
#[get("/config/")]
pub async fn get_config(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.config())
}
