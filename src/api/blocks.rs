use actix_web::{HttpResponse, Responder, post, web};
use log::warn;

use super::models::{AppState, BlocksRequest, BlocksResponse, ErrorResponse};
use crate::chain::HashSource;

/// Ingest a contiguous batch of blocks continuing from the ledger tip.
#[post("/blocks/")]
pub async fn post_blocks(
    state: web::Data<AppState>,
    body: web::Json<BlocksRequest>,
) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.append(body.into_inner().blocks) {
        Ok(added) => HttpResponse::Ok().json(BlocksResponse {
            added,
            tip_height: ledger.tip_height(),
        }),
        Err(e) => {
            warn!("POST /blocks/ - rejected: {e}");
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}
