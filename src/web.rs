//! REST API over the ledger service. Register with [`configure`].
//!
//! Store calls block on file I/O, so every handler runs its ledger call on
//! tokio's blocking pool.

use crate::ledger::Ledger;
use crate::models::{LedgerError, NewPlayer, PlayerId};
use actix_web::{
    delete, error::InternalError, get, post, put,
    web::{self, Data, Json, JsonConfig, Path, PathConfig, Query, QueryConfig},
    HttpResponse, Responder,
};
use serde::Deserialize;

pub type AppState = Data<Ledger>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RebuyBody {
    amount: i64,
}

#[derive(Deserialize)]
struct FinalStackBody {
    final_stack: i64,
}

/// Destructive calls must carry `confirm: true`.
#[derive(Deserialize)]
struct Confirmation {
    #[serde(default)]
    confirm: bool,
}

/// Path segment: player id (e.g. /api/players/{player_id})
#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

/// Run `f` against the ledger off the async executor.
async fn run<T, F>(state: &AppState, f: F) -> Result<T, LedgerError>
where
    F: FnOnce(&Ledger) -> Result<T, LedgerError> + Send + 'static,
    T: Send + 'static,
{
    let ledger = state.clone();
    tokio::task::spawn_blocking(move || f(&ledger))
        .await
        .map_err(|e| LedgerError::StoreUnavailable(format!("ledger task failed: {e}")))?
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn error_response(e: &LedgerError) -> HttpResponse {
    let body = error_body(e);
    match e {
        LedgerError::NotFound(_) => HttpResponse::NotFound().json(body),
        LedgerError::StoreUnavailable(_) => HttpResponse::ServiceUnavailable().json(body),
        e if e.is_validation() => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, LedgerError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn confirmation_required() -> HttpResponse {
    HttpResponse::BadRequest().json(error_body("Confirmation required: resend with confirm=true"))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "poker-ledger-web",
    })
}

/// All players in registration order.
#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    respond(run(&state, |l| l.players().map(|p| p.as_ref().clone())).await)
}

/// Register a player (name, team, skill, initial buy-in).
#[post("/api/players")]
async fn api_register_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let input = body.into_inner();
    respond(run(&state, move |l| l.register(input)).await)
}

/// Delete a player; requires `?confirm=true`. Returns the remaining players.
#[delete("/api/players/{player_id}")]
async fn api_delete_player(
    state: AppState,
    path: Path<PlayerPath>,
    query: Query<Confirmation>,
) -> HttpResponse {
    if !query.confirm {
        return confirmation_required();
    }
    let id = path.player_id;
    respond(
        run(&state, move |l| {
            l.delete_player(id)?;
            l.players().map(|p| p.as_ref().clone())
        })
        .await,
    )
}

/// Add a re-buy to a player.
#[post("/api/players/{player_id}/rebuys")]
async fn api_add_rebuy(state: AppState, path: Path<PlayerPath>, body: Json<RebuyBody>) -> HttpResponse {
    let (id, amount) = (path.player_id, body.amount);
    respond(run(&state, move |l| l.add_rebuy(id, amount)).await)
}

/// Undo the player's most recent re-buy.
#[delete("/api/players/{player_id}/rebuys/last")]
async fn api_undo_rebuy(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let id = path.player_id;
    respond(run(&state, move |l| l.undo_rebuy(id)).await)
}

/// Set or overwrite a player's final stack.
#[put("/api/players/{player_id}/final-stack")]
async fn api_set_final_stack(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<FinalStackBody>,
) -> HttpResponse {
    let (id, stack) = (path.player_id, body.final_stack);
    respond(run(&state, move |l| l.set_final_stack(id, stack)).await)
}

/// Remove every player; requires `{"confirm": true}`.
#[post("/api/reset")]
async fn api_reset(state: AppState, body: Option<Json<Confirmation>>) -> HttpResponse {
    if !body.map(|b| b.confirm).unwrap_or(false) {
        return confirmation_required();
    }
    respond(
        run(&state, |l| {
            l.reset_all()?;
            l.players().map(|p| p.as_ref().clone())
        })
        .await,
    )
}

/// Head counts and re-buy totals per team.
#[get("/api/progress")]
async fn api_progress(state: AppState) -> HttpResponse {
    respond(run(&state, |l| l.progress()).await)
}

/// Rankings by profit and handicap profit, plus players still missing a final stack.
#[get("/api/settlement")]
async fn api_settlement(state: AppState) -> HttpResponse {
    respond(run(&state, |l| l.settlement()).await)
}

/// Register every route plus JSON error bodies for extractor failures.
/// The caller supplies the `Data<Ledger>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        let resp = HttpResponse::BadRequest().json(error_body(&err));
        InternalError::from_response(err, resp).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        let resp = HttpResponse::BadRequest().json(error_body(&err));
        InternalError::from_response(err, resp).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        let resp = HttpResponse::NotFound().json(error_body(&err));
        InternalError::from_response(err, resp).into()
    }));

    cfg.service(api_health)
        .service(api_list_players)
        .service(api_register_player)
        .service(api_delete_player)
        .service(api_add_rebuy)
        .service(api_undo_rebuy)
        .service(api_set_final_stack)
        .service(api_reset)
        .service(api_progress)
        .service(api_settlement);
}
