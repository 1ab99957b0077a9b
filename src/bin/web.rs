//! Single binary web server: admin tournament API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use clanmatch_web::{
    cleanup_orphaned_match_results, create_or_update_match_result, delete_match_result,
    delete_result_for_map, override_team_mapping, recalculate_all_rankings, PlayerSession, Round,
    RoundId, Tournament, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory tournament structure store, by tournament id.
type Tournaments = Data<RwLock<HashMap<TournamentId, Tournament>>>;

/// Round/session facts from game-server polling. Read-only to the
/// tournament logic; populated through the ingest endpoint.
type Rounds = Data<RwLock<HashMap<RoundId, Round>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
}

#[derive(Deserialize)]
struct CreateTeamBody {
    name: String,
    #[serde(default)]
    players: Vec<String>,
}

#[derive(Deserialize)]
struct AddTeamPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct CreateMatchBody {
    team1_id: Uuid,
    team2_id: Uuid,
    scheduled: Option<DateTime<Utc>>,
    server: Option<String>,
    week: Option<String>,
}

#[derive(Deserialize)]
struct AddMapBody {
    map_name: String,
}

/// Map update: each field only applies when its update flag is set, so a
/// body can change the round link without touching the pre-assignment.
#[derive(Deserialize)]
struct UpdateMapBody {
    round_id: Option<Uuid>,
    #[serde(default)]
    update_round_id: bool,
    team_id: Option<Uuid>,
    #[serde(default)]
    update_team_id: bool,
}

#[derive(Deserialize)]
struct OverrideTeamsBody {
    team1_id: Uuid,
    team2_id: Uuid,
}

#[derive(Deserialize)]
struct IngestRoundBody {
    server: String,
    map_name: String,
    team1_label: String,
    team2_label: String,
    tickets1: Option<i32>,
    tickets2: Option<i32>,
    #[serde(default)]
    sessions: Vec<PlayerSession>,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    week: Option<String>,
}

#[derive(Serialize)]
struct LeaderboardRow {
    rank: u32,
    team_id: Uuid,
    team_name: String,
    rounds_won: u32,
    rounds_tied: u32,
    rounds_lost: u32,
    ticket_differential: i64,
    week: Option<String>,
}

/// Path segment: tournament id.
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentMapPath {
    id: TournamentId,
    match_id: Uuid,
    map_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentResultPath {
    id: TournamentId,
    result_id: Uuid,
}

#[derive(Deserialize)]
struct RoundPath {
    id: RoundId,
}

fn not_found_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Map a TournamentError to 404 (missing entity) or 400 (bad input).
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TeamNotFound(_)
        | TournamentError::MatchNotFound(_)
        | TournamentError::MapNotFound(_)
        | TournamentError::ResultNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Fire-and-forget ranking recalculation. Failures are logged with the
/// tournament id and never reach the HTTP caller that triggered them.
fn spawn_recalculation(state: Tournaments, tournament_id: TournamentId) {
    actix_web::rt::spawn(async move {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!(
                    "Ranking recalculation for tournament {} failed: state lock poisoned",
                    tournament_id
                );
                return;
            }
        };
        match g.get_mut(&tournament_id) {
            Some(t) => {
                let rows = recalculate_all_rankings(t);
                log::info!(
                    "Recalculated rankings for tournament {}: {} row(s)",
                    tournament_id,
                    rows
                );
            }
            None => log::warn!(
                "Ranking recalculation skipped: tournament {} no longer exists",
                tournament_id
            ),
        }
    });
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "clanmatch-web",
    })
}

/// Create a new tournament (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: Tournaments, body: Json<CreateTournamentBody>) -> HttpResponse {
    let tournament = Tournament::new(body.name.trim());
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(id, tournament);
    HttpResponse::Ok().json(&g[&id])
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => not_found_tournament(),
    }
}

/// Register a team with an optional initial roster.
#[post("/api/tournaments/{id}/teams")]
async fn api_create_team(
    state: Tournaments,
    path: Path<TournamentPath>,
    body: Json<CreateTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let body = body.into_inner();
    match t.add_team(body.name, body.players) {
        Ok(team_id) => HttpResponse::Ok().json(t.get_team(team_id)),
        Err(e) => error_response(&e),
    }
}

/// Add a player name to a team's roster.
#[post("/api/tournaments/{id}/teams/{team_id}/players")]
async fn api_add_team_player(
    state: Tournaments,
    path: Path<TournamentTeamPath>,
    body: Json<AddTeamPlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    match t.add_team_player(path.team_id, body.name.clone()) {
        Ok(()) => HttpResponse::Ok().json(t.get_team(path.team_id)),
        Err(e) => error_response(&e),
    }
}

/// Delete a team (400 when still referenced by a match).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_delete_team(state: Tournaments, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    match t.remove_team(path.team_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Schedule a match between two registered teams.
#[post("/api/tournaments/{id}/matches")]
async fn api_create_match(
    state: Tournaments,
    path: Path<TournamentPath>,
    body: Json<CreateMatchBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let scheduled = body.scheduled.unwrap_or_else(Utc::now);
    match t.add_match(body.team1_id, body.team2_id, scheduled) {
        Ok(match_id) => {
            let m = t.get_match_mut(match_id).unwrap();
            m.server = body.server.clone();
            m.week = body.week.clone();
            HttpResponse::Ok().json(&*m)
        }
        Err(e) => error_response(&e),
    }
}

/// Append a map to a match's map list.
#[post("/api/tournaments/{id}/matches/{match_id}/maps")]
async fn api_add_map(
    state: Tournaments,
    path: Path<TournamentMatchPath>,
    body: Json<AddMapBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let m = match t.get_match_mut(path.match_id) {
        Some(m) => m,
        None => return error_response(&TournamentError::MatchNotFound(path.match_id)),
    };
    let map_id = m.add_map(body.map_name.trim());
    HttpResponse::Ok().json(m.get_map(map_id))
}

/// Delete a map (and its result), then recalculate standings in the background.
#[delete("/api/tournaments/{id}/matches/{match_id}/maps/{map_id}")]
async fn api_delete_map(state: Tournaments, path: Path<TournamentMapPath>) -> HttpResponse {
    let resp = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let t = match g.get_mut(&path.id) {
            Some(t) => t,
            None => return not_found_tournament(),
        };
        match t.remove_map(path.match_id, path.map_id) {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(e) => return error_response(&e),
        }
    };
    spawn_recalculation(state, path.id);
    resp
}

/// Update a map: pre-assign a side and/or link or unlink a round.
///
/// Linking a round runs the reconciler synchronously (its warning belongs in
/// this response) and then kicks off a background recalculation. Unlinking
/// deletes the map's result and also recalculates.
#[put("/api/tournaments/{id}/matches/{match_id}/maps/{map_id}")]
async fn api_update_map(
    state: Tournaments,
    rounds: Rounds,
    path: Path<TournamentMapPath>,
    body: Json<UpdateMapBody>,
) -> HttpResponse {
    let mut warning: Option<String> = None;
    let mut results_changed = false;

    let resp = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let t = match g.get_mut(&path.id) {
            Some(t) => t,
            None => return not_found_tournament(),
        };

        if body.update_team_id {
            let m = match t.get_match(path.match_id) {
                Some(m) => m,
                None => return error_response(&TournamentError::MatchNotFound(path.match_id)),
            };
            if let Some(team_id) = body.team_id {
                if !m.involves(team_id) {
                    return error_response(&TournamentError::TeamNotInMatch(team_id));
                }
            }
            let map = match t
                .get_match_mut(path.match_id)
                .and_then(|m| m.get_map_mut(path.map_id))
            {
                Some(map) => map,
                None => return error_response(&TournamentError::MapNotFound(path.map_id)),
            };
            map.team_id = body.team_id;
        }

        if body.update_round_id {
            match body.round_id {
                Some(round_id) => {
                    let round = {
                        let rg = match rounds.read() {
                            Ok(guard) => guard,
                            Err(_) => return lock_error(),
                        };
                        match rg.get(&round_id) {
                            Some(r) => r.clone(),
                            None => {
                                return error_response(&TournamentError::RoundNotFound(round_id))
                            }
                        }
                    };
                    let map = match t
                        .get_match_mut(path.match_id)
                        .and_then(|m| m.get_map_mut(path.map_id))
                    {
                        Some(map) => map,
                        None => return error_response(&TournamentError::MapNotFound(path.map_id)),
                    };
                    map.round_id = Some(round_id);
                    match create_or_update_match_result(t, &round, path.match_id, path.map_id) {
                        Ok((_, w)) => {
                            warning = w;
                            results_changed = true;
                        }
                        Err(e) => return error_response(&e),
                    }
                }
                None => {
                    let map = match t
                        .get_match_mut(path.match_id)
                        .and_then(|m| m.get_map_mut(path.map_id))
                    {
                        Some(map) => map,
                        None => return error_response(&TournamentError::MapNotFound(path.map_id)),
                    };
                    map.round_id = None;
                    if delete_result_for_map(t, path.map_id) {
                        results_changed = true;
                    }
                }
            }
        }

        let map = match t.get_match(path.match_id).and_then(|m| m.get_map(path.map_id)) {
            Some(map) => map.clone(),
            None => return error_response(&TournamentError::MapNotFound(path.map_id)),
        };
        HttpResponse::Ok().json(serde_json::json!({
            "map": map,
            "team_mapping_warning": warning,
        }))
    };

    if results_changed {
        spawn_recalculation(state, path.id);
    }
    resp
}

/// Manually correct a result's team attribution, then recalculate.
#[put("/api/tournaments/{id}/match-results/{result_id}/override-teams")]
async fn api_override_teams(
    state: Tournaments,
    path: Path<TournamentResultPath>,
    body: Json<OverrideTeamsBody>,
) -> HttpResponse {
    let resp = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let t = match g.get_mut(&path.id) {
            Some(t) => t,
            None => return not_found_tournament(),
        };
        match override_team_mapping(t, path.result_id, body.team1_id, body.team2_id) {
            Ok(()) => HttpResponse::Ok().json(t.get_result(path.result_id)),
            Err(e) => return error_response(&e),
        }
    };
    spawn_recalculation(state, path.id);
    resp
}

/// Delete a match result, then recalculate.
#[delete("/api/tournaments/{id}/match-results/{result_id}")]
async fn api_delete_result(state: Tournaments, path: Path<TournamentResultPath>) -> HttpResponse {
    let resp = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let t = match g.get_mut(&path.id) {
            Some(t) => t,
            None => return not_found_tournament(),
        };
        match delete_match_result(t, path.result_id) {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(e) => return error_response(&e),
        }
    };
    spawn_recalculation(state, path.id);
    resp
}

/// Ranked team list for one week, or cumulative when `week` is omitted.
#[get("/api/tournaments/{id}/leaderboard")]
async fn api_leaderboard(
    state: Tournaments,
    path: Path<TournamentPath>,
    query: Query<LeaderboardQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let mut rows: Vec<LeaderboardRow> = t
        .rankings
        .iter()
        .filter(|r| r.week == query.week)
        .map(|r| LeaderboardRow {
            rank: r.rank,
            team_id: r.team_id,
            team_name: t
                .get_team(r.team_id)
                .map(|team| team.name.clone())
                .unwrap_or_default(),
            rounds_won: r.rounds_won,
            rounds_tied: r.rounds_tied,
            rounds_lost: r.rounds_lost,
            ticket_differential: r.ticket_differential,
            week: r.week.clone(),
        })
        .collect();
    rows.sort_by_key(|r| r.rank);
    HttpResponse::Ok().json(rows)
}

/// Manual synchronous recalculation trigger.
#[post("/api/tournaments/{id}/leaderboard/recalculate")]
async fn api_recalculate(state: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let total = recalculate_all_rankings(t);
    HttpResponse::Ok().json(serde_json::json!({
        "tournament_id": path.id,
        "total_rankings_updated": total,
        "updated_at": Utc::now(),
    }))
}

/// Remove results stranded by out-of-band map deletion, then recalculate.
#[post("/api/tournaments/{id}/maintenance/cleanup-orphaned-results")]
async fn api_cleanup_orphans(state: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found_tournament(),
    };
    let removed = cleanup_orphaned_match_results(t);
    let updated = recalculate_all_rankings(t);
    if removed > 0 {
        log::info!(
            "Removed {} orphaned match result(s) from tournament {}",
            removed,
            path.id
        );
    }
    HttpResponse::Ok().json(serde_json::json!({
        "orphaned_results_removed": removed,
        "rankings_updated": updated,
    }))
}

/// Ingest one completed round from game-server polling.
#[post("/api/rounds")]
async fn api_ingest_round(rounds: Rounds, body: Json<IngestRoundBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut round = Round::new(body.server, body.map_name);
    round.team1_label = body.team1_label;
    round.team2_label = body.team2_label;
    round.tickets1 = body.tickets1;
    round.tickets2 = body.tickets2;
    round.sessions = body.sessions;
    let id = round.id;
    let mut g = match rounds.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(id, round);
    HttpResponse::Ok().json(&g[&id])
}

/// Get a round by id.
#[get("/api/rounds/{id}")]
async fn api_get_round(rounds: Rounds, path: Path<RoundPath>) -> HttpResponse {
    let g = match rounds.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(r) => HttpResponse::Ok().json(r),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No round" })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let tournaments = Data::new(RwLock::new(HashMap::<TournamentId, Tournament>::new()));
    let rounds = Data::new(RwLock::new(HashMap::<RoundId, Round>::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(tournaments.clone())
            .app_data(rounds.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_create_team)
            .service(api_add_team_player)
            .service(api_delete_team)
            .service(api_create_match)
            .service(api_add_map)
            .service(api_delete_map)
            .service(api_update_map)
            .service(api_override_teams)
            .service(api_delete_result)
            .service(api_leaderboard)
            .service(api_recalculate)
            .service(api_cleanup_orphans)
            .service(api_ingest_round)
            .service(api_get_round)
    })
    .bind(bind)?
    .run()
    .await
}
