use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::display::RECENT_HISTORY;
use crate::error::RotaError;
use crate::rotation::{Assignment, ChoreStatus, RotationState};
use crate::store::save_state;

// The rotation is owned here and every request takes the lock for its whole run
pub struct AppState {
    pub rotation: Mutex<RotationState>,
    pub state_path: Option<PathBuf>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(rotation: RotationState, state_path: Option<PathBuf>, admin_password: String) -> Self {
        AppState {
            rotation: Mutex::new(rotation),
            state_path,
            admin_password,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RotationState>> {
        self.rotation
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("rotation state is poisoned"))
    }
}

#[derive(Deserialize)]
pub struct NameRequest {
    name: String,
}

#[derive(Deserialize)]
pub struct JumpRequest {
    cycle: u32,
    week: u32,
}

#[derive(Deserialize)]
pub struct SeedRequest {
    seed: Option<i64>,
}

#[derive(Serialize)]
pub struct PersonView {
    name: String,
    completed: Vec<String>,
    recent_history: Vec<String>,
    chores: Vec<ChoreCell>,
}

#[derive(Serialize)]
pub struct ChoreCell {
    chore: String,
    status: ChoreStatus,
}

#[derive(Serialize)]
pub struct StateResponse {
    cycle: u32,
    week: u32,
    seed: i64,
    start_date: Option<String>,
    catalog: Vec<String>,
    assignments: Vec<Assignment>,
    people: Vec<PersonView>,
}

impl StateResponse {
    fn from_state(state: &RotationState) -> Self {
        let people = state
            .roster()
            .iter()
            .map(|person| PersonView {
                name: person.clone(),
                completed: state
                    .completed(person)
                    .map(|done| done.iter().cloned().collect())
                    .unwrap_or_default(),
                recent_history: state.recent_history(person, RECENT_HISTORY).to_vec(),
                chores: state
                    .catalog()
                    .iter()
                    .map(|chore| ChoreCell {
                        chore: chore.clone(),
                        status: state.status_of(person, chore),
                    })
                    .collect(),
            })
            .collect();

        StateResponse {
            cycle: state.cycle(),
            week: state.week(),
            seed: state.seed(),
            start_date: state.start_date().map(|d| d.format("%Y-%m-%d").to_string()),
            catalog: state.catalog().to_vec(),
            assignments: state.last_assignments().to_vec(),
            people,
        }
    }
}

fn error_response(err: &RotaError) -> HttpResponse {
    match err {
        RotaError::Io(_) | RotaError::Csv(_) => HttpResponse::InternalServerError()
            .json(serde_json::json!({"success": false, "error": err.to_string()})),
        _ => HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": err.to_string()})),
    }
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    password == state.admin_password
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

/// Runs one mutation under the lock, saves on success and answers with the new state.
fn mutate<F>(req: &HttpRequest, state: &AppState, op: F) -> Result<HttpResponse>
where
    F: FnOnce(&mut RotationState) -> Result<(), RotaError>,
{
    if !is_admin(req, state) {
        return Ok(unauthorized());
    }
    let mut rotation = state.lock()?;
    let outcome = op(&mut rotation);

    // A stuck person still leaves a valid week for everyone else, so it is saved too.
    if let Err(ref err) = outcome {
        if !matches!(err, RotaError::Assignment { .. }) {
            return Ok(error_response(err));
        }
    }
    if let Some(ref path) = state.state_path {
        if let Err(err) = save_state(path, &rotation) {
            warn!(error = %err, "failed to save rotation");
            return Ok(error_response(&err));
        }
    }
    match outcome {
        Ok(()) => Ok(HttpResponse::Ok().json(StateResponse::from_state(&rotation))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn get_state(state: web::Data<AppState>) -> Result<HttpResponse> {
    let rotation = state.lock()?;
    Ok(HttpResponse::Ok().json(StateResponse::from_state(&rotation)))
}

async fn assign(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.assign_week().map(|_| ()))
}

async fn jump(
    req: HttpRequest,
    body: web::Json<JumpRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.jump_to(body.cycle, body.week))
}

async fn today(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.jump_to_today().map(|_| ()))
}

async fn reset(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    mutate(&req, &state, |r| {
        r.reset_all();
        if r.is_configured() {
            r.assign_week()?;
        }
        Ok(())
    })
}

async fn set_seed(
    req: HttpRequest,
    body: web::Json<SeedRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| match body.seed {
        Some(seed) => r.set_seed(seed),
        None => r.set_random_seed().map(|_| ()),
    })
}

async fn add_person(
    req: HttpRequest,
    body: web::Json<NameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.add_person(&body.name))
}

async fn remove_person(
    req: HttpRequest,
    body: web::Json<NameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.remove_person(&body.name))
}

async fn add_chore(
    req: HttpRequest,
    body: web::Json<NameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.add_chore(&body.name))
}

async fn remove_chore(
    req: HttpRequest,
    body: web::Json<NameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.remove_chore(&body.name))
}

async fn export_settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let rotation = state.lock()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(rotation.export_text()))
}

async fn import_settings(
    req: HttpRequest,
    body: String,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    mutate(&req, &state, |r| r.import_text(&body))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/state", web::get().to(get_state))
        .route("/api/assign", web::post().to(assign))
        .route("/api/jump", web::post().to(jump))
        .route("/api/today", web::post().to(today))
        .route("/api/reset", web::post().to(reset))
        .route("/api/seed", web::post().to(set_seed))
        .route("/api/people", web::post().to(add_person))
        .route("/api/people", web::delete().to(remove_person))
        .route("/api/chores", web::post().to(add_chore))
        .route("/api/chores", web::delete().to(remove_chore))
        .route("/api/export", web::get().to(export_settings))
        .route("/api/import", web::post().to(import_settings));
}

pub async fn start_server(port: u16, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);
    info!(port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
