use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use std::sync::{Mutex, MutexGuard};
use crate::grid::rows_from_json;
use crate::schedule::{build_report, WeekReport};

/// Last uploaded grid, summarized
pub struct AppState {
    pub report: Mutex<Option<WeekReport>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(admin_password: String) -> Self {
        AppState {
            report: Mutex::new(None),
            admin_password,
        }
    }

    fn report(&self) -> Result<MutexGuard<'_, Option<WeekReport>>> {
        self.report
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("report state poisoned"))
    }
}

// Admin grid upload endpoint: body is a spreadsheets.get response
async fn upload_grid(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if password != state.admin_password {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    match rows_from_json(&body) {
        Ok(rows) => {
            let report = build_report(&rows);
            let days = report.days.len();
            let has_digest = report.digest().is_some();
            *state.report()? = Some(report);

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "days": days,
                "has_digest": has_digest,
            })))
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected grid upload");
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to read grid: {}", e)
            })))
        }
    }
}

// Plain-text digest of the last upload
async fn get_digest(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = state.report()?;

    match report.as_ref().and_then(WeekReport::digest) {
        Some(digest) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(digest)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Nothing to report"}))),
    }
}

// Full per-day tallies and ranges
async fn get_report(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = state.report()?;

    match report.as_ref() {
        Some(report) => Ok(HttpResponse::Ok().json(report)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No grid uploaded"}))),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/upload", web::post().to(upload_grid))
        .route("/api/digest", web::get().to(get_digest))
        .route("/api/report", web::get().to(get_report));
}

pub async fn start_server(port: u16, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(admin_password));

    tracing::info!(port, "starting web server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
