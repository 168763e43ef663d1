use actix_web::web::Either;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error};
use utoipa::IntoParams;

use crate::error::ClockError;
use crate::model::punch::RawPunch;
use crate::normalize::normalize;
use crate::store::{self, SummaryLocks, UpsertOutcome};

/// Query-string surface of the clock endpoint: an optional `action`
/// selector plus the punch fields (devices punch over plain GET).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClockQuery {
    /// `punch` (default when an employee code is present), `getData`
    /// or `getSummary`.
    pub action: Option<String>,
    pub timestamp: Option<String>,
    #[serde(alias = "employeeNumber")]
    pub employee_code: Option<String>,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub device_id: Option<String>,
}

impl ClockQuery {
    fn has_employee_code(&self) -> bool {
        self.employee_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }

    fn into_raw(self) -> RawPunch {
        RawPunch {
            timestamp: self.timestamp,
            employee_code: self.employee_code,
            employee_name: self.employee_name,
            department: self.department,
            date: self.date,
            time: self.time,
            kind: self.kind,
            device_id: self.device_id,
        }
    }
}

fn failure(err: &ClockError) -> HttpResponse {
    // always HTTP 200; clients only look at the envelope
    HttpResponse::Ok().json(json!({ "success": false, "error": err.to_string() }))
}

fn unknown_action() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": false, "error": "unknown action" }))
}

/// Clock endpoint, GET side. Dispatches on the `action` query parameter;
/// a request carrying an employee code and no action is treated as a punch.
#[utoipa::path(
    get,
    path = "/api/clock",
    params(ClockQuery),
    responses(
        (status = 200, description = "Envelope with success flag; data for getData/getSummary", body = Object, example = json!({
            "success": true,
            "message": "punch recorded"
        }))
    ),
    tag = "Clock"
)]
pub async fn clock_get(
    pool: web::Data<SqlitePool>,
    locks: web::Data<SummaryLocks>,
    query: web::Query<ClockQuery>,
) -> impl Responder {
    let query = query.into_inner();
    match query.action.as_deref() {
        Some("punch") => ingest(&pool, &locks, query.into_raw()).await,
        Some("getData") => match store::fetch_log(&pool).await {
            Ok(rows) => HttpResponse::Ok().json(json!({ "success": true, "data": rows })),
            Err(e) => {
                error!(error = %e, "punch log fetch failed");
                failure(&e)
            }
        },
        Some("getSummary") => match store::fetch_summaries(&pool).await {
            Ok(rows) => HttpResponse::Ok().json(json!({ "success": true, "data": rows })),
            Err(e) => {
                error!(error = %e, "summary fetch failed");
                failure(&e)
            }
        },
        None if query.has_employee_code() => ingest(&pool, &locks, query.into_raw()).await,
        _ => unknown_action(),
    }
}

/// Clock endpoint, POST side. Body is JSON or form-url-encoded punch
/// fields; always routed as a punch.
#[utoipa::path(
    post,
    path = "/api/clock",
    request_body = RawPunch,
    responses(
        (status = 200, description = "Punch recorded (or envelope failure)", body = Object, example = json!({
            "success": true,
            "message": "punch recorded"
        }))
    ),
    tag = "Clock"
)]
pub async fn clock_post(
    pool: web::Data<SqlitePool>,
    locks: web::Data<SummaryLocks>,
    body: Either<web::Json<RawPunch>, web::Form<RawPunch>>,
) -> impl Responder {
    let raw = match body {
        Either::Left(json_body) => json_body.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    ingest(&pool, &locks, raw).await
}

/// Normalize, append to the log, then upsert the day's summary. The log
/// append is not rolled back if the upsert fails afterwards.
async fn ingest(pool: &SqlitePool, locks: &SummaryLocks, raw: RawPunch) -> HttpResponse {
    let punch = normalize(raw);

    if let Err(e) = store::append_log(pool, &punch).await {
        error!(error = %e, employee_code = %punch.employee_code, "punch log append failed");
        return failure(&e);
    }

    match store::upsert_summary(pool, locks, &punch).await {
        Ok(UpsertOutcome::Applied) => {}
        Ok(UpsertOutcome::Skipped) => {
            debug!(employee_code = %punch.employee_code, "punch logged without summary");
        }
        Err(e) => {
            error!(error = %e, employee_code = %punch.employee_code, "summary upsert failed");
            return failure(&e);
        }
    }

    HttpResponse::Ok().json(json!({ "success": true, "message": "punch recorded" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use actix_web::{App, test};
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    macro_rules! test_app {
        ($pool:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($pool.clone()))
                    .app_data(web::Data::new(SummaryLocks::new()))
                    .service(
                        web::resource("/api/clock")
                            .route(web::get().to(clock_get))
                            .route(web::post().to(clock_post)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn get_punch_action_records_and_summarizes() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/clock?action=punch&employeeCode=0101&date=20260113&time=08:30:02&type=checkin")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getSummary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"][0]["employeeCode"], "0101");
        assert_eq!(body["data"][0]["date"], "2026-01-13");
        assert_eq!(body["data"][0]["checkIn"], "08:30:02");
    }

    #[actix_web::test]
    async fn get_without_action_but_with_code_is_a_punch() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/clock?employeeNumber=0042&date=2026-01-13&time=09:00&type=checkin")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getData")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["employeeCode"], "0042");
        assert_eq!(body["data"][0]["typeLabel"], "出勤");
    }

    #[actix_web::test]
    async fn unknown_action_fails_in_the_envelope() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/clock?action=frobnicate")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["error"], "unknown action");
    }

    #[actix_web::test]
    async fn post_accepts_json_body() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::post()
            .uri("/api/clock")
            .set_json(serde_json::json!({
                "employeeCode": "0101",
                "date": "2026/1/13",
                "time": "17:31:40",
                "type": "checkout",
                "deviceId": "entrance-01"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getSummary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["checkOut"], "17:31:40");
        assert_eq!(body["data"][0]["deviceId"], "entrance-01");
    }

    #[actix_web::test]
    async fn post_accepts_form_body() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::post()
            .uri("/api/clock")
            .set_form([
                ("employeeNumber", "0101"),
                ("date", "2026-01-13"),
                ("time", "12:00:00"),
                ("type", "goout"),
            ])
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getSummary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["goOut1"], "12:00:00");
    }

    #[actix_web::test]
    async fn punch_without_code_still_logs_but_never_summarizes() {
        let pool = test_pool().await;
        let app = test_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/clock?action=punch&date=2026-01-13&time=08:30&type=checkin")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getData")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/api/clock?action=getSummary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
