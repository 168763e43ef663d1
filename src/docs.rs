use crate::model::punch::RawPunch;
use crate::model::punch_log::LogRecord;
use crate::model::summary::SummaryRecord;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kintai Timeclock API",
        version = "1.0.0",
        description = r#"
## Timeclock punch-logging endpoint

Accepts punch events (**check-in**, **check-out**, **go-out**, **return**)
from client devices, appends each to an immutable punch log and maintains a
per-employee per-day attendance summary with two go-out/return slot pairs.

### Request surface
- `GET /api/clock?action=punch|getData|getSummary` with punch fields as
  query parameters (a request with an employee code and no action punches)
- `POST /api/clock` with a JSON or form-url-encoded punch body

### Response format
Every response is HTTP 200 with a `{"success": bool}` envelope; failures
carry a free-text `error` message, reads carry a `data` array.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(crate::api::clock::clock_get, crate::api::clock::clock_post),
    components(schemas(RawPunch, LogRecord, SummaryRecord)),
    tags(
        (name = "Clock", description = "Punch ingestion and attendance views"),
    )
)]
pub struct ApiDoc;
