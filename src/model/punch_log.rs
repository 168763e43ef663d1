use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One immutable punch-log row, in arrival order. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[schema(example = 1)]
    pub id: i64,
    pub timestamp: String,
    #[schema(example = "0101")]
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    #[schema(example = "2026-01-13")]
    pub date: String,
    #[schema(example = "08:30:02")]
    pub time: String,
    /// Display label of the punch kind (出勤/退勤/外出/戻り, or the raw token).
    pub type_label: String,
    pub device_id: String,
}
