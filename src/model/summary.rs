use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::punch::PunchEvent;

/// Daily attendance summary, one row per (employee_code, date). Times are
/// kept as the free-text strings the device sent; slot fields are "" until
/// a punch fills them. Two go-out/return slot pairs are tracked; a third
/// go-out in the same day has no slot and is dropped.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "timestamp": "2026-01-13T08:30:02.000Z",
        "employeeCode": "0101",
        "employeeName": "山田 太郎",
        "department": "製造部",
        "date": "2026-01-13",
        "checkIn": "08:30:02",
        "checkOut": "17:31:40",
        "goOut1": "12:01:00",
        "return1": "12:58:12",
        "goOut2": "",
        "return2": "",
        "deviceId": "entrance-01"
    })
)]
pub struct SummaryRecord {
    pub timestamp: String,
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub go_out1: String,
    pub return1: String,
    pub go_out2: String,
    pub return2: String,
    pub device_id: String,
}

impl SummaryRecord {
    /// Blank-slot record for the first punch of an (employee, day) key.
    pub fn blank_for(punch: &PunchEvent) -> Self {
        Self {
            timestamp: punch.timestamp.clone(),
            employee_code: punch.employee_code.clone(),
            employee_name: punch.employee_name.clone(),
            department: punch.department.clone(),
            date: punch.date.clone(),
            check_in: String::new(),
            check_out: String::new(),
            go_out1: String::new(),
            return1: String::new(),
            go_out2: String::new(),
            return2: String::new(),
            device_id: punch.device_id.clone(),
        }
    }
}
