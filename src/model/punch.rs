use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use utoipa::ToSchema;

/// Raw punch fields as they arrive on the wire (query string, JSON body or
/// form body). Every field is optional; devices send whatever they have.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawPunch {
    pub timestamp: Option<String>,

    /// Employee code; always treated as a string so "0101" keeps its zeros.
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

/// Kind of a punch. The four canonical wire tokens map onto the closed
/// variants; anything else is carried verbatim so future device firmware
/// doesn't get its events rejected (those bypass slot aggregation).
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum PunchKind {
    #[strum(serialize = "checkin")]
    CheckIn,
    #[strum(serialize = "checkout")]
    CheckOut,
    #[strum(serialize = "goout")]
    GoOut,
    #[strum(serialize = "return")]
    Return,
    #[strum(default)]
    Other(String),
}

impl PunchKind {
    /// Display label persisted in the punch log's type column.
    pub fn label(&self) -> &str {
        match self {
            Self::CheckIn => "出勤",
            Self::CheckOut => "退勤",
            Self::GoOut => "外出",
            Self::Return => "戻り",
            Self::Other(token) => token,
        }
    }
}

/// A fully-normalized punch event. Produced once at the parse boundary by
/// `normalize`; everything downstream consumes this and never re-checks
/// for missing fields.
#[derive(Debug, Clone)]
pub struct PunchEvent {
    pub timestamp: String,
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    /// Canonical `YYYY-MM-DD`, or "" when neither date nor timestamp parsed.
    pub date: String,
    /// Free-text clock time, typically `HH:MM:SS`; ordering only.
    pub time: String,
    pub kind: PunchKind,
    pub device_id: String,
}
