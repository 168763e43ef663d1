use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::model::punch::{PunchEvent, PunchKind, RawPunch};

const DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"];

/// Single parse boundary: turn whatever the device sent into a fully
/// populated `PunchEvent`. Nothing here ever fails; each field degrades
/// independently to its empty default, because rejecting a punch from a
/// wall-mounted terminal loses data the employee cannot re-send.
pub fn normalize(raw: RawPunch) -> PunchEvent {
    let timestamp = match raw.timestamp.as_deref().map(str::trim) {
        Some(ts) if !ts.is_empty() => ts.to_string(),
        _ => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let date = raw
        .date
        .as_deref()
        .and_then(normalize_date)
        .or_else(|| date_of_timestamp(&timestamp))
        .unwrap_or_default();

    let token = trimmed(raw.kind);
    let kind =
        PunchKind::from_str(&token).unwrap_or_else(|_| PunchKind::Other(token.clone()));

    PunchEvent {
        timestamp,
        employee_code: trimmed(raw.employee_code),
        employee_name: trimmed(raw.employee_name),
        department: trimmed(raw.department),
        date,
        time: trimmed(raw.time),
        kind,
        device_id: trimmed(raw.device_id),
    }
}

fn trimmed(field: Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Canonicalize a date input to `YYYY-MM-DD`. Accepts compact, dashed and
/// slashed forms (month/day may be unpadded) and full ISO datetimes.
fn normalize_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    date_of_timestamp(s)
}

/// Date portion of an ISO datetime string, if it parses at all.
fn date_of_timestamp(s: &str) -> Option<String> {
    let s = s.trim();
    let date = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
        })
        .ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_date(date: &str) -> RawPunch {
        RawPunch {
            date: Some(date.to_string()),
            ..RawPunch::default()
        }
    }

    #[test]
    fn employee_code_keeps_leading_zeros() {
        let punch = normalize(RawPunch {
            employee_code: Some("0101".to_string()),
            ..RawPunch::default()
        });
        assert_eq!(punch.employee_code, "0101");
    }

    #[test]
    fn missing_employee_code_becomes_empty_string() {
        let punch = normalize(RawPunch::default());
        assert_eq!(punch.employee_code, "");
    }

    #[test]
    fn date_formats_all_canonicalize() {
        for input in ["20260113", "2026-01-13", "2026/1/13"] {
            let punch = normalize(raw_with_date(input));
            assert_eq!(punch.date, "2026-01-13", "input {input}");
        }
    }

    #[test]
    fn iso_datetime_accepted_as_date() {
        let punch = normalize(raw_with_date("2026-01-13T08:30:02Z"));
        assert_eq!(punch.date, "2026-01-13");
    }

    #[test]
    fn date_falls_back_to_timestamp() {
        let punch = normalize(RawPunch {
            timestamp: Some("2026-01-13T08:30:02.000Z".to_string()),
            date: Some("not a date".to_string()),
            ..RawPunch::default()
        });
        assert_eq!(punch.date, "2026-01-13");
    }

    #[test]
    fn unparseable_date_and_timestamp_degrade_to_empty() {
        let punch = normalize(RawPunch {
            timestamp: Some("junk".to_string()),
            date: Some("also junk".to_string()),
            ..RawPunch::default()
        });
        assert_eq!(punch.date, "");
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let punch = normalize(RawPunch::default());
        assert!(!punch.timestamp.is_empty());
        // and the derived date comes from that default
        assert!(!punch.date.is_empty());
    }

    #[test]
    fn canonical_kind_tokens_map_to_variants() {
        let cases = [
            ("checkin", PunchKind::CheckIn, "出勤"),
            ("checkout", PunchKind::CheckOut, "退勤"),
            ("goout", PunchKind::GoOut, "外出"),
            ("return", PunchKind::Return, "戻り"),
        ];
        for (token, kind, label) in cases {
            let punch = normalize(RawPunch {
                kind: Some(token.to_string()),
                ..RawPunch::default()
            });
            assert_eq!(punch.kind, kind);
            assert_eq!(punch.kind.label(), label);
        }
    }

    #[test]
    fn unknown_kind_token_passes_through_verbatim() {
        let punch = normalize(RawPunch {
            kind: Some("overtime-start".to_string()),
            ..RawPunch::default()
        });
        assert_eq!(punch.kind, PunchKind::Other("overtime-start".to_string()));
        assert_eq!(punch.kind.label(), "overtime-start");
    }

    #[test]
    fn free_text_fields_are_trimmed() {
        let punch = normalize(RawPunch {
            employee_name: Some("  山田 太郎 ".to_string()),
            department: Some(" 製造部".to_string()),
            time: Some("08:30:02 ".to_string()),
            device_id: Some(" entrance-01 ".to_string()),
            ..RawPunch::default()
        });
        assert_eq!(punch.employee_name, "山田 太郎");
        assert_eq!(punch.department, "製造部");
        assert_eq!(punch.time, "08:30:02");
        assert_eq!(punch.device_id, "entrance-01");
    }
}
