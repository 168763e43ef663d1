use std::cmp::Ordering;

use crate::model::punch::{PunchEvent, PunchKind};
use crate::model::summary::SummaryRecord;

/// Compare two clock times as seconds since midnight. `HH:MM[:SS]`,
/// missing seconds count as 0. A side that fails to parse at least `HH:MM`,
/// or whose fields are too large to be a clock time, compares Equal, so a
/// malformed time never displaces a stored one.
pub fn compare_time(a: &str, b: &str) -> Ordering {
    match (seconds_of(a), seconds_of(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

fn seconds_of(s: &str) -> Option<u32> {
    let mut parts = s.trim().split(':');
    let h: u32 = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    let sec: u32 = match parts.next() {
        Some(v) => v.parse().ok()?,
        None => 0,
    };
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(sec)
}

/// Merge one punch into the day's summary record.
///
/// Slot rules: check-in keeps the earliest time, check-out the latest.
/// Go-out fills slot 1 then slot 2 (a second go-out before return 1 still
/// lands in slot 2); with both slots occupied the event is dropped. Return
/// closes the first slot with an open go-out, else is dropped. Unrecognized
/// kinds touch no slot.
///
/// Common fields apply on every punch: name/department first-write-wins,
/// device id and timestamp last-write-wins.
pub fn apply_punch(record: &mut SummaryRecord, punch: &PunchEvent) {
    let time = punch.time.clone();
    match &punch.kind {
        PunchKind::CheckIn => {
            if record.check_in.is_empty()
                || compare_time(&time, &record.check_in) == Ordering::Less
            {
                record.check_in = time;
            }
        }
        PunchKind::CheckOut => {
            if record.check_out.is_empty()
                || compare_time(&time, &record.check_out) == Ordering::Greater
            {
                record.check_out = time;
            }
        }
        PunchKind::GoOut => {
            if record.go_out1.is_empty() {
                record.go_out1 = time;
            } else if record.go_out2.is_empty() {
                record.go_out2 = time;
            }
            // both slots occupied: third go-out of the day, dropped
        }
        PunchKind::Return => {
            if !record.go_out1.is_empty() && record.return1.is_empty() {
                record.return1 = time;
            } else if !record.go_out2.is_empty() && record.return2.is_empty() {
                record.return2 = time;
            }
            // no open go-out: dropped
        }
        PunchKind::Other(_) => {}
    }

    if record.employee_name.is_empty() {
        record.employee_name = punch.employee_name.clone();
    }
    if record.department.is_empty() {
        record.department = punch.department.clone();
    }
    record.device_id = punch.device_id.clone();
    record.timestamp = punch.timestamp.clone();
}
