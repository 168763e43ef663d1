use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::ClockError;
use crate::merge::apply_punch;
use crate::model::punch::PunchEvent;
use crate::model::punch_log::LogRecord;
use crate::model::summary::SummaryRecord;

const SELECT_SUMMARY: &str = r#"
    SELECT employee_code, date, timestamp, employee_name, department,
           check_in, check_out, go_out1, return1, go_out2, return2, device_id
    FROM attendance_summary
"#;

/// Outcome of a summary upsert. A skip is not a failure: punches without an
/// employee code or a usable date are logged but never aggregated.
#[derive(Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Applied,
    Skipped,
}

/// Per-(employee_code, date) async mutex registry. The summary upsert is a
/// read-then-write against the table store; holding the key's lock across
/// both halves prevents two concurrent punches from losing an update or
/// creating a duplicate row.
#[derive(Default)]
pub struct SummaryLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SummaryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn acquire(&self, employee_code: &str, date: &str) -> Arc<Mutex<()>> {
        let key = format!("{employee_code}|{date}");
        let mut map = self.inner.lock().await;
        // evict locks nobody holds anymore
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(
            map.entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

/// Append one punch to the immutable log. One row per event, never updated.
pub async fn append_log(pool: &SqlitePool, punch: &PunchEvent) -> Result<(), ClockError> {
    sqlx::query(
        r#"
        INSERT INTO punch_log
            (timestamp, employee_code, employee_name, department, date, time, type_label, device_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&punch.timestamp)
    .bind(&punch.employee_code)
    .bind(&punch.employee_name)
    .bind(&punch.department)
    .bind(&punch.date)
    .bind(&punch.time)
    .bind(punch.kind.label())
    .bind(&punch.device_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_log(pool: &SqlitePool) -> Result<Vec<LogRecord>, ClockError> {
    let rows = sqlx::query_as::<_, LogRecord>(
        r#"
        SELECT id, timestamp, employee_code, employee_name, department,
               date, time, type_label, device_id
        FROM punch_log
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_summaries(pool: &SqlitePool) -> Result<Vec<SummaryRecord>, ClockError> {
    let rows = sqlx::query_as::<_, SummaryRecord>(
        &format!("{SELECT_SUMMARY} ORDER BY date, employee_code"),
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Locate or create the (employee_code, date) summary row and merge the
/// punch into it. The whole read-merge-write runs under that key's lock.
pub async fn upsert_summary(
    pool: &SqlitePool,
    locks: &SummaryLocks,
    punch: &PunchEvent,
) -> Result<UpsertOutcome, ClockError> {
    if punch.employee_code.is_empty() || punch.date.is_empty() {
        debug!(
            employee_code = %punch.employee_code,
            date = %punch.date,
            "summary upsert skipped: missing key field"
        );
        return Ok(UpsertOutcome::Skipped);
    }

    let lock = locks.acquire(&punch.employee_code, &punch.date).await;
    let _guard = lock.lock().await;

    let existing = sqlx::query_as::<_, SummaryRecord>(
        &format!("{SELECT_SUMMARY} WHERE employee_code = ? AND date = ?"),
    )
    .bind(&punch.employee_code)
    .bind(&punch.date)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(mut record) => {
            apply_punch(&mut record, punch);
            sqlx::query(
                r#"
                UPDATE attendance_summary
                SET timestamp = ?, employee_name = ?, department = ?,
                    check_in = ?, check_out = ?,
                    go_out1 = ?, return1 = ?, go_out2 = ?, return2 = ?,
                    device_id = ?
                WHERE employee_code = ? AND date = ?
                "#,
            )
            .bind(&record.timestamp)
            .bind(&record.employee_name)
            .bind(&record.department)
            .bind(&record.check_in)
            .bind(&record.check_out)
            .bind(&record.go_out1)
            .bind(&record.return1)
            .bind(&record.go_out2)
            .bind(&record.return2)
            .bind(&record.device_id)
            .bind(&record.employee_code)
            .bind(&record.date)
            .execute(pool)
            .await?;
        }
        None => {
            let mut record = SummaryRecord::blank_for(punch);
            apply_punch(&mut record, punch);
            sqlx::query(
                r#"
                INSERT INTO attendance_summary
                    (employee_code, date, timestamp, employee_name, department,
                     check_in, check_out, go_out1, return1, go_out2, return2, device_id)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.employee_code)
            .bind(&record.date)
            .bind(&record.timestamp)
            .bind(&record.employee_name)
            .bind(&record.department)
            .bind(&record.check_in)
            .bind(&record.check_out)
            .bind(&record.go_out1)
            .bind(&record.return1)
            .bind(&record.go_out2)
            .bind(&record.return2)
            .bind(&record.device_id)
            .execute(pool)
            .await?;
        }
    }

    Ok(UpsertOutcome::Applied)
}
