use sqlx::SqlitePool;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let pool = SqlitePool::connect(database_url)
        .await
        .expect("Failed to connect to database");
    init_schema(&pool).await.expect("Failed to create tables");
    pool
}

/// Both stores keep employee_code and date as TEXT: "0101" must never come
/// back as 101, and dates stay the literal strings the normalizer produced.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS punch_log (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp     TEXT NOT NULL,
            employee_code TEXT NOT NULL,
            employee_name TEXT NOT NULL,
            department    TEXT NOT NULL,
            date          TEXT NOT NULL,
            time          TEXT NOT NULL,
            type_label    TEXT NOT NULL,
            device_id     TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_summary (
            employee_code TEXT NOT NULL,
            date          TEXT NOT NULL,
            timestamp     TEXT NOT NULL,
            employee_name TEXT NOT NULL,
            department    TEXT NOT NULL,
            check_in      TEXT NOT NULL DEFAULT '',
            check_out     TEXT NOT NULL DEFAULT '',
            go_out1       TEXT NOT NULL DEFAULT '',
            return1       TEXT NOT NULL DEFAULT '',
            go_out2       TEXT NOT NULL DEFAULT '',
            return2       TEXT NOT NULL DEFAULT '',
            device_id     TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (employee_code, date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
