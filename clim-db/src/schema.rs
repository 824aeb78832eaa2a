//! SQL schema definitions for the in-memory SQLite database.

/// Returns the full SQL schema as a single batch string.
///
/// - `stations` - inform id, ICAO id, name and position in the report
/// - `period_values` - one field value per source (`D` daily build, `M`
///   monthly summary message) and station. Trace amounts are flagged rather
///   than stored as a number; occurrences are `|`-separated compact dates.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS stations (
        inform_id INTEGER PRIMARY KEY,
        icao TEXT NOT NULL,
        name TEXT NOT NULL,
        position INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS period_values (
        source TEXT NOT NULL CHECK (source IN ('D', 'M')),
        inform_id INTEGER NOT NULL,
        field TEXT NOT NULL,
        value REAL NOT NULL,
        is_trace INTEGER NOT NULL DEFAULT 0,
        qc INTEGER NOT NULL,
        occurrences TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (source, inform_id, field)
    );
    CREATE INDEX IF NOT EXISTS idx_values_station ON period_values(inform_id);

    "#
}
