use sqlx::SqlitePool;

/// Executes query objects against the local SQLite database.
///
/// Each query is a plain struct with a `kanau::processor::Processor` impl on
/// this type, so call sites read as `db.process(GetNonceEntry { .. })`.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: SqlitePool,
}

impl DatabaseProcessor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
