/// All database primary keys except session ids are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Session ids are random UUIDs because they travel inside the session cookie.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
