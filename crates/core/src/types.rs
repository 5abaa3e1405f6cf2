/// Client identifiers are lowercase slugs such as `acme-corp`.
pub type ClientId = String;

/// Surrogate primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
