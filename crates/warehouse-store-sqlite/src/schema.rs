//! Star-schema DDL for the embedded SQLite warehouse.
//!
//! Applied once when a store is opened. Loaders never issue DDL; this only
//! provisions a fresh file the way an externally managed schema would.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS dim_time (
    date_key      INTEGER PRIMARY KEY,        -- YYYYMMDD
    full_date     TEXT    NOT NULL UNIQUE,    -- ISO 8601 date
    day_of_week   INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
    day_name      TEXT    NOT NULL,
    day_of_month  INTEGER NOT NULL,
    day_of_year   INTEGER NOT NULL,
    week_of_year  INTEGER NOT NULL,
    month         INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    month_name    TEXT    NOT NULL,
    quarter       INTEGER NOT NULL CHECK (quarter BETWEEN 1 AND 4),
    year          INTEGER NOT NULL,
    is_weekend    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dim_companies (
    company_key      INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id       TEXT    NOT NULL UNIQUE,
    company_name     TEXT    NOT NULL,
    industry         TEXT,
    company_size     TEXT,
    location         TEXT,
    is_product_based INTEGER NOT NULL DEFAULT 0
);

-- Self-referencing: level-1 rows have no parent, deeper rows always do.
CREATE TABLE IF NOT EXISTS dim_topics (
    topic_key        INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id         TEXT    NOT NULL UNIQUE,
    topic_name       TEXT    NOT NULL,
    parent_topic_key INTEGER REFERENCES dim_topics(topic_key),
    topic_level      INTEGER NOT NULL CHECK (topic_level >= 1),
    CHECK ((parent_topic_key IS NULL) = (topic_level = 1))
);

CREATE TABLE IF NOT EXISTS dim_round_types (
    round_type_key  INTEGER PRIMARY KEY AUTOINCREMENT,
    round_type_id   TEXT    NOT NULL UNIQUE,
    round_type_name TEXT    NOT NULL,
    round_sequence  INTEGER NOT NULL,
    description     TEXT
);

CREATE TABLE IF NOT EXISTS dim_questions (
    question_key  INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id   TEXT    NOT NULL UNIQUE,
    question_text TEXT    NOT NULL,
    topic_key     INTEGER NOT NULL REFERENCES dim_topics(topic_key),
    difficulty    TEXT    NOT NULL CHECK (difficulty IN ('Easy', 'Medium', 'Hard')),
    source        TEXT
);

-- Facts are append-only. (interview_round_id, round_position) identifies
-- one question slot within one sitting.
CREATE TABLE IF NOT EXISTS fact_interview_events (
    event_key             INTEGER PRIMARY KEY AUTOINCREMENT,
    company_key           INTEGER NOT NULL REFERENCES dim_companies(company_key),
    date_key              INTEGER NOT NULL REFERENCES dim_time(date_key),
    round_type_key        INTEGER NOT NULL REFERENCES dim_round_types(round_type_key),
    question_key          INTEGER NOT NULL REFERENCES dim_questions(question_key),
    interview_round_id    TEXT    NOT NULL,
    round_position        INTEGER NOT NULL CHECK (round_position >= 1),
    duration_minutes      INTEGER NOT NULL CHECK (duration_minutes > 0),
    result                TEXT    NOT NULL CHECK (result IN ('passed', 'failed')),
    difficulty_rating     INTEGER CHECK (difficulty_rating BETWEEN 1 AND 5),
    answer_quality_rating INTEGER CHECK (answer_quality_rating BETWEEN 1 AND 5),
    was_prepared          INTEGER NOT NULL,
    needed_hint           INTEGER NOT NULL,
    UNIQUE (interview_round_id, round_position)
);

CREATE INDEX IF NOT EXISTS topics_parent_idx    ON dim_topics(parent_topic_key);
CREATE INDEX IF NOT EXISTS questions_topic_idx  ON dim_questions(topic_key);
CREATE INDEX IF NOT EXISTS events_company_idx   ON fact_interview_events(company_key);
CREATE INDEX IF NOT EXISTS events_date_idx      ON fact_interview_events(date_key);
CREATE INDEX IF NOT EXISTS events_question_idx  ON fact_interview_events(question_key);

PRAGMA user_version = 1;
";
