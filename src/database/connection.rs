use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    tracing::info!("connected to database");
    Ok(pool)
}

/// Creates the schema if it is not there yet. Safe to run on every startup.
const SCHEMA: &str = r#"
DO $$ BEGIN
    CREATE TYPE match_status AS ENUM ('scheduled', 'live', 'finished');
EXCEPTION WHEN duplicate_object THEN NULL;
END $$;

CREATE TABLE IF NOT EXISTS matches (
    id SERIAL PRIMARY KEY,
    sport TEXT NOT NULL,
    home_team TEXT NOT NULL,
    away_team TEXT NOT NULL,
    status match_status NOT NULL,
    start_time TIMESTAMPTZ NOT NULL,
    end_time TIMESTAMPTZ,
    home_score INTEGER NOT NULL DEFAULT 0,
    away_score INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS commentary (
    id SERIAL PRIMARY KEY,
    match_id INTEGER NOT NULL REFERENCES matches(id),
    minute INTEGER NOT NULL,
    sequence INTEGER,
    period INTEGER,
    event_type TEXT,
    actor TEXT,
    team TEXT,
    message TEXT,
    metadata JSONB,
    tags TEXT[],
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS commentary_match_created_idx
    ON commentary (match_id, created_at DESC);
"#;

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(SCHEMA).await?;
    tracing::info!("schema ready");
    Ok(())
}
