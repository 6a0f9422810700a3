//! Projection schema.
//!
//! Startup migration for the Postgres projection. Idempotent: every
//! statement is `CREATE ... IF NOT EXISTS`, so the runtime can run it
//! unconditionally before serving.

use sqlx::PgPool;

use crate::errors::StoreError;

/// DDL statements in dependency order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS worlds (
        id TEXT PRIMARY KEY,
        issuer_id TEXT NOT NULL,
        name TEXT NOT NULL,
        world_type TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'DRAFT'
            CHECK (status IN ('DRAFT', 'PENDING', 'LIVE')),
        topic_id TEXT,
        published_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS world_passes (
        id UUID PRIMARY KEY,
        world_id TEXT REFERENCES worlds(id),
        issuer_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        image_url TEXT,
        supply_type TEXT NOT NULL CHECK (supply_type IN ('FINITE', 'INFINITE')),
        supply_cap INTEGER,
        status TEXT NOT NULL DEFAULT 'ACTIVE'
            CHECK (status IN ('DRAFT', 'ACTIVE', 'REVOKED')),
        event_id TEXT UNIQUE,
        submission_status TEXT NOT NULL DEFAULT 'PENDING'
            CHECK (submission_status IN ('PENDING', 'CONFIRMED', 'FAILED')),
        topic_id TEXT,
        sequence_number BIGINT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT unique_pass_name_per_world UNIQUE (world_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS world_assets (
        id TEXT PRIMARY KEY,
        world_id TEXT REFERENCES worlds(id),
        issuer_id TEXT NOT NULL,
        asset_type TEXT NOT NULL,
        file_name TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        size_bytes BIGINT NOT NULL,
        content_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS world_ledger_events (
        id UUID PRIMARY KEY,
        entity_id TEXT NOT NULL,
        topic_id TEXT NOT NULL,
        event_type TEXT NOT NULL,
        sequence_number BIGINT NOT NULL,
        consensus_timestamp TEXT NOT NULL,
        tx_ref TEXT NOT NULL,
        content_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_world_passes_world_id ON world_passes(world_id)",
    "CREATE INDEX IF NOT EXISTS idx_world_passes_issuer_id ON world_passes(issuer_id)",
    "CREATE INDEX IF NOT EXISTS idx_world_passes_event_id ON world_passes(event_id)",
    "CREATE INDEX IF NOT EXISTS idx_world_ledger_events_entity_id ON world_ledger_events(entity_id)",
];

/// Apply the schema to a fresh or existing database.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Database {
                message: e.to_string(),
            })?;
    }
    Ok(())
}
