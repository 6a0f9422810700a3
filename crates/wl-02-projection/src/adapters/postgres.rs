//! Postgres projection store.
//!
//! A newtype over [`PgPool`]. All SQL is runtime-checked (`sqlx::query`,
//! not `sqlx::query!`) so compilation never requires a live database.
//! Unique-constraint violations are detected via the driver's error kind
//! and surfaced as [`StoreError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use shared_types::{
    AccountId, AssetRecord, ContentHash, EnvelopeKind, LedgerEvent, PassRecord, PassStatus,
    PassSupply, SubmissionStatus, TopicId, World, WorldStatus, WorldType,
};

use crate::errors::StoreError;
use crate::ports::{ProjectionStore, WorldDraft};

/// Postgres-backed [`ProjectionStore`].
pub struct PgProjectionStore {
    pool: PgPool,
}

impl PgProjectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_event_tx(
        tx: &mut Transaction<'_, Postgres>,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO world_ledger_events
                (id, entity_id, topic_id, event_type, sequence_number,
                 consensus_timestamp, tx_ref, content_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(&event.entity_id)
        .bind(event.topic_id.as_str())
        .bind(event.event_type.as_str())
        .bind(event.sequence_number as i64)
        .bind(&event.consensus_timestamp)
        .bind(&event.tx_ref)
        .bind(event.content_hash.to_string())
        .bind(event.created_at)
        .execute(&mut **tx)
        .await
        .map_err(map_db)?;
        Ok(())
    }
}

#[async_trait]
impl ProjectionStore for PgProjectionStore {
    async fn find_pass_by_natural_key(
        &self,
        world_id: &str,
        name: &str,
    ) -> Result<Option<PassRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT * FROM world_passes WHERE world_id = $1 AND name = $2 LIMIT 1",
        )
        .bind(world_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db)?;

        row.map(|r| pass_from_row(&r)).transpose()
    }

    async fn get_world(&self, world_id: &str) -> Result<Option<World>, StoreError> {
        let row = sqlx::query("SELECT * FROM worlds WHERE id = $1")
            .bind(world_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db)?;

        row.map(|r| world_from_row(&r)).transpose()
    }

    async fn upsert_world_pending(&self, draft: &WorldDraft) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO worlds (id, issuer_id, name, world_type, description, status, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'PENDING', now())
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                world_type = EXCLUDED.world_type,
                description = EXCLUDED.description,
                status = 'PENDING',
                updated_at = now()
            "#,
        )
        .bind(&draft.id)
        .bind(draft.issuer_id.to_string())
        .bind(&draft.name)
        .bind(draft.world_type.as_str())
        .bind(&draft.description)
        .execute(&self.pool)
        .await
        .map_err(map_db)?;

        debug!(world_id = %draft.id, "World staged at PENDING");
        Ok(())
    }

    async fn record_world_live(
        &self,
        world_id: &str,
        topic_id: &TopicId,
        published_at: DateTime<Utc>,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;

        let updated = sqlx::query(
            r#"
            UPDATE worlds
            SET status = 'LIVE', topic_id = $1, published_at = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(topic_id.as_str())
        .bind(published_at)
        .bind(world_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db)?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: format!("world {world_id}"),
            });
        }

        Self::insert_event_tx(&mut tx, event).await?;
        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn record_pass_minted(
        &self,
        pass: &PassRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        insert_pass_tx(&mut tx, pass).await?;
        Self::insert_event_tx(&mut tx, event).await?;
        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn record_pass_degraded(&self, pass: &PassRecord) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        insert_pass_tx(&mut tx, pass).await?;
        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn record_asset_inscribed(
        &self,
        asset: &AssetRecord,
        event: &LedgerEvent,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        insert_asset(&mut *tx, asset).await?;
        Self::insert_event_tx(&mut tx, event).await?;
        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn record_asset_degraded(&self, asset: &AssetRecord) -> Result<(), StoreError> {
        insert_asset(&self.pool, asset).await
    }

    async fn insert_ledger_event(&self, event: &LedgerEvent) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        Self::insert_event_tx(&mut tx, event).await?;
        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn latest_ledger_event(&self) -> Result<Option<LedgerEvent>, StoreError> {
        let row = sqlx::query(
            "SELECT * FROM world_ledger_events ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db)?;

        row.map(|r| event_from_row(&r)).transpose()
    }
}

async fn insert_asset<'e, E>(executor: E, asset: &AssetRecord) -> Result<(), StoreError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO world_assets
            (id, world_id, issuer_id, asset_type, file_name, mime_type,
             size_bytes, content_hash, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(&asset.id)
    .bind(&asset.world_id)
    .bind(asset.issuer_id.to_string())
    .bind(&asset.asset_type)
    .bind(&asset.file_name)
    .bind(&asset.mime_type)
    .bind(asset.size_bytes as i64)
    .bind(asset.content_hash.to_string())
    .bind(asset.created_at)
    .execute(executor)
    .await
    .map_err(map_db)?;
    Ok(())
}

async fn insert_pass_tx(
    tx: &mut Transaction<'_, Postgres>,
    pass: &PassRecord,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO world_passes
            (id, world_id, issuer_id, name, description, image_url,
             supply_type, supply_cap, status, event_id, submission_status,
             topic_id, sequence_number, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(pass.id)
    .bind(&pass.world_id)
    .bind(pass.issuer_id.to_string())
    .bind(&pass.name)
    .bind(&pass.description)
    .bind(&pass.image_url)
    .bind(pass.supply.type_str())
    .bind(pass.supply.cap().map(|c| c as i32))
    .bind(pass.status.as_str())
    .bind(&pass.event_id)
    .bind(pass.submission_status.as_str())
    .bind(pass.topic_id.as_ref().map(|t| t.as_str().to_string()))
    .bind(pass.sequence_number.map(|n| n as i64))
    .bind(pass.created_at)
    .bind(pass.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(map_db)?;
    Ok(())
}

/// Map a driver error, pulling unique violations out as typed conflicts.
fn map_db(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict {
                constraint: db.constraint().unwrap_or("unique").to_string(),
            };
        }
    }
    StoreError::Database {
        message: e.to_string(),
    }
}

fn decode_err(message: impl Into<String>) -> StoreError {
    StoreError::RowDecode {
        message: message.into(),
    }
}

fn get<'a, T>(row: &'a sqlx::postgres::PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'a, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| decode_err(format!("{column}: {e}")))
}

fn parse_account(raw: String) -> Result<AccountId, StoreError> {
    raw.parse()
        .map_err(|_| decode_err(format!("issuer_id: {raw}")))
}

fn parse_world_type(raw: &str) -> Result<WorldType, StoreError> {
    Ok(match raw {
        "ARTIST" => WorldType::Artist,
        "LABEL" => WorldType::Label,
        "BRAND" => WorldType::Brand,
        "COMMUNITY" => WorldType::Community,
        "OTHER" => WorldType::Other,
        other => return Err(decode_err(format!("world_type: {other}"))),
    })
}

fn parse_world_status(raw: &str) -> Result<WorldStatus, StoreError> {
    Ok(match raw {
        "DRAFT" => WorldStatus::Draft,
        "PENDING" => WorldStatus::Pending,
        "LIVE" => WorldStatus::Live,
        other => return Err(decode_err(format!("status: {other}"))),
    })
}

fn parse_pass_status(raw: &str) -> Result<PassStatus, StoreError> {
    Ok(match raw {
        "DRAFT" => PassStatus::Draft,
        "ACTIVE" => PassStatus::Active,
        "REVOKED" => PassStatus::Revoked,
        other => return Err(decode_err(format!("status: {other}"))),
    })
}

fn parse_submission_status(raw: &str) -> Result<SubmissionStatus, StoreError> {
    Ok(match raw {
        "PENDING" => SubmissionStatus::Pending,
        "CONFIRMED" => SubmissionStatus::Confirmed,
        "FAILED" => SubmissionStatus::Failed,
        other => return Err(decode_err(format!("submission_status: {other}"))),
    })
}

fn parse_event_type(raw: &str) -> Result<EnvelopeKind, StoreError> {
    Ok(match raw {
        "WORLD_META" => EnvelopeKind::Meta,
        "WORLD_CONTENT" => EnvelopeKind::Content,
        "WORLD_SIGNAL" => EnvelopeKind::Signal,
        "WORLD_PASS" => EnvelopeKind::Pass,
        other => return Err(decode_err(format!("event_type: {other}"))),
    })
}

fn parse_supply(supply_type: &str, cap: Option<i32>) -> Result<PassSupply, StoreError> {
    match supply_type {
        "INFINITE" => Ok(PassSupply::Infinite),
        "FINITE" => {
            let cap = cap.ok_or_else(|| decode_err("supply_cap missing for FINITE"))?;
            Ok(PassSupply::Finite { cap: cap as u32 })
        }
        other => Err(decode_err(format!("supply_type: {other}"))),
    }
}

fn world_from_row(row: &sqlx::postgres::PgRow) -> Result<World, StoreError> {
    Ok(World {
        id: get(row, "id")?,
        issuer_id: parse_account(get::<String>(row, "issuer_id")?)?,
        name: get(row, "name")?,
        world_type: parse_world_type(&get::<String>(row, "world_type")?)?,
        description: get(row, "description")?,
        status: parse_world_status(&get::<String>(row, "status")?)?,
        topic_id: get::<Option<String>>(row, "topic_id")?.map(TopicId::new),
        published_at: get(row, "published_at")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn pass_from_row(row: &sqlx::postgres::PgRow) -> Result<PassRecord, StoreError> {
    Ok(PassRecord {
        id: get::<Uuid>(row, "id")?,
        world_id: get(row, "world_id")?,
        issuer_id: parse_account(get::<String>(row, "issuer_id")?)?,
        name: get(row, "name")?,
        description: get(row, "description")?,
        image_url: get(row, "image_url")?,
        supply: parse_supply(
            &get::<String>(row, "supply_type")?,
            get::<Option<i32>>(row, "supply_cap")?,
        )?,
        status: parse_pass_status(&get::<String>(row, "status")?)?,
        event_id: get(row, "event_id")?,
        submission_status: parse_submission_status(&get::<String>(row, "submission_status")?)?,
        topic_id: get::<Option<String>>(row, "topic_id")?.map(TopicId::new),
        sequence_number: get::<Option<i64>>(row, "sequence_number")?.map(|n| n as u64),
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn event_from_row(row: &sqlx::postgres::PgRow) -> Result<LedgerEvent, StoreError> {
    let content_hash: String = get(row, "content_hash")?;
    Ok(LedgerEvent {
        id: get::<Uuid>(row, "id")?,
        entity_id: get(row, "entity_id")?,
        topic_id: TopicId::new(get::<String>(row, "topic_id")?),
        event_type: parse_event_type(&get::<String>(row, "event_type")?)?,
        sequence_number: get::<i64>(row, "sequence_number")? as u64,
        consensus_timestamp: get(row, "consensus_timestamp")?,
        tx_ref: get(row, "tx_ref")?,
        content_hash: content_hash
            .parse::<ContentHash>()
            .map_err(|_| decode_err(format!("content_hash: {content_hash}")))?,
        created_at: get(row, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supply_variants() {
        assert_eq!(
            parse_supply("FINITE", Some(100)).unwrap(),
            PassSupply::Finite { cap: 100 }
        );
        assert_eq!(parse_supply("INFINITE", None).unwrap(), PassSupply::Infinite);
        assert!(parse_supply("FINITE", None).is_err());
        assert!(parse_supply("WEEKLY", Some(1)).is_err());
    }

    #[test]
    fn test_parse_status_round_trips() {
        for status in [WorldStatus::Draft, WorldStatus::Pending, WorldStatus::Live] {
            assert_eq!(parse_world_status(status.as_str()).unwrap(), status);
        }
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Confirmed,
            SubmissionStatus::Failed,
        ] {
            assert_eq!(parse_submission_status(status.as_str()).unwrap(), status);
        }
        assert!(parse_world_status("SHIPPED").is_err());
    }

    #[test]
    fn test_parse_event_type_round_trips() {
        for kind in [
            EnvelopeKind::Meta,
            EnvelopeKind::Content,
            EnvelopeKind::Signal,
            EnvelopeKind::Pass,
        ] {
            assert_eq!(parse_event_type(kind.as_str()).unwrap(), kind);
        }
    }
}
