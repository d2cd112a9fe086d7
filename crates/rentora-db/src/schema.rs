//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as lowercase strings
//! with ASSERT constraints. Booking dates are stored as ISO `YYYY-MM-DD`
//! strings so that lexicographic comparison matches date order.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['tenant', 'landlord', 'administrator'];
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Listings
-- =======================================================================
DEFINE TABLE listing SCHEMAFULL;
DEFINE FIELD landlord_id ON TABLE listing TYPE string;
DEFINE FIELD title ON TABLE listing TYPE string;
DEFINE FIELD description ON TABLE listing TYPE string;
DEFINE FIELD location ON TABLE listing TYPE string;
DEFINE FIELD price_cents ON TABLE listing TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD rooms ON TABLE listing TYPE int ASSERT $value >= 0;
DEFINE FIELD housing_type ON TABLE listing TYPE string \
    ASSERT $value IN ['apartment', 'house', 'studio', 'room'];
DEFINE FIELD is_active ON TABLE listing TYPE bool DEFAULT true;
DEFINE FIELD cancellation_deadline_days ON TABLE listing TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_listing_landlord ON TABLE listing COLUMNS landlord_id;

-- =======================================================================
-- Bookings (dates as ISO strings; half-open ranges)
-- =======================================================================
DEFINE TABLE booking SCHEMAFULL;
DEFINE FIELD listing_id ON TABLE booking TYPE string;
DEFINE FIELD landlord_id ON TABLE booking TYPE string;
DEFINE FIELD tenant_id ON TABLE booking TYPE string;
DEFINE FIELD start_date ON TABLE booking TYPE string;
DEFINE FIELD end_date ON TABLE booking TYPE string;
DEFINE FIELD status ON TABLE booking TYPE string \
    ASSERT $value IN ['pending', 'confirmed', 'rejected', \
    'cancelled', 'checked'];
DEFINE FIELD cancellable_until ON TABLE booking TYPE string;
DEFINE FIELD created_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_booking_listing ON TABLE booking COLUMNS listing_id;
DEFINE INDEX idx_booking_tenant ON TABLE booking COLUMNS tenant_id;
DEFINE INDEX idx_booking_landlord ON TABLE booking COLUMNS landlord_id;

-- =======================================================================
-- Reviews (one per tenant per listing)
-- =======================================================================
DEFINE TABLE review SCHEMAFULL;
DEFINE FIELD listing_id ON TABLE review TYPE string;
DEFINE FIELD tenant_id ON TABLE review TYPE string;
DEFINE FIELD rating ON TABLE review TYPE int \
    ASSERT $value >= 1 AND $value <= 5;
DEFINE FIELD comment ON TABLE review TYPE option<string>;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_tenant_listing ON TABLE review \
    COLUMNS tenant_id, listing_id UNIQUE;

-- =======================================================================
-- Search history (per-user keyword counters)
-- =======================================================================
DEFINE TABLE search_history SCHEMAFULL;
DEFINE FIELD user_id ON TABLE search_history TYPE option<string>;
DEFINE FIELD keyword ON TABLE search_history TYPE string;
DEFINE FIELD search_count ON TABLE search_history TYPE int \
    DEFAULT 1;
DEFINE FIELD created_at ON TABLE search_history TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_search_user_keyword ON TABLE search_history \
    COLUMNS user_id, keyword UNIQUE;

-- =======================================================================
-- Listing views (per-viewer counters)
-- =======================================================================
DEFINE TABLE listing_view SCHEMAFULL;
DEFINE FIELD listing_id ON TABLE listing_view TYPE string;
DEFINE FIELD user_id ON TABLE listing_view TYPE option<string>;
DEFINE FIELD ip_address ON TABLE listing_view TYPE option<string>;
DEFINE FIELD view_count ON TABLE listing_view TYPE int DEFAULT 1;
DEFINE FIELD created_at ON TABLE listing_view TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_view_listing_user_ip ON TABLE listing_view \
    COLUMNS listing_id, user_id, ip_address UNIQUE;

-- =======================================================================
-- Revoked refresh tokens (append-only blacklist)
-- =======================================================================
DEFINE TABLE revoked_token SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete FULL;
DEFINE FIELD jti ON TABLE revoked_token TYPE string;
DEFINE FIELD user_id ON TABLE revoked_token TYPE string;
DEFINE FIELD expires_at ON TABLE revoked_token TYPE datetime;
DEFINE FIELD revoked_at ON TABLE revoked_token TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_revoked_jti ON TABLE revoked_token COLUMNS jti UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
