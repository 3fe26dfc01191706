//! SQLite connection management and schema bootstrap

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lifesys_domain::{default_categories::DEFAULT_CATEGORIES, CategoryId};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| RepoError::database("connect", e))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    tracing::info!(database_url = %database_url, "Connected to SQLite");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        open_id TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        login_method TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        last_signed_in TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        token_hash TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS player_stats (
        user_id TEXT PRIMARY KEY NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        total_xp INTEGER NOT NULL DEFAULT 0 CHECK (total_xp >= 0),
        strength_xp INTEGER NOT NULL DEFAULT 0 CHECK (strength_xp >= 0),
        intelligence_xp INTEGER NOT NULL DEFAULT 0 CHECK (intelligence_xp >= 0),
        charisma_xp INTEGER NOT NULL DEFAULT 0 CHECK (charisma_xp >= 0),
        vitality_xp INTEGER NOT NULL DEFAULT 0 CHECK (vitality_xp >= 0),
        wisdom_xp INTEGER NOT NULL DEFAULT 0 CHECK (wisdom_xp >= 0),
        agility_xp INTEGER NOT NULL DEFAULT 0 CHECK (agility_xp >= 0),
        quests_completed INTEGER NOT NULL DEFAULT 0 CHECK (quests_completed >= 0),
        streak_days INTEGER NOT NULL DEFAULT 0 CHECK (streak_days >= 0),
        last_activity TEXT,
        revision INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS quests (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        difficulty TEXT NOT NULL CHECK (difficulty IN ('easy', 'medium', 'hard', 'epic')),
        attribute TEXT NOT NULL CHECK (attribute IN
            ('strength', 'intelligence', 'charisma', 'vitality', 'wisdom', 'agility')),
        xp_reward INTEGER NOT NULL CHECK (xp_reward BETWEEN 0 AND 10000),
        status TEXT NOT NULL DEFAULT 'active'
            CHECK (status IN ('active', 'completed', 'failed', 'cancelled')),
        due_date TEXT,
        completed_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK ((status = 'completed') = (completed_at IS NOT NULL))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_quests_user_status ON quests(user_id, status)",
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
        icon TEXT,
        color TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_default_name
        ON categories(name, type) WHERE user_id IS NULL
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category_id TEXT NOT NULL REFERENCES categories(id),
        type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
        amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
        description TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date)",
    r#"
    CREATE TABLE IF NOT EXISTS body_metrics (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        weight REAL NOT NULL CHECK (weight > 0),
        muscle_mass REAL CHECK (muscle_mass IS NULL OR muscle_mass >= 0),
        fat_percentage REAL CHECK (fat_percentage IS NULL OR fat_percentage BETWEEN 0 AND 100),
        photo_url TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_body_metrics_user_date ON body_metrics(user_id, date)",
];

/// Creates every table and index that does not exist yet.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("bootstrap_schema", e))?;
    }
    tracing::info!("Database schema initialized");
    Ok(())
}

/// Inserts the shared default categories that are missing. Returns how many
/// were added.
pub async fn seed_default_categories(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<u64, RepoError> {
    let mut inserted = 0;
    for def in DEFAULT_CATEGORIES {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories (id, user_id, name, type, icon, color, created_at)
            VALUES (?, NULL, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(CategoryId::new().to_string())
        .bind(def.name)
        .bind(def.category_type.as_str())
        .bind(def.icon)
        .bind(def.color)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("seed_default_categories", e))?;
        inserted += result.rows_affected();
    }
    if inserted > 0 {
        tracing::info!(count = inserted, "Seeded default categories");
    }
    Ok(inserted)
}
