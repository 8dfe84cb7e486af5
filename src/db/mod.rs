#[cfg(test)]
pub mod memory;

use crate::error::StoreError;
use crate::models::{NewVote, OptionForm, VoteOption, VoteReceipt, VoteRow};
use crate::voting::window::UtcBounds;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite};
use std::time::Duration;
use uuid::Uuid;

/// Everything the kiosk, the options manager and the results view need from
/// the data store.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Active options in display order, ties broken by arrival.
    async fn active_options(&self) -> Result<Vec<VoteOption>, StoreError>;

    /// Every option in display order, ties broken by arrival.
    async fn all_options(&self) -> Result<Vec<VoteOption>, StoreError>;

    async fn option(&self, id: &str) -> Result<VoteOption, StoreError>;

    /// Appends a new option after the current last one.
    async fn create_option(&self, form: &OptionForm) -> Result<VoteOption, StoreError>;

    async fn update_option(&self, id: &str, form: &OptionForm) -> Result<VoteOption, StoreError>;

    async fn delete_option(&self, id: &str) -> Result<(), StoreError>;

    async fn record_vote(&self, vote: &NewVote) -> Result<VoteReceipt, StoreError>;

    /// Votes joined with their option labels, in arrival order.
    async fn votes_with_options(&self, bounds: UtcBounds) -> Result<Vec<VoteRow>, StoreError>;
}

pub struct Database {
    pool: SqlitePool,
}

/// Timestamps are kept as fixed-width RFC 3339 text so that string
/// comparison in SQL matches chronological order.
pub(crate) fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn decode_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {:?}: {}", raw, e)))
}

const OPTION_COLUMNS: &str =
    "id, text_pt, text_es, text_en, is_active, display_order, created_at, updated_at";

fn option_from_row(row: &SqliteRow) -> Result<VoteOption, StoreError> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(VoteOption {
        id: row.try_get("id")?,
        text_pt: row.try_get("text_pt")?,
        text_es: row.try_get("text_es")?,
        text_en: row.try_get("text_en")?,
        is_active: row.try_get("is_active")?,
        display_order: row.try_get("display_order")?,
        created_at: decode_ts(&created_at)?,
        updated_at: decode_ts(&updated_at)?,
    })
}

impl Database {
    /// Opens (and if needed creates) the database behind `db_url`.
    pub async fn connect(db_url: &str) -> Result<Self, StoreError> {
        if !db_url.contains(":memory:") && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// A private in-memory database. One connection that never expires,
    /// otherwise every pooled connection would see its own empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vote_options (
                id TEXT PRIMARY KEY,
                text_pt TEXT NOT NULL,
                text_es TEXT NOT NULL,
                text_en TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                display_order INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                vote_option_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                ip_address TEXT,
                request_id TEXT NOT NULL UNIQUE,
                FOREIGN KEY (vote_option_id) REFERENCES vote_options(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_created_at ON votes (created_at);")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn select_options(&self, active_only: bool) -> Result<Vec<VoteOption>, StoreError> {
        let filter = if active_only { "WHERE is_active = TRUE" } else { "" };
        let sql = format!(
            "SELECT {} FROM vote_options {} ORDER BY display_order ASC, created_at ASC, rowid ASC",
            OPTION_COLUMNS, filter
        );
        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(option_from_row)
            .collect()
    }

    /// Inserts a vote with an explicit creation time.
    pub async fn record_vote_at(
        &self,
        vote: &NewVote,
        created_at: DateTime<Utc>,
    ) -> Result<VoteReceipt, StoreError> {
        let option_exists = sqlx::query("SELECT 1 FROM vote_options WHERE id = ?")
            .bind(&vote.vote_option_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if !option_exists {
            return Err(StoreError::UnknownOption(vote.vote_option_id.clone()));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO votes (id, vote_option_id, created_at, ip_address, request_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(request_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&vote.vote_option_id)
        .bind(encode_ts(created_at))
        .bind(&vote.origin)
        .bind(vote.request_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Vote request {} already recorded", vote.request_id);
            Ok(VoteReceipt::Duplicate)
        } else {
            Ok(VoteReceipt::Recorded)
        }
    }

    /// Creates or replaces an administrator account.
    pub async fn upsert_admin(&self, email: &str, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO admin_users (email, password_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET password_hash = excluded.password_hash
            "#,
        )
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(encode_ts(Utc::now()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn admin_password_hash(&self, email: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT password_hash FROM admin_users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get("password_hash")?)),
            None => Ok(None),
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl VoteStore for Database {
    async fn active_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        self.select_options(true).await
    }

    async fn all_options(&self) -> Result<Vec<VoteOption>, StoreError> {
        self.select_options(false).await
    }

    async fn option(&self, id: &str) -> Result<VoteOption, StoreError> {
        let sql = format!("SELECT {} FROM vote_options WHERE id = ?", OPTION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        option_from_row(&row)
    }

    async fn create_option(&self, form: &OptionForm) -> Result<VoteOption, StoreError> {
        let max_order: i64 = sqlx::query("SELECT COALESCE(MAX(display_order), 0) AS max_order FROM vote_options")
            .fetch_one(&self.pool)
            .await?
            .try_get("max_order")?;

        // stored at millisecond precision; return what a later read sees
        let now = decode_ts(&encode_ts(Utc::now()))?;
        let option = VoteOption {
            id: Uuid::new_v4().to_string(),
            text_pt: form.text_pt.clone(),
            text_es: form.text_es.clone(),
            text_en: form.text_en.clone(),
            is_active: form.is_active,
            display_order: max_order + 1,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO vote_options (id, text_pt, text_es, text_en, is_active, display_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&option.id)
        .bind(&option.text_pt)
        .bind(&option.text_es)
        .bind(&option.text_en)
        .bind(option.is_active)
        .bind(option.display_order)
        .bind(encode_ts(option.created_at))
        .bind(encode_ts(option.updated_at))
        .execute(&self.pool)
        .await?;

        info!("Created vote option {} at position {}", option.id, option.display_order);
        Ok(option)
    }

    async fn update_option(&self, id: &str, form: &OptionForm) -> Result<VoteOption, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE vote_options
            SET text_pt = ?, text_es = ?, text_en = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&form.text_pt)
        .bind(&form.text_es)
        .bind(&form.text_en)
        .bind(form.is_active)
        .bind(encode_ts(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!("Updated vote option {}", id);
        self.option(id).await
    }

    async fn delete_option(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM vote_options WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!("Deleted vote option {}", id);
        Ok(())
    }

    async fn record_vote(&self, vote: &NewVote) -> Result<VoteReceipt, StoreError> {
        self.record_vote_at(vote, Utc::now()).await
    }

    async fn votes_with_options(&self, bounds: UtcBounds) -> Result<Vec<VoteRow>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT v.vote_option_id, o.text_pt, o.text_es, o.text_en
            FROM votes v
            INNER JOIN vote_options o ON o.id = v.vote_option_id
            WHERE 1 = 1
            "#,
        );
        if bounds.from.is_some() {
            sql.push_str(" AND v.created_at >= ?");
        }
        if bounds.to.is_some() {
            sql.push_str(" AND v.created_at <= ?");
        }
        sql.push_str(" ORDER BY v.created_at ASC, v.rowid ASC");

        let mut query = sqlx::query(&sql);
        if let Some(from) = bounds.from {
            query = query.bind(encode_ts(from));
        }
        if let Some(to) = bounds.to {
            query = query.bind(encode_ts(to));
        }

        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(VoteRow {
                    vote_option_id: row.try_get("vote_option_id")?,
                    text_pt: row.try_get("text_pt")?,
                    text_es: row.try_get("text_es")?,
                    text_en: row.try_get("text_en")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(pt: &str, active: bool) -> OptionForm {
        OptionForm {
            text_pt: pt.to_string(),
            text_es: format!("{} (es)", pt),
            text_en: format!("{} (en)", pt),
            is_active: active,
        }
    }

    fn vote_for(option_id: &str) -> NewVote {
        NewVote {
            vote_option_id: option_id.to_string(),
            request_id: Uuid::new_v4(),
            origin: None,
        }
    }

    #[tokio::test]
    async fn first_option_gets_order_one_then_max_plus_one() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        assert_eq!(a.display_order, 1);
        let b = db.create_option(&form("B", true)).await.unwrap();
        assert_eq!(b.display_order, 2);

        db.delete_option(&a.id).await.unwrap();
        let c = db.create_option(&form("C", true)).await.unwrap();
        assert_eq!(c.display_order, 3);
    }

    #[tokio::test]
    async fn created_option_matches_stored_row() {
        let db = Database::in_memory().await.unwrap();
        let created = db.create_option(&form("A", true)).await.unwrap();
        let stored = db.option(&created.id).await.unwrap();
        assert_eq!(created, stored);
        assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn voters_only_see_active_options_in_order() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        let b = db.create_option(&form("B", false)).await.unwrap();
        let c = db.create_option(&form("C", true)).await.unwrap();

        let active: Vec<String> = db.active_options().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(active, vec![a.id.clone(), c.id.clone()]);

        let all: Vec<String> = db.all_options().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(all, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn equal_display_order_keeps_arrival_order() {
        let db = Database::in_memory().await.unwrap();
        let now = encode_ts(Utc::now());
        for (id, order) in [("tie-1", 1), ("tie-2", 1), ("zero", 0)] {
            sqlx::query(
                "INSERT INTO vote_options (id, text_pt, text_es, text_en, is_active, display_order, created_at, updated_at) VALUES (?, 'x', 'x', 'x', TRUE, ?, ?, ?)",
            )
            .bind(id)
            .bind(order)
            .bind(&now)
            .bind(&now)
            .execute(db.pool())
            .await
            .unwrap();
        }
        let ids: Vec<String> = db.active_options().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["zero", "tie-1", "tie-2"]);
    }

    #[tokio::test]
    async fn update_overwrites_form_fields() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        let updated = db.update_option(&a.id, &form("A2", false)).await.unwrap();
        assert_eq!(updated.text_pt, "A2");
        assert!(!updated.is_active);
        assert_eq!(updated.display_order, a.display_order);
        assert!(updated.updated_at >= a.updated_at);

        let missing = db.update_option("nope", &form("x", true)).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_labels_are_accepted() {
        let db = Database::in_memory().await.unwrap();
        let option = db.create_option(&OptionForm::default()).await.unwrap();
        assert_eq!(option.text_pt, "");
        assert!(option.is_active);
    }

    #[tokio::test]
    async fn votes_need_an_existing_option() {
        let db = Database::in_memory().await.unwrap();
        let err = db.record_vote(&vote_for("ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn repeated_request_id_is_deduplicated() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        let vote = vote_for(&a.id);

        assert_eq!(db.record_vote(&vote).await.unwrap(), VoteReceipt::Recorded);
        assert_eq!(db.record_vote(&vote).await.unwrap(), VoteReceipt::Duplicate);

        let rows = db.votes_with_options(UtcBounds::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn joined_read_respects_inclusive_bounds() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        let b = db.create_option(&form("B", true)).await.unwrap();

        let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
        db.record_vote_at(&vote_for(&a.id), day(1, 10)).await.unwrap();
        db.record_vote_at(&vote_for(&b.id), day(2, 0)).await.unwrap();
        db.record_vote_at(&vote_for(&a.id), day(3, 23)).await.unwrap();
        db.record_vote_at(&vote_for(&a.id), day(4, 1)).await.unwrap();

        let bounds = UtcBounds {
            from: Some(day(2, 0)),
            to: Some(day(3, 23)),
        };
        let rows = db.votes_with_options(bounds).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.vote_option_id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
        assert_eq!(rows[0].text_en, "B (en)");

        let all = db.votes_with_options(UtcBounds::default()).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn deleting_an_option_drops_its_votes() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create_option(&form("A", true)).await.unwrap();
        db.record_vote(&vote_for(&a.id)).await.unwrap();
        db.delete_option(&a.id).await.unwrap();

        let rows = db.votes_with_options(UtcBounds::default()).await.unwrap();
        assert!(rows.is_empty());
        assert!(matches!(db.delete_option(&a.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn admin_emails_are_case_insensitive() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_admin(" Admin@Example.com ", "hash-1").await.unwrap();
        db.upsert_admin("admin@example.com", "hash-2").await.unwrap();
        assert_eq!(
            db.admin_password_hash("ADMIN@example.com").await.unwrap().as_deref(),
            Some("hash-2")
        );
        assert!(db.admin_password_hash("other@example.com").await.unwrap().is_none());
    }
}
