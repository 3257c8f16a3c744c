//! Repository for member data access operations.

use crate::entities::Member;
use crate::repos::MemberRepository;
use crate::types::{StorageError, StorageResult};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// SQLite-backed member repository over the `member` table.
#[derive(Clone)]
pub struct MemberStore {
    pool: SqlitePool,
}

impl MemberStore {
    /// Create a new member store on top of an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the pool the store queries through
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Shared by every read path; columns are read by name, never by position.
fn member_from_row(row: &SqliteRow) -> StorageResult<Member> {
    Ok(Member {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl MemberRepository for MemberStore {
    async fn save(&self, member: Member) -> StorageResult<Member> {
        // fetch_all steps the statement to completion so the insert commits
        let row = sqlx::query("INSERT INTO member (name) VALUES (?) RETURNING id")
            .bind(&member.name)
            .fetch_all(&self.pool)
            .await?
            .pop()
            .ok_or_else(|| {
                StorageError::KeyConversion("insert returned no generated key".to_string())
            })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StorageError::KeyConversion(e.to_string()))?;

        info!(member_id = id, name = %member.name, "saved member");

        Ok(Member {
            id: Some(id),
            ..member
        })
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Member>> {
        let rows = sqlx::query("SELECT id, name FROM member WHERE id = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        rows.first().map(member_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Option<Member>> {
        let rows = sqlx::query("SELECT id, name FROM member WHERE name = ?")
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        rows.first().map(member_from_row).transpose()
    }

    async fn find_all(&self) -> StorageResult<Vec<Member>> {
        let rows = sqlx::query("SELECT id, name FROM member")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(member_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqliteConnectOptions;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    async fn create_test_pool(schema: &str) -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_members.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();

        sqlx::query(schema).execute(&pool).await.unwrap();

        (pool, temp_dir)
    }

    const MEMBER_SCHEMA: &str = "CREATE TABLE member (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )";

    #[tokio::test]
    async fn test_save_assigns_generated_id() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        let member = store.save(Member::new("spring")).await.unwrap();
        assert_eq!(member.id, Some(1));
        assert_eq!(member.name, "spring");
    }

    #[tokio::test]
    async fn test_save_overwrites_caller_supplied_id() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        let member = Member {
            id: Some(42),
            name: "spring".to_string(),
        };
        let saved = store.save(member).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert!(store.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_round_trip() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        let saved = store.save(Member::new("spring")).await.unwrap();
        let found = store.find_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_returns_none() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        assert!(store.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_returns_any_match() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        store.save(Member::new("spring1")).await.unwrap();
        store.save(Member::new("twin")).await.unwrap();
        store.save(Member::new("twin")).await.unwrap();

        let found = store.find_by_name("twin").await.unwrap().unwrap();
        assert_eq!(found.name, "twin");
        assert!(matches!(found.id, Some(2) | Some(3)));

        assert!(store.find_by_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool);

        assert!(store.find_all().await.unwrap().is_empty());

        let first = store.save(Member::new("spring1")).await.unwrap();
        let second = store.save(Member::new("spring2")).await.unwrap();
        assert!(second.id > first.id);

        let mut members = store.find_all().await.unwrap();
        members.sort_by_key(|m| m.id);
        assert_eq!(members, vec![first, second]);
    }

    #[tokio::test]
    async fn test_unique_name_schema_surfaces_constraint_violation() {
        let (pool, _temp_dir) = create_test_pool(
            "CREATE TABLE member (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .await;
        let store = MemberStore::new(pool);

        store.save(Member::new("spring")).await.unwrap();
        let error = store.save(Member::new("spring")).await.unwrap_err();
        assert!(matches!(error, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_mismatched_column_type_is_decode_error() {
        let (pool, _temp_dir) = create_test_pool(
            "CREATE TABLE member (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .await;
        sqlx::query("INSERT INTO member (id, name) VALUES ('abc', 'spring')")
            .execute(&pool)
            .await
            .unwrap();
        let store = MemberStore::new(pool);

        let error = store.find_all().await.unwrap_err();
        assert!(matches!(error, StorageError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_error() {
        let (pool, _temp_dir) = create_test_pool(MEMBER_SCHEMA).await;
        let store = MemberStore::new(pool.clone());
        pool.close().await;

        let error = store.find_all().await.unwrap_err();
        assert!(matches!(error, StorageError::ConnectionError(_)));
    }
}
