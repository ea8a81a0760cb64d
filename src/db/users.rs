//! Queries against the `users` table.

use serde_json::Value;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};

use super::StoreError;
use crate::api::types::{User, UserPatch};

type Result<T> = std::result::Result<T, StoreError>;

/// The one projection both operations share.
const SELECT_USER: &str =
    "SELECT id, username, display_name, email, role, bio FROM users WHERE id = ?";

/// Fetch a single user row, or `None` when the id matches nothing.
///
/// The id travels as text; `SQLite` column affinity converts it for the
/// comparison against the INTEGER key, so an id wider than `i64` simply
/// matches nothing.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(SELECT_USER)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Apply queued assignments to one row.
///
/// The SET clause is assembled from the fixed column enumeration only;
/// the id and every value travel as placeholders. Callers must not pass
/// an empty patch.
pub async fn apply_patch(pool: &SqlitePool, id: &str, patch: &UserPatch) -> Result<()> {
    debug_assert!(!patch.is_empty(), "apply_patch requires queued fields");

    let set_clause = patch
        .assignments
        .iter()
        .map(|(field, _)| format!("{} = ?", field.column()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE users SET {set_clause} WHERE id = ?");

    let mut query = sqlx::query(&sql);
    for (_, value) in &patch.assignments {
        query = bind_json(query, value);
    }

    query.bind(id).execute(pool).await?;

    Ok(())
}

/// Bind one JSON value with its own type.
///
/// `null` binds SQL NULL (distinct from an absent key, which never gets
/// this far). Arrays and objects bind as their compact JSON text; the
/// interface performs no schema validation, matching the storage
/// engine's own coercion rules.
fn bind_json<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::UserPatch;
    use crate::db::Database;
    use serde_json::json;

    async fn seeded_db() -> Database {
        let db = Database::in_memory().await.expect("in-memory db");
        sqlx::query(
            "INSERT INTO users (id, username, display_name, email, role, bio)
             VALUES (1, 'ada', 'Ada Lovelace', 'ada@example.com', 'admin', 'First programmer')",
        )
        .execute(db.pool())
        .await
        .expect("seed user");
        db
    }

    #[tokio::test]
    async fn get_returns_seeded_row() {
        let db = seeded_db().await;

        let user = fetch(&db, "1").await.expect("row should exist");
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "ada");
        assert_eq!(user.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.role.as_deref(), Some("admin"));
        assert_eq!(user.bio.as_deref(), Some("First programmer"));
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_id() {
        let db = seeded_db().await;
        assert!(fetch(&db, "42").await.is_none());
    }

    #[tokio::test]
    async fn get_matches_ids_with_leading_zeros() {
        // Affinity converts the text id before comparing, as the wire
        // contract's digit-only ids require.
        let db = seeded_db().await;
        assert!(fetch(&db, "0001").await.is_some());
    }

    #[tokio::test]
    async fn patch_updates_only_queued_fields() {
        let db = seeded_db().await;

        let patch = UserPatch::from_body(&json!({ "bio": "hello" }));
        apply_patch(db.pool(), "1", &patch).await.expect("update");

        let user = fetch(&db, "1").await.expect("row");
        assert_eq!(user.bio.as_deref(), Some("hello"));
        assert_eq!(user.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn patch_null_clears_column() {
        let db = seeded_db().await;

        let patch = UserPatch::from_body(&json!({ "email": null }));
        apply_patch(db.pool(), "1", &patch).await.expect("update");

        let user = fetch(&db, "1").await.expect("row");
        assert_eq!(user.email, None);
        assert_eq!(user.username, "ada");
    }

    #[tokio::test]
    async fn patch_sets_multiple_fields_at_once() {
        let db = seeded_db().await;

        let patch = UserPatch::from_body(&json!({
            "display_name": "Countess",
            "role": "editor",
        }));
        apply_patch(db.pool(), "1", &patch).await.expect("update");

        let user = fetch(&db, "1").await.expect("row");
        assert_eq!(user.display_name.as_deref(), Some("Countess"));
        assert_eq!(user.role.as_deref(), Some("editor"));
    }

    #[tokio::test]
    async fn patch_is_idempotent() {
        let db = seeded_db().await;

        let patch = UserPatch::from_body(&json!({ "bio": "same" }));
        apply_patch(db.pool(), "1", &patch).await.expect("first");
        let first = fetch(&db, "1").await.expect("row");
        apply_patch(db.pool(), "1", &patch).await.expect("second");
        let second = fetch(&db, "1").await.expect("row");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn patch_on_missing_id_affects_nothing() {
        let db = seeded_db().await;

        let patch = UserPatch::from_body(&json!({ "bio": "ghost" }));
        apply_patch(db.pool(), "42", &patch).await.expect("zero-row update is not an error");

        assert!(fetch(&db, "42").await.is_none());
        let user = fetch(&db, "1").await.expect("row");
        assert_eq!(user.bio.as_deref(), Some("First programmer"));
    }

    async fn fetch(db: &Database, id: &str) -> Option<User> {
        get(db.pool(), id).await.expect("query should succeed")
    }
}
