use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

/// A leaderboard row. One is written per finished quiz game.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub score: i64,
}

pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, score FROM users WHERE users.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn get_users_by_score(conn: &mut SqliteConnection) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, score FROM users ORDER BY score DESC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await
}

pub async fn create_user(
    conn: &mut SqliteConnection,
    username: &str,
    score: i64,
) -> sqlx::Result<i64> {
    let user_id = sqlx::query(
        r#"
        INSERT INTO users (username, score) VALUES (?1, ?2)
        "#,
    )
    .bind(username)
    .bind(score)
    .execute(conn)
    .await?
    .last_insert_rowid();

    Ok(user_id)
}

/// Writes a finished game as `"Player N"`, where `N` is `max(id) + 1`.
///
/// The label is computed inside the insert, so the write lock is taken before
/// the max is read and concurrent games queue on `busy_timeout` instead of
/// failing. Labels carry no uniqueness constraint.
pub async fn create_player(conn: &mut SqliteConnection, score: i64) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, score)
        SELECT 'Player ' || (COALESCE(MAX(id), 0) + 1), ?1 FROM users
        RETURNING id, username, score
        "#,
    )
    .bind(score)
    .fetch_one(conn)
    .await
}
