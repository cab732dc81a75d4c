use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::users, User},
    pagination::paginate,
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, ApiResult, OrStatus},
        extract::{AppJson, AppQuery},
    },
};

#[derive(Deserialize)]
struct NewUser {
    username: Option<String>,
}

#[derive(Serialize)]
struct Leaderboard {
    success: bool,
    users: Vec<User>,
    total_users: usize,
}

#[derive(Serialize)]
struct UserCreated {
    success: bool,
    message: &'static str,
    new_user_id: i64,
    username: String,
}

async fn get_users(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResult<Json<Leaderboard>> {
    let mut conn = pool.acquire().await.or_status(ApiError::Internal)?;
    let selection = users::get_users_by_score(&mut conn)
        .await
        .or_status(ApiError::Internal)?;
    if selection.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_users = selection.len();

    Ok(Json(Leaderboard {
        success: true,
        users: paginate(selection, page),
        total_users,
    }))
}

async fn create_user(
    State(pool): State<SqlitePool>,
    AppJson(new_user): AppJson<NewUser>,
) -> ApiResult<Json<UserCreated>> {
    let username = new_user.username.ok_or(ApiError::UnprocessableEntity)?;

    let mut conn = pool
        .acquire()
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let id = users::create_user(&mut conn, &username, 0)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    tracing::info!(id, username = %username, "User created");

    Ok(Json(UserCreated {
        success: true,
        message: "User created successfully",
        new_user_id: id,
        username,
    }))
}

pub fn users_router() -> Router<AppState> {
    Router::new().route("/users", get(get_users).post(create_user))
}
