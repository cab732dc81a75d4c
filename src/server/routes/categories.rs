use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Category, Question,
    },
    pagination::paginate,
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, ApiResult, OrStatus},
        extract::{AppJson, AppPath, AppQuery},
    },
};

#[derive(Deserialize)]
struct NewCategory {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryCreated {
    success: bool,
    message: &'static str,
    new_category_id: i64,
    new_category_type: String,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

/// `{id: type}` lookup table sent alongside question listings.
pub fn categories_by_id(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResult<Json<CategoriesResponse>> {
    let mut conn = pool.acquire().await.or_status(ApiError::Internal)?;
    let categories = categories::get_all_categories(&mut conn)
        .await
        .or_status(ApiError::Internal)?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: categories_by_id(categories),
    }))
}

async fn create_category(
    State(pool): State<SqlitePool>,
    AppJson(new_category): AppJson<NewCategory>,
) -> ApiResult<Json<CategoryCreated>> {
    let kind = capitalize(&new_category.kind.ok_or(ApiError::UnprocessableEntity)?);

    let mut conn = pool
        .acquire()
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let id = categories::create_category(&mut conn, &kind)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    tracing::info!(id, kind = %kind, "Category created");

    Ok(Json(CategoryCreated {
        success: true,
        message: "Category created successfully",
        new_category_id: id,
        new_category_type: kind,
    }))
}

// An unknown category is not found; a known one without questions is an empty page.
async fn questions_for_category(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResult<Json<CategoryQuestions>> {
    let mut conn = pool.acquire().await.or_status(ApiError::Internal)?;
    let category = categories::get_category(&mut conn, id)
        .await
        .or_status(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;
    let selection = questions::get_questions_for_category(&mut conn, id)
        .await
        .or_status(ApiError::Internal)?;
    let total_questions = selection.len();

    Ok(Json(CategoryQuestions {
        success: true,
        questions: paginate(selection, page),
        total_questions,
        current_category: category.kind,
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route("/categories/{id}/questions", get(questions_for_category))
}
