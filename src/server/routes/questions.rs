use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    pagination::paginate,
    server::{
        app::AppState,
        deserializers::{FlexibleInt, PageQuery},
        error::{ApiError, ApiResult, OrStatus},
        extract::{AppJson, AppPath, AppQuery},
    },
};

use super::categories::categories_by_id;

// every field is optional here so that a missing one is reported as 422, not as a parse error
#[derive(Deserialize)]
struct QuestionBody {
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<FlexibleInt>,
    category: Option<FlexibleInt>,
}

impl QuestionBody {
    fn into_new_question(self) -> ApiResult<NewQuestion> {
        match (self.question, self.answer, self.difficulty, self.category) {
            (
                Some(question),
                Some(answer),
                Some(FlexibleInt(difficulty)),
                Some(FlexibleInt(category)),
            ) => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(ApiError::UnprocessableEntity),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    new_question_id: i64,
    new_question: String,
    total_questions: i64,
}

#[derive(Serialize)]
struct QuestionUpdated {
    success: bool,
    updated_question_id: i64,
    question: Question,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    question_deleted_id: i64,
    total_questions: i64,
}

// An empty page here is not found, unlike search and per-category listings.
async fn get_questions(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResult<Json<QuestionsPage>> {
    let mut conn = pool.acquire().await.or_status(ApiError::BadRequest)?;
    let selection = questions::get_all_questions(&mut conn)
        .await
        .or_status(ApiError::BadRequest)?;
    let total_questions = selection.len();

    let page_questions = paginate(selection, page);
    if page_questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = categories::get_all_categories(&mut conn)
        .await
        .or_status(ApiError::BadRequest)?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: page_questions,
        total_questions,
        categories: categories_by_id(categories),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<QuestionBody>,
) -> ApiResult<Json<QuestionCreated>> {
    let new_question = body.into_new_question()?;

    let mut conn = pool
        .acquire()
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let id = questions::create_question(&mut conn, &new_question)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let total_questions = questions::count_questions(&mut conn)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    tracing::info!(id, category = new_question.category, "Question created");

    Ok(Json(QuestionCreated {
        success: true,
        new_question_id: id,
        new_question: new_question.question,
        total_questions,
    }))
}

async fn update_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<QuestionBody>,
) -> ApiResult<Json<QuestionUpdated>> {
    let mut conn = pool.acquire().await.or_status(ApiError::Internal)?;
    questions::get_question_by_id(&mut conn, id)
        .await
        .or_status(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;

    let replacement = body.into_new_question()?;
    questions::update_question(&mut conn, id, &replacement)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let question = questions::get_question_by_id(&mut conn, id)
        .await
        .or_status(ApiError::UnprocessableEntity)?
        .ok_or(ApiError::UnprocessableEntity)?;
    tracing::info!(id, "Question updated");

    Ok(Json(QuestionUpdated {
        success: true,
        updated_question_id: id,
        question,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<QuestionDeleted>> {
    let mut conn = pool.acquire().await.or_status(ApiError::Internal)?;
    questions::get_question_by_id(&mut conn, id)
        .await
        .or_status(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;

    questions::delete_question(&mut conn, id)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    let total_questions = questions::count_questions(&mut conn)
        .await
        .or_status(ApiError::UnprocessableEntity)?;
    tracing::info!(id, "Question deleted");

    Ok(Json(QuestionDeleted {
        success: true,
        question_deleted_id: id,
        total_questions,
    }))
}

// An empty match is a successful empty page.
async fn search_questions(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
    AppJson(body): AppJson<SearchBody>,
) -> ApiResult<Json<SearchResults>> {
    let mut conn = pool.acquire().await.or_status(ApiError::NotFound)?;
    let selection = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => questions::search_questions(&mut conn, term).await,
        _ => questions::get_all_questions(&mut conn).await,
    }
    .or_status(ApiError::NotFound)?;
    let total_questions = selection.len();

    Ok(Json(SearchResults {
        success: true,
        questions: paginate(selection, page),
        total_questions,
        current_category: None,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route(
            "/questions/{id}",
            put(update_question).delete(delete_question),
        )
}
