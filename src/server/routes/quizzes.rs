use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::Question,
    quiz::{self, CategoryFilter, QuizOutcome, QuizRound},
    server::{
        app::AppState,
        deserializers::FlexibleInt,
        error::{ApiError, ApiResult, OrStatus},
        extract::AppJson,
    },
};

// the frontend labels the "all categories" choice with this type
const ALL_CATEGORIES_TYPE: &str = "click";

#[derive(Deserialize)]
struct QuizCategory {
    id: Option<FlexibleInt>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct QuizBody {
    quiz_category: Option<QuizCategory>,
    previous_questions: Option<Vec<i64>>,
    num_correct: Option<i64>,
    #[serde(rename = "forceEnd")]
    force_end: Option<bool>,
}

impl QuizCategory {
    fn filter(&self) -> ApiResult<CategoryFilter> {
        let kind = self.kind.as_deref().ok_or(ApiError::UnprocessableEntity)?;
        match self.id {
            _ if kind == ALL_CATEGORIES_TYPE => Ok(CategoryFilter::All),
            Some(FlexibleInt(0)) => Ok(CategoryFilter::All),
            Some(FlexibleInt(id)) => Ok(CategoryFilter::Only(id)),
            None => Err(ApiError::UnprocessableEntity),
        }
    }
}

impl QuizBody {
    fn into_round(self) -> ApiResult<QuizRound> {
        let category = self
            .quiz_category
            .ok_or(ApiError::UnprocessableEntity)?
            .filter()?;
        Ok(QuizRound {
            category,
            previous_questions: self.previous_questions.unwrap_or_default(),
            num_correct: self.num_correct.unwrap_or(0),
            force_end: self.force_end.unwrap_or(false),
        })
    }
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<QuizBody>,
) -> ApiResult<Json<NextQuestion>> {
    let round = body.into_round()?;
    let question = match quiz::play_round(&pool, &round)
        .await
        .or_status(ApiError::UnprocessableEntity)?
    {
        QuizOutcome::Next(question) => Some(question),
        QuizOutcome::Finished { .. } => None,
    };

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_question))
}
