//! Question selection for the quiz loop.
//!
//! The server keeps no game state between calls. Every round carries the ids
//! already served and the running score, and a round that finds nothing left to
//! ask (or is told to stop) writes exactly one leaderboard row.

use rand::Rng;
use sqlx::SqlitePool;

use crate::db::queries::{questions, users};
use crate::db::{Question, User};
use crate::telemetry::{QUIZ_GAMES_FINISHED, QUIZ_QUESTIONS_SERVED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(i64),
}

impl CategoryFilter {
    fn id(self) -> Option<i64> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(id) => Some(id),
        }
    }

    fn label(self) -> String {
        match self {
            CategoryFilter::All => "all".to_owned(),
            CategoryFilter::Only(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizRound {
    pub category: CategoryFilter,
    pub previous_questions: Vec<i64>,
    pub num_correct: i64,
    pub force_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Exhausted,
    Forced,
}

impl EndReason {
    fn as_str(self) -> &'static str {
        match self {
            EndReason::Exhausted => "exhausted",
            EndReason::Forced => "forced",
        }
    }
}

#[derive(Debug)]
pub enum QuizOutcome {
    Next(Question),
    Finished { player: User, reason: EndReason },
}

/// Picks one candidate uniformly at random, or `None` when the pool is empty.
pub fn choose_question<R: Rng + ?Sized>(mut pool: Vec<Question>, rng: &mut R) -> Option<Question> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..pool.len());
    Some(pool.swap_remove(index))
}

pub async fn play_round(pool: &SqlitePool, round: &QuizRound) -> sqlx::Result<QuizOutcome> {
    if !round.force_end {
        let candidates = {
            let mut conn = pool.acquire().await?;
            questions::get_quiz_candidates(
                &mut conn,
                round.category.id(),
                &round.previous_questions,
            )
            .await?
        };
        let next = choose_question(candidates, &mut rand::thread_rng());
        if let Some(question) = next {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[round.category.label().as_str()])
                .inc();
            return Ok(QuizOutcome::Next(question));
        }
    }

    let reason = if round.force_end {
        EndReason::Forced
    } else {
        EndReason::Exhausted
    };
    let player = record_score(pool, round.num_correct).await?;
    QUIZ_GAMES_FINISHED.with_label_values(&[reason.as_str()]).inc();
    tracing::info!(
        player_id = player.id,
        username = %player.username,
        score = player.score,
        reason = reason.as_str(),
        "Quiz game finished"
    );
    Ok(QuizOutcome::Finished { player, reason })
}

async fn record_score(pool: &SqlitePool, score: i64) -> sqlx::Result<User> {
    let mut conn = pool.acquire().await?;
    users::create_player(&mut conn, score).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::categories::create_category;
    use crate::db::{test_pool, NewQuestion};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn q(id: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: "answer".to_owned(),
            category: 1,
            difficulty: 1,
        }
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(choose_question(Vec::new(), &mut rng).is_none());
    }

    #[test]
    fn every_candidate_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let pool = (1..=4).map(q).collect();
            seen.insert(choose_question(pool, &mut rng).unwrap().id);
        }
        assert_eq!(seen, HashSet::from([1, 2, 3, 4]));
    }

    async fn seeded() -> (tempfile::TempDir, SqlitePool, i64, Vec<i64>) {
        let (dir, pool) = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let science = create_category(&mut conn, "Science").await.unwrap();
        let art = create_category(&mut conn, "Art").await.unwrap();
        let mut science_ids = Vec::new();
        for i in 0..3 {
            let new = NewQuestion {
                question: format!("science {i}"),
                answer: "a".to_owned(),
                category: science,
                difficulty: 1,
            };
            science_ids.push(questions::create_question(&mut conn, &new).await.unwrap());
        }
        let art_question = NewQuestion {
            question: "art".to_owned(),
            answer: "a".to_owned(),
            category: art,
            difficulty: 2,
        };
        questions::create_question(&mut conn, &art_question)
            .await
            .unwrap();
        drop(conn);
        (dir, pool, science, science_ids)
    }

    #[tokio::test]
    async fn a_game_serves_each_question_once_then_records_the_score() {
        let (_dir, pool, science, science_ids) = seeded().await;
        let mut round = QuizRound {
            category: CategoryFilter::Only(science),
            previous_questions: Vec::new(),
            num_correct: 0,
            force_end: false,
        };

        for _ in 0..science_ids.len() {
            match play_round(&pool, &round).await.unwrap() {
                QuizOutcome::Next(question) => {
                    assert_eq!(question.category, science);
                    assert!(!round.previous_questions.contains(&question.id));
                    round.previous_questions.push(question.id);
                    round.num_correct += 1;
                }
                other => panic!("game ended early: {other:?}"),
            }
        }

        match play_round(&pool, &round).await.unwrap() {
            QuizOutcome::Finished { player, reason } => {
                assert_eq!(reason, EndReason::Exhausted);
                assert_eq!(player.score, 3);
                assert_eq!(player.username, "Player 1");
            }
            other => panic!("expected the game to end: {other:?}"),
        }

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(users::get_users_by_score(&mut conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn forcing_the_end_skips_remaining_questions() {
        let (_dir, pool, _, _) = seeded().await;
        let round = QuizRound {
            category: CategoryFilter::All,
            previous_questions: Vec::new(),
            num_correct: 2,
            force_end: true,
        };

        let first = play_round(&pool, &round).await.unwrap();
        let second = play_round(&pool, &round).await.unwrap();
        match (first, second) {
            (
                QuizOutcome::Finished { player: a, reason },
                QuizOutcome::Finished { player: b, .. },
            ) => {
                assert_eq!(reason, EndReason::Forced);
                assert_eq!(a.score, 2);
                assert_eq!(a.username, "Player 1");
                assert_eq!(b.username, "Player 2");
            }
            other => panic!("expected two finished games: {other:?}"),
        }
    }
}
