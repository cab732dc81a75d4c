mod categories;
mod questions;
mod quizzes;
mod users;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;
pub use users::users_router;
