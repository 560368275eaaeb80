mod category;
mod question;

pub use category::{CategoryError, CategoryName};
pub use question::{Question, QuestionError};
