pub mod item;
pub mod score;
pub mod session;

pub use item::{normalize_answer, Item};
pub use score::{rank_descending, ScoreRecord};
pub use session::{PlayerName, Session, SessionState, STARTING_LIVES};
