//! Database models mapped to the tables of the comment store.

mod comment;

pub use comment::{Comment, NewComment, UpdateComment};
