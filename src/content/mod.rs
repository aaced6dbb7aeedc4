//! Content module - post view models and the transformations that build them

mod normalize;
mod post;
pub mod reading_time;
pub mod rich_text;

pub use normalize::{parse_timestamp, NormalizeError, Normalizer};
pub use post::{Banner, ContentBlock, Post, PostPage};
pub use reading_time::{count_words, estimate_minutes, estimate_minutes_at};
