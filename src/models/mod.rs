pub mod body;
pub mod envelope;
pub mod format;
pub mod item;
pub mod score;
