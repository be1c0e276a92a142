pub mod commentary;
pub mod matches;
