pub(crate) mod commentary;
pub(crate) mod matches;
pub(crate) mod ws;
