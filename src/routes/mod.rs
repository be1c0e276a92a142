pub(crate) mod matches;
pub(crate) mod ws;
