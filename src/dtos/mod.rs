pub mod commentary_dtos;
pub mod match_dtos;

/// Server-side cap on list sizes, applied regardless of what the caller asks
/// for.
pub const MAX_LIMIT: i64 = 100;
