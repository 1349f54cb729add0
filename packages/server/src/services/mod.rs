pub mod alert;
pub mod candidates;
pub mod suggestion;

/// Reason reported when the hospital roster cannot be loaded.
pub const DONOR_FETCH_FAILED: &str = "Failed to fetch donors";
