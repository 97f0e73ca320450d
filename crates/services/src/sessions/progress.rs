/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub found: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
