use crate::preview_pipeline::stats::types::BeamResult;

/// Read side of the external statistics engine.
pub trait StatisticsProvider: Send + Sync {
    /// Result computed for a given frame, if the engine still holds it.
    fn result_for(&self, frame_number: i64) -> Option<BeamResult>;

    /// Most recent result.
    fn latest(&self) -> Option<BeamResult>;

    /// Results recorded since `from_index`, oldest first.
    fn history(&self, _from_index: usize) -> Vec<BeamResult> {
        Vec::new()
    }
}
