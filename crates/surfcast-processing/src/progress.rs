//! Coarse upload progress

/// Milestones reached by one upload attempt, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Validated,
    PrefixesReady,
    Encoded,
    Transferred,
    Committed,
}

impl UploadStage {
    pub fn percent(self) -> u8 {
        match self {
            UploadStage::Validated => 10,
            UploadStage::PrefixesReady => 25,
            UploadStage::Encoded => 50,
            UploadStage::Transferred => 75,
            UploadStage::Committed => 100,
        }
    }
}

/// Receives progress milestones (e.g. to drive a progress bar)
pub trait ProgressReporter: Send + Sync {
    fn report(&self, stage: UploadStage);
}

/// No-op implementation for callers that don't display progress
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn report(&self, _stage: UploadStage) {}
}
