use crate::payload::ScoreboardPayload;

/// Last accepted scoreboard snapshot. Every refresh replaces it whole; there
/// is no merging between versions.
#[derive(Debug, Clone, Default)]
pub struct ScoreboardStore {
    payload: Option<ScoreboardPayload>,
    // Sequence number of the request that produced `payload`.
    version: u64,
}

impl ScoreboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, payload: ScoreboardPayload, version: u64) {
        self.payload = Some(payload);
        self.version = version;
    }

    pub fn get(&self) -> Option<&ScoreboardPayload> {
        self.payload.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
