//! Single-slot memo of the last ranking run.

use cartwise_core::RankedStrategy;

use crate::fingerprint::RankingFingerprint;

/// Holds exactly one `(fingerprint, result)` pair. A newer `put` replaces
/// it, whichever run it came from.
#[derive(Debug, Default)]
pub struct ResultCache {
    slot: Option<(RankingFingerprint, Vec<RankedStrategy>)>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, fingerprint: &RankingFingerprint) -> Option<&[RankedStrategy]> {
        match &self.slot {
            Some((stored, result)) if stored == fingerprint => Some(result),
            _ => None,
        }
    }

    pub fn put(&mut self, fingerprint: RankingFingerprint, result: Vec<RankedStrategy>) {
        self.slot = Some((fingerprint, result));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
