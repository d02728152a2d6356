//! Last known camera state, as seen by this session.

use rustc_hash::FxHashMap;

use crate::indicator::RecordState;
use crate::protocol::ParamId;

/// Record state plus the boolean parameters the session toggles.
///
/// Only parameters registered with [`track`](Self::track) are cached;
/// status updates for anything else are dropped.
#[derive(Debug, Clone, Default)]
pub struct CameraState {
    record: Option<RecordState>,
    flags: FxHashMap<ParamId, bool>,
}

impl CameraState {
    /// Empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last record state reported, if any was mapped.
    #[inline]
    #[must_use]
    pub const fn record(&self) -> Option<RecordState> {
        self.record
    }

    /// Stores the record state.
    #[inline]
    pub fn set_record(&mut self, state: RecordState) {
        self.record = Some(state);
    }

    /// Starts caching `param`, initially off.
    pub fn track(&mut self, param: ParamId) {
        self.flags.entry(param).or_insert(false);
    }

    /// Returns `true` if `param` is cached.
    #[inline]
    #[must_use]
    pub fn is_tracked(&self, param: &ParamId) -> bool {
        self.flags.contains_key(param)
    }

    /// Cached value of `param`; untracked parameters read as off.
    #[inline]
    #[must_use]
    pub fn flag(&self, param: &ParamId) -> bool {
        self.flags.get(param).copied().unwrap_or(false)
    }

    /// Updates a tracked parameter. Returns `false` if `param` is untracked.
    pub fn set_flag(&mut self, param: &ParamId, on: bool) -> bool {
        match self.flags.get_mut(param) {
            Some(slot) => {
                *slot = on;
                true
            }
            None => false,
        }
    }

    /// Inverts a tracked parameter and returns the new value.
    pub fn toggle(&mut self, param: &ParamId) -> bool {
        let slot = self.flags.entry(param.clone()).or_insert(false);
        *slot = !*slot;
        *slot
    }
}
