//! Forest configuration parameters.

/// Configuration for a forest container.
///
/// Controls initial sizing and the compaction policy. Values are read at
/// construction; `auto_compact` seeds the runtime switch that
/// [`Forest::set_auto_compact`](crate::Forest::set_auto_compact) toggles.
#[derive(Clone, Debug)]
pub struct ForestConfig {
    /// Slots to pre-allocate in the backing array.
    ///
    /// Default: 0 (grow on demand, doubling).
    pub initial_capacity: usize,

    /// Occupancy fraction at or below which a removal triggers a
    /// compaction pass: `live <= capacity * compaction_ratio`.
    ///
    /// Default: 0.5. A ratio of 0.0 disables automatic triggering
    /// without disabling the manual [`compact`](crate::Forest::compact).
    pub compaction_ratio: f32,

    /// Whether removals run the occupancy check at all.
    ///
    /// Default: true. Batch-removal callers switch this off to avoid
    /// repeated O(n) passes, then switch it back on to force one
    /// compaction at the end.
    pub auto_compact: bool,
}

impl ForestConfig {
    /// Default occupancy trigger fraction.
    pub const DEFAULT_COMPACTION_RATIO: f32 = 0.5;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            initial_capacity: 0,
            compaction_ratio: Self::DEFAULT_COMPACTION_RATIO,
            auto_compact: true,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::new()
    }
}
