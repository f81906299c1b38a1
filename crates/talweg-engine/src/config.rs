//! Run configuration for a distance pass.

/// Knobs for one [`run_pass`](crate::run_pass) invocation.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Worker count the grid is banded across. Counts above the row
    /// total are clamped with a warning; zero is rejected. Default: 1.
    pub workers: u32,
    /// A cell belongs to the source network when its source-layer value
    /// meets or exceeds this threshold. Default: 1.
    pub threshold: i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            threshold: 1,
        }
    }
}
