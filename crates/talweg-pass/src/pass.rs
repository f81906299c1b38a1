//! The [`DistancePass`] trait and its answer types.
//!
//! A pass never touches the worklist, the counters, or the distance
//! band directly. It answers four questions about individual cells and
//! the engine turns the answers into traversal state.

use talweg_core::Direction;

use crate::context::PassContext;

/// How a cell enters the traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellClass {
    /// Not part of this pass. Never queued, never finalized, distance
    /// stays nodata unless a preseed wrote one.
    Outside,
    /// Participates and is eligible immediately (its downstream cannot
    /// or need not resolve first).
    Ready,
    /// Participates but must wait for its downstream target. Counter
    /// starts at one and a single decrement releases the cell.
    Pending,
}

/// A downstream target whose distance is already committed.
///
/// The engine only builds one when the target cell is reachable from
/// this worker (owned or halo) and its distance is no longer nodata.
#[derive(Clone, Copy, Debug)]
pub struct Resolved {
    /// Direction the finalizing cell drains along.
    pub dir: Direction,
    /// Target's local row (may be a halo row).
    pub row: i32,
    /// Target's local column.
    pub col: i32,
    /// Target's committed distance.
    pub distance: f32,
}

/// What the engine should write for a finalized cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Finalize {
    /// Commit this distance.
    Write(f32),
    /// Commit the nodata sentinel.
    Nodata,
    /// Leave the distance band untouched (a preseed already holds the
    /// value).
    Keep,
}

/// Per-cell rules of one distance traversal.
///
/// # Contract
///
/// - Every method MUST be deterministic and read only through the
///   [`PassContext`]; two workers classifying the same cell from
///   opposite sides of a partition boundary must agree.
/// - `classify` MUST return [`CellClass::Pending`] only when the cell's
///   downstream target will itself be finalized eventually; a cell
///   waiting on a target that never resolves would strand the whole
///   traversal short of quiescence.
/// - `contributes` gates decrement delivery. It MUST be true exactly
///   for cells `classify` can return `Pending` for, so each pending
///   cell is released once and counters never go negative.
///
/// # Examples
///
/// ```
/// use talweg_pass::{CellClass, DistancePass, Finalize, PassContext, Resolved};
///
/// /// Walks every cell with a direction, summing hop lengths.
/// struct HopLength;
///
/// impl DistancePass for HopLength {
///     fn name(&self) -> &str {
///         "hop_length"
///     }
///
///     fn classify(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> CellClass {
///         match ctx.flow().target_of(r, c) {
///             Some((_, tr, tc)) if ctx.in_reach(tr, tc) => CellClass::Pending,
///             Some(_) => CellClass::Ready,
///             None => CellClass::Outside,
///         }
///     }
///
///     fn finalize(
///         &self,
///         ctx: &PassContext<'_>,
///         r: i32,
///         _c: i32,
///         target: Option<&Resolved>,
///     ) -> Finalize {
///         match target {
///             Some(t) => Finalize::Write(t.distance + ctx.weight(r, t.dir)),
///             None => Finalize::Write(0.0),
///         }
///     }
///
///     fn contributes(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> bool {
///         ctx.flow().direction_at(r, c).is_some()
///     }
/// }
///
/// assert_eq!(HopLength.name(), "hop_length");
/// ```
pub trait DistancePass: Send + Sync {
    /// Pass name for logs and error reporting.
    fn name(&self) -> &str;

    /// Whether the subarea id layer must be loaded and shared.
    fn needs_subareas(&self) -> bool {
        false
    }

    /// Whether a baseline distance layer must be loaded and shared.
    fn needs_baseline(&self) -> bool {
        false
    }

    /// Sort a cell into the traversal, called once per owned cell
    /// during the initialization sweep.
    fn classify(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> CellClass;

    /// Distance to write before the traversal starts, or `None` to
    /// leave the cell at nodata.
    ///
    /// Called for every owned cell. Preseeded values are visible to
    /// `finalize` through [`Resolved::distance`] once halo rows have
    /// been shared.
    fn preseed(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> Option<f32> {
        let _ = (ctx, r, c);
        None
    }

    /// Distance decision for a cell popped off the worklist.
    ///
    /// `target` is the cell's downstream neighbor when it is reachable
    /// and already carries a committed distance, `None` otherwise.
    fn finalize(
        &self,
        ctx: &PassContext<'_>,
        r: i32,
        c: i32,
        target: Option<&Resolved>,
    ) -> Finalize;

    /// Whether a neighbor draining into a finalized cell should have
    /// its counter decremented.
    fn contributes(&self, ctx: &PassContext<'_>, r: i32, c: i32) -> bool;
}
