//! Splitting the total dough mass into equipment-sized batches.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Most sessions fit in a handful of mixer loads.
pub type BatchList = SmallVec<[Batch; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// 1-based position in mixing order.
    pub batch_index: u32,
    pub dough_mass_g: f64,
}

/// Session override if positive, else the global default if positive, else 0 (disabled).
#[must_use]
pub fn max_batch_mass(session_override: f64, global_default: Option<f64>) -> f64 {
    if session_override.is_finite() && session_override > 0.0 {
        return session_override;
    }
    global_default
        .filter(|max| max.is_finite() && *max > 0.0)
        .unwrap_or(0.0)
}

/// Emit batches of at most `max_batch_g` until `total_g` is used up.
///
/// The last batch is whatever is left of `total_g` after the full batches, so
/// summing the batch masses in order gives back `total_g` exactly.
#[must_use]
pub fn plan_batches(total_g: f64, max_batch_g: f64) -> BatchList {
    let mut batches = BatchList::new();
    if !(max_batch_g > 0.0 && total_g.is_finite()) {
        return batches;
    }
    let mut planned = 0.0_f64;
    let mut batch_index = 1_u32;
    loop {
        let remaining = total_g - planned;
        if remaining <= 0.0 {
            break;
        }
        let next = planned + max_batch_g;
        if remaining <= max_batch_g || next <= planned {
            batches.push(Batch {
                batch_index,
                dough_mass_g: remaining,
            });
            break;
        }
        batches.push(Batch {
            batch_index,
            dough_mass_g: max_batch_g,
        });
        planned = next;
        batch_index = batch_index.saturating_add(1);
    }
    batches
}
