use super::ids::PeriodsId;
use serde::{Deserialize, Serialize};

/// A discretization of the model's time horizon.
///
/// `per_horizon` is the number of such periods that tile the horizon: the
/// horizon itself has `per_horizon == 1`, a year-long horizon split into
/// days has `per_horizon == 365`, and so on. A larger tile count therefore
/// means a *finer* discretization. Temporal ordering in the engine is always
/// expressed through this count: "the minimum comparable time" at which a
/// variable is defined is the entry with the largest `per_horizon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Periods {
    pub name: String,
    pub per_horizon: u32,
}

impl Periods {
    pub fn new(name: impl Into<String>, per_horizon: u32) -> Self {
        Self {
            name: name.into(),
            per_horizon,
        }
    }

    /// Whether this is the coarsest discretization.
    pub fn is_horizon(&self) -> bool {
        self.per_horizon == 1
    }
}

/// A temporal lag (processing time) attached to a conversion.
///
/// Produced commodities of a lagged conversion are written at the lag's base
/// periods rather than at the scheduling time; expended commodities are
/// always consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lag {
    /// The periods the lag is measured in.
    pub periods: PeriodsId,
    /// How many of those periods the lag spans.
    pub steps: u32,
}

impl Lag {
    pub fn new(periods: PeriodsId, steps: u32) -> Self {
        Self { periods, steps }
    }
}
