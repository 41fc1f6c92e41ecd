//! Choosing where a forced-activity segment starts.
//!
//! Every planner that inserts a walk (or ride) of a requested length ends up
//! with a list of candidate start points and their activity times. The rule
//! is the same everywhere: take the longest time that fits the budget; if
//! none fits, take the one that overshoots the least.

/// Times closer than this are treated as equal.
pub const TIME_EPSILON: f64 = 1e-6;

/// A possible start point for the forced-activity segment.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub item: T,
    /// Activity time from this start point, seconds.
    pub time_s: f64,
    /// Secondary key for equal times; smaller wins.
    pub tie_break: f64,
}

/// The winning candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub item: T,
    pub time_s: f64,
    /// False when no candidate fit and this one overshoots the budget.
    pub within_budget: bool,
}

fn beats(time: f64, tie: f64, best_time: f64, best_tie: f64, prefer_longer: bool) -> bool {
    if (time - best_time).abs() < TIME_EPSILON {
        return tie < best_tie;
    }
    if prefer_longer {
        time > best_time
    } else {
        time < best_time
    }
}

/// Pick the candidate that best uses `budget_s`.
///
/// Candidates with a non-positive or non-finite time are ignored. Among
/// equals, the smaller `tie_break` wins, then the earlier candidate.
pub fn select_within_budget<T>(
    candidates: impl IntoIterator<Item = Candidate<T>>,
    budget_s: f64,
) -> Option<Selection<T>> {
    let mut within: Option<Candidate<T>> = None;
    let mut over: Option<Candidate<T>> = None;

    for c in candidates {
        if !c.time_s.is_finite() || c.time_s <= 0.0 {
            continue;
        }
        if c.time_s <= budget_s {
            let better = within
                .as_ref()
                .is_none_or(|b| beats(c.time_s, c.tie_break, b.time_s, b.tie_break, true));
            if better {
                within = Some(c);
            }
        } else {
            let better = over
                .as_ref()
                .is_none_or(|b| beats(c.time_s, c.tie_break, b.time_s, b.tie_break, false));
            if better {
                over = Some(c);
            }
        }
    }

    match (within, over) {
        (Some(c), _) => Some(Selection {
            item: c.item,
            time_s: c.time_s,
            within_budget: true,
        }),
        (None, Some(c)) => Some(Selection {
            item: c.item,
            time_s: c.time_s,
            within_budget: false,
        }),
        (None, None) => None,
    }
}
