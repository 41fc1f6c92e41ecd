//! Cycling variants of the hybrid planners.
//!
//! There is no cycling graph. A cycling budget is turned into the walking
//! budget that covers the same distance, the walking planner runs on the
//! walking graph, and the walking steps are then relabelled and retimed.

use tracing::info;

use crate::directions::DirectionsProvider;
use crate::domain::{BIKE_WALK_FACTOR, Coordinate, RouteStep};
use crate::transit::StopIndex;

use super::{DriveWalkPlanner, EarlierStopPlanner, PlanError, PlannedRoute};

/// Walking minutes that cover the distance of `bike_mins` of cycling.
pub fn walk_equivalent_mins(bike_mins: f64) -> f64 {
    bike_mins * BIKE_WALK_FACTOR
}

/// Relabel walking steps as cycling and shorten them to cycling speed.
///
/// Non-walking steps are left alone. The first "Walk" in a rewritten
/// step's description becomes "Bike", and a "(N min)" figure in it is
/// recomputed from the cycling duration.
pub fn rewrite_as_bike(mut route: PlannedRoute) -> PlannedRoute {
    for step in &mut route.steps {
        rewrite_step(step);
    }
    for fault in &mut route.faults {
        if let Some(mode) = fault.mode.to_cycling() {
            fault.mode = mode;
        }
    }
    route
}

fn rewrite_step(step: &mut RouteStep) {
    let Some(mode) = step.mode.to_cycling() else {
        return;
    };
    step.mode = mode;
    step.duration_sec /= BIKE_WALK_FACTOR;
    let description = step.description.replacen("Walk", "Bike", 1);
    step.description = retime_description(&description, step.duration_sec / 60.0);
}

/// Replace the first "(N min)" figure, keeping its number of decimals.
fn retime_description(description: &str, mins: f64) -> String {
    let Some(end) = description.find(" min)") else {
        return description.to_string();
    };
    let Some(open) = description[..end].rfind('(') else {
        return description.to_string();
    };
    let figure = &description[open + 1..end];
    if figure.parse::<f64>().is_err() {
        return description.to_string();
    }
    let precision = figure.split_once('.').map_or(0, |(_, frac)| frac.len());
    format!(
        "{}({mins:.precision$}{}",
        &description[..open],
        &description[end..]
    )
}

/// Drive, then cycle the last `bike_budget_mins`.
pub fn plan_drive_bike(
    planner: &DriveWalkPlanner<'_>,
    origin: Coordinate,
    destination: Coordinate,
    bike_budget_mins: f64,
) -> Result<PlannedRoute, PlanError> {
    let walk_mins = walk_equivalent_mins(bike_budget_mins);
    let route = planner
        .plan(origin, destination, walk_mins)
        .map_err(|e| match e {
            PlanError::InfeasibleBudget { .. } => PlanError::InfeasibleBudget {
                budget_mins: bike_budget_mins,
            },
            other => other,
        })?;
    info!(bike_budget_mins, walk_mins, "rewriting drive-walk route for cycling");
    Ok(rewrite_as_bike(route))
}

/// Transit to an earlier stop, then cycle to the destination.
pub async fn plan_transit_bike<D, S>(
    planner: &EarlierStopPlanner<'_, D, S>,
    origin: Coordinate,
    destination: Coordinate,
    bike_budget_mins: f64,
) -> Result<PlannedRoute, PlanError>
where
    D: DirectionsProvider + Sync,
    S: StopIndex + Send + Sync + 'static,
{
    let walk_mins = walk_equivalent_mins(bike_budget_mins);
    let route = planner.plan(origin, destination, walk_mins).await?;
    info!(bike_budget_mins, walk_mins, "rewriting transit route for cycling");
    Ok(rewrite_as_bike(route))
}
