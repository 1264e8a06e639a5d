//! Calendar commands
//!
//! Thin wrappers around the controllers used by the binary: move the cursor,
//! load the range and render the resulting view.

use std::time::Instant;

use chrono::NaiveDate;
use cyclarc_core::LoadOutcome;
use cyclarc_domain::{CyclarcError, Granularity, Result};
use tracing::info;

use crate::render::render_view;
use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Load and render the cycle calendar around `pivot` (today if `None`).
pub async fn show_cycle(
    ctx: &AppContext,
    granularity: Granularity,
    pivot: Option<NaiveDate>,
) -> Result<String> {
    let command_name = "cycle::show";
    let start = Instant::now();
    info!(command = command_name, %granularity, ?pivot, "Rendering cycle calendar");

    let result = async {
        let outcome = ctx.cycle.show(granularity, pivot).await;
        check_outcome(outcome, ctx.cycle.requires_profile_update())?;
        Ok(render_view(&ctx.cycle.view()))
    }
    .await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// Load and render the agenda around `pivot` (today if `None`).
pub async fn show_agenda(
    ctx: &AppContext,
    granularity: Granularity,
    pivot: Option<NaiveDate>,
) -> Result<String> {
    let command_name = "agenda::show";
    let start = Instant::now();
    info!(command = command_name, %granularity, ?pivot, "Rendering agenda");

    let result = async {
        let outcome = ctx.agenda.show(granularity, pivot).await;
        check_outcome(outcome, false)?;
        Ok(render_view(&ctx.agenda.view()))
    }
    .await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// Start a period on `date` after loading the month that contains it.
pub async fn start_period(ctx: &AppContext, date: NaiveDate) -> Result<()> {
    let command_name = "cycle::start_period";
    let start = Instant::now();

    let result = async {
        check_outcome(ctx.cycle.go_to(date).await, ctx.cycle.requires_profile_update())?;
        ctx.cycle.start_period(date).await
    }
    .await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// End the open period on `date`.
pub async fn end_period(ctx: &AppContext, date: NaiveDate) -> Result<()> {
    let command_name = "cycle::end_period";
    let start = Instant::now();

    let result = async {
        check_outcome(ctx.cycle.go_to(date).await, ctx.cycle.requires_profile_update())?;
        ctx.cycle.end_period(date).await
    }
    .await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// A one-shot command has nothing to show when its load did not apply.
fn check_outcome(outcome: LoadOutcome, profile_incomplete: bool) -> Result<()> {
    match outcome {
        LoadOutcome::Applied => Ok(()),
        LoadOutcome::Failed(err) | LoadOutcome::PrerequisiteMissing(err) => Err(err),
        LoadOutcome::Suppressed if profile_incomplete => Err(CyclarcError::Prerequisite(
            "complete the cycle profile before using the calendar".into(),
        )),
        LoadOutcome::Suppressed | LoadOutcome::Stale => {
            Err(CyclarcError::Load("the calendar range was not loaded".into()))
        }
    }
}
