use clap::builder::RangedU64ValueParser;
use clap::Args;
use gympal_core::{MetricsPipeline, MAX_WEEKS_AHEAD};

use super::{CmdResult, Session};

#[derive(Args)]
pub struct MetricsArgs {
    /// Exercise name (case-insensitive)
    pub exercise: String,
    /// Weeks to project, at most 520 (defaults to metrics.weeks_ahead)
    #[arg(
        long,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_WEEKS_AHEAD as u64)
    )]
    pub weeks_ahead: Option<usize>,
    /// Print `{"points": [...], "forecast": [...]}` JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: MetricsArgs) -> CmdResult {
    let session = Session::open()?;
    let weeks_ahead = args.weeks_ahead.unwrap_or(session.config.metrics.weeks_ahead);

    let metrics = MetricsPipeline::new(&session.db)
        .with_weeks_ahead(weeks_ahead)
        .run(session.user.id, &args.exercise)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{}", metrics.render_table(&args.exercise, &session.config.user.units));
    }
    Ok(())
}
