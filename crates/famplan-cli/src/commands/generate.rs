use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, ValueEnum};
use famplan_core::{
    Clock, FixedClock, GenerationPreferences, GenerationRequest, GenerationResult, Household,
    IdGenerator, Owner, ScheduleEngine, SequentialIds, SystemClock, UuidIds,
};

use super::load_config;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Schedule and summary as pretty JSON
    #[default]
    Json,
    /// Plain-text agenda grouped by day
    Agenda,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Household JSON document (members, commitments, goals)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
    /// Monday the week starts on (YYYY-MM-DD)
    #[arg(short, long)]
    week: NaiveDate,
    /// Strategy name; defaults to the configured one
    #[arg(short, long)]
    strategy: Option<String>,
    /// Requesting user id recorded on the schedule
    #[arg(long, default_value = "local")]
    user: String,
    /// Nudge goals towards mornings
    #[arg(long)]
    prefer_mornings: bool,
    /// Pull shared goals towards evenings and weekends
    #[arg(long)]
    maximize_family_time: bool,
    /// Goal id to leave out of this run (repeatable)
    #[arg(long = "exclude", value_name = "GOAL_ID")]
    excluded: Vec<String>,
    /// Only show blocks on this member's calendar (their own plus shared)
    #[arg(long, value_name = "MEMBER_ID")]
    member: Option<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Use sequential ids and stamp the week start as generation time, so
    /// repeated runs give identical output
    #[arg(long)]
    deterministic: bool,
}

pub fn run(args: GenerateArgs, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let engine = ScheduleEngine::new(load_config(config)?);
    let household = Household::from_json_file(&args.input)?;
    tracing::debug!(
        input = %args.input.display(),
        members = household.members.len(),
        commitments = household.commitments.len(),
        goals = household.goals.len(),
        "household loaded"
    );

    let preferences = GenerationPreferences {
        prefer_mornings: args.prefer_mornings,
        maximize_family_time: args.maximize_family_time,
        include_all_goals: args.excluded.is_empty(),
        excluded_goal_ids: args.excluded,
        ..GenerationPreferences::default()
    };
    let mut request = GenerationRequest::new(args.user, args.week).with_preferences(preferences);
    if let Some(strategy) = args.strategy {
        request = request.with_strategy(strategy);
    }

    let (mut ids, clock): (Box<dyn IdGenerator>, Box<dyn Clock>) = if args.deterministic {
        let week_start = args.week.and_time(NaiveTime::default()).and_utc();
        (Box::new(SequentialIds::new()), Box::new(FixedClock(week_start)))
    } else {
        (Box::new(UuidIds), Box::new(SystemClock))
    };
    let mut result = engine.generate_from(&household, &request, ids.as_mut(), clock.as_ref())?;

    if let Some(member) = args.member {
        let owner = Owner::member(member);
        let visible: Vec<_> = result.schedule.blocks_for(&owner).cloned().collect();
        result.schedule.blocks = visible;
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Agenda => print!("{}", render_agenda(&result)),
    }
    Ok(())
}

fn render_agenda(result: &GenerationResult) -> String {
    let schedule = &result.schedule;
    let summary = &result.summary;
    let mut out = format!(
        "Week of {} ({})\n\n{}",
        schedule.week_start, schedule.strategy, schedule.agenda()
    );
    out.push_str(&format!(
        "\n{} blocks, {}/{} goals scheduled, {} of {} instances placed\n",
        summary.total_blocks,
        summary.goals_scheduled,
        summary.total_goals,
        summary.placed_instances,
        summary.requested_instances
    ));
    for unplaced in &summary.unplaced_goals {
        out.push_str(&format!(
            "  unplaced: {} ({}) {}/{}\n",
            unplaced.name, unplaced.owner, unplaced.placed, unplaced.requested
        ));
    }
    out
}
