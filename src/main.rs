use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use itertools::Itertools;
use log::{error, info, warn};
use uom::si::f64::Velocity;
use uom::si::velocity::{kilometer_per_hour, meter_per_second};

use cornering::analysis::{
    IndexMode, LapFailure, LapTimeProjector, SessionRange, TeamPerformanceTable, corner_records,
    season_profiles, season_records,
};
use cornering::persistence::{read_profiles, read_records, write_profiles, write_records};
use cornering::telemetry::{
    JsonlSessionProvider, Session, SessionType, load_session_jsonl, producer::season_sessions,
};
use cornering::{
    AnalysisConfig, CornerProfile, CorneringError, SegmentLabel, SegmentLabeler, process_lap,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Config file, defaults to the one in the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate every team's fastest qualifying lap of a season into corner records
    Generate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        year: u16,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Build the time-per-corner-type profile of every track in a season
    Profile {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        year: u16,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print each team's speed relative to the field, per session range
    Performance {
        #[arg(short, long)]
        records: PathBuf,
    },
    /// Project lap times from each team's speed ratios
    Project {
        #[arg(short, long)]
        records: PathBuf,
        /// Only use sessions from this round onwards
        #[arg(long)]
        from_session: Option<u32>,
        /// Seconds spent on LOW, MEDIUM-LOW, MEDIUM-HIGH, HIGH and STRAIGHT
        #[arg(long, num_args = 5, conflicts_with = "track")]
        budget: Option<Vec<f64>>,
        /// Use the profile of this track as the budget
        #[arg(long, requires = "profiles")]
        track: Option<String>,
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
    /// Print normalized track profiles
    Normalize {
        #[arg(short, long)]
        profiles: PathBuf,
    },
    /// Print the segments and totals of the fastest lap in a session file
    Lap {
        #[arg(short, long)]
        session: PathBuf,
    },
}

fn load_season(
    config: &AnalysisConfig,
    input: &Path,
    year: u16,
) -> Result<Vec<Session>, CorneringError> {
    let mut provider = JsonlSessionProvider::new(input.to_path_buf());
    season_sessions(
        &mut provider,
        year,
        SessionType::Qualifying,
        config.max_rounds,
        &config.wet_session_overrides,
    )
}

fn report_failures(failures: &[LapFailure]) {
    if !failures.is_empty() {
        warn!("{} laps could not be processed", failures.len());
    }
}

fn generate(
    config: &AnalysisConfig,
    input: &Path,
    year: u16,
    output: &Path,
) -> Result<(), CorneringError> {
    let tables = config.boundary_tables()?;
    let labeler = SegmentLabeler::new(&tables);
    let sessions = load_season(config, input, year)?;

    let report = season_records(&labeler, &sessions);
    report_failures(&report.failures);
    write_records(output, &corner_records(&report.output))
}

fn profile(
    config: &AnalysisConfig,
    input: &Path,
    year: u16,
    output: &Path,
) -> Result<(), CorneringError> {
    let tables = config.boundary_tables()?;
    let labeler = SegmentLabeler::new(&tables);
    let sessions = load_season(config, input, year)?;

    let report = season_profiles(&labeler, &sessions);
    report_failures(&report.failures);
    write_profiles(output, &report.output)
}

fn format_index(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:+.2}%", v))
}

fn performance(config: &AnalysisConfig, records: &Path) -> Result<(), CorneringError> {
    let records = config.data_quality_policy().apply(&read_records(records)?);

    for range in &config.session_ranges {
        let table = TeamPerformanceTable::from_records(&range.filter(&records));
        if table.is_empty() {
            info!("No records for {}", range.name);
            continue;
        }

        println!("{}", range.name);
        println!(
            "{:<20} {}",
            "Average (km/h)",
            SegmentLabel::ALL
                .iter()
                .map(|&label| {
                    let average = Velocity::new::<meter_per_second>(
                        table.average_speed(label).unwrap_or_default(),
                    );
                    format!("{:>12.1}", average.get::<kilometer_per_hour>())
                })
                .join(" ")
        );
        for row in table.index_table(IndexMode::DeltaFromAverage) {
            println!(
                "{:<20} {}",
                row.team,
                row.values
                    .iter()
                    .map(|&v| format!("{:>12}", format_index(v)))
                    .join(" ")
            );
        }
        println!();
    }
    Ok(())
}

fn projection_budget(
    config: &AnalysisConfig,
    budget: Option<&[f64]>,
    track: Option<&str>,
    profiles: Option<&Path>,
) -> Result<CornerProfile, CorneringError> {
    if let Some(values) = budget {
        return Ok(SegmentLabel::ALL.into_iter().zip(values.iter().copied()).collect());
    }
    match (track, profiles) {
        (Some(track), Some(profiles)) => read_profiles(profiles)?
            .get(track)
            .copied()
            .ok_or_else(|| CorneringError::InvalidUserInput {
                field: "track".to_string(),
                reason: format!("no profile for {}", track),
            }),
        _ => Ok(config.projection_budget),
    }
}

fn project(
    config: &AnalysisConfig,
    records: &Path,
    from_session: Option<u32>,
    budget: CornerProfile,
) -> Result<(), CorneringError> {
    let records = config.data_quality_policy().apply(&read_records(records)?);
    let records = SessionRange::new("projection", from_session, None).filter(&records);
    let table = TeamPerformanceTable::from_records(&records);

    let projection = LapTimeProjector::new(&table).project(&budget);
    for entry in &projection.entries {
        println!("{:<20} {:>9.3} {:>+8.3}", entry.team, entry.lap_time, entry.gap);
    }
    for (team, e) in &projection.undefined {
        println!("{:<20} {:>9} ({})", team, "-", e);
    }
    Ok(())
}

fn normalize(profiles: &Path) -> Result<(), CorneringError> {
    let normalized = read_profiles(profiles)?.normalized();
    let json = serde_json::to_string_pretty(&normalized).map_err(|e| {
        CorneringError::SerializeError {
            what: "normalized profiles".to_string(),
            source: e,
        }
    })?;
    println!("{}", json);
    Ok(())
}

fn lap(config: &AnalysisConfig, session: &Path) -> Result<(), CorneringError> {
    let tables = config.boundary_tables()?;
    let labeler = SegmentLabeler::new(&tables);
    let session = load_session_jsonl(session)?;
    let fastest = session.fastest_lap().ok_or_else(|| CorneringError::InvalidSessionFile {
        path: session.info.name(),
        reason: "no valid lap".to_string(),
    })?;

    let segmented = process_lap(&labeler, &session.info.name(), &fastest.samples)?;
    println!(
        "{} - {} ({})",
        session.info.name(),
        fastest.info.driver,
        fastest.info.team
    );
    for segment in &segmented.segments {
        println!(
            "{:<12} {:>8.1} m -> {:>8.1} m {:>8.3} s",
            segment.label.as_str(),
            segment.start.distance,
            segment.end.distance,
            segment.duration()
        );
    }
    for (label, totals) in segmented.aggregate.iter() {
        println!(
            "{:<12} {:>8.1} m {:>8.3} s {:>7.1} km/h",
            label.as_str(),
            totals.distance,
            totals.time,
            totals.speed_kmh()
        );
    }
    Ok(())
}

fn run(cli: &Args) -> Result<(), CorneringError> {
    let config = AnalysisConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Generate {
            input,
            year,
            output,
        } => generate(&config, input, *year, output),
        Commands::Profile {
            input,
            year,
            output,
        } => profile(&config, input, *year, output),
        Commands::Performance { records } => performance(&config, records),
        Commands::Project {
            records,
            from_session,
            budget,
            track,
            profiles,
        } => {
            let budget = projection_budget(
                &config,
                budget.as_deref(),
                track.as_deref(),
                profiles.as_deref(),
            )?;
            project(&config, records, *from_session, budget)
        }
        Commands::Normalize { profiles } => normalize(profiles),
        Commands::Lap { session } => lap(&config, session),
    }
}

fn main() {
    colog::init();

    let cli = Args::parse();
    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
