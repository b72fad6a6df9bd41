//! Forge CLI - Command-line interface for WellnessForge
//!
//! Commands:
//! - score: Compute the wellness score for a metrics frame
//! - forecast: Predict an energy slump
//! - oracle: Generate the daily oracle reading
//! - briefing: Run every engine over a briefing request
//! - chat: Talk to the coach interactively
//! - scan: Match image classifier labels against the food catalog
//! - doctor: Diagnose configuration and environment

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use tracing::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use wellness_forge::coach::{ChatSession, Coach};
use wellness_forge::config::ForgeConfig;
use wellness_forge::forecast::predict_slump;
use wellness_forge::nutrition::{Classification, FoodCatalog};
use wellness_forge::oracle::generate_oracle;
use wellness_forge::pipeline::{checked_hour, daily_briefing, parse_request, BriefingRequest};
use wellness_forge::score::{wellness_score, ScoreBreakdown};
use wellness_forge::types::{FitnessGoal, MetricsFrame, NutritionTotals, UserContext};
use wellness_forge::{ForgeError, FORGE_VERSION, PRODUCER_NAME};

/// Forge - On-device wellness scoring and coaching engine
#[derive(Parser)]
#[command(name = "forge")]
#[command(author = "WellnessForge Team")]
#[command(version = FORGE_VERSION)]
#[command(about = "Score wellness metrics, forecast fatigue and chat with the coach", long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input file path (use - for stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the wellness score for a metrics frame
    Score {
        #[command(flatten)]
        input: InputArgs,

        /// Include per-component contributions
        #[arg(long)]
        breakdown: bool,
    },

    /// Predict an energy slump for a metrics frame
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        /// Hour of day (0-23); defaults to the local hour
        #[arg(long)]
        hour: Option<i64>,

        /// Fitness goal
        #[arg(long, value_enum, default_value = "maintenance")]
        goal: GoalArg,
    },

    /// Generate the daily oracle reading from a briefing request
    Oracle {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Run every engine over a briefing request
    Briefing {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Talk to the coach (one message per line on stdin)
    Chat {
        /// Metrics frame file; all-zero metrics when omitted
        #[arg(long)]
        metrics: Option<PathBuf>,

        /// User name
        #[arg(long)]
        name: Option<String>,

        /// Fitness goal; omitted means no profile
        #[arg(long, value_enum)]
        goal: Option<GoalArg>,

        /// Hour of day (0-23); defaults to the local hour
        #[arg(long)]
        hour: Option<i64>,

        /// Override the thinking delay (ms)
        #[arg(long)]
        thinking_delay_ms: Option<u64>,
    },

    /// Match classifier observations against the food catalog
    Scan {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Performance,
}

impl From<GoalArg> for FitnessGoal {
    fn from(goal: GoalArg) -> Self {
        match goal {
            GoalArg::WeightLoss => FitnessGoal::WeightLoss,
            GoalArg::MuscleGain => FitnessGoal::MuscleGain,
            GoalArg::Maintenance => FitnessGoal::Maintenance,
            GoalArg::Performance => FitnessGoal::Performance,
        }
    }
}

fn main() -> ExitCode {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), ForgeCliError> {
    let pretty = cli.pretty;

    match cli.command {
        Commands::Score { input, breakdown } => cmd_score(&input.input, breakdown, pretty),
        Commands::Forecast { input, hour, goal } => {
            cmd_forecast(&input.input, hour, goal.into(), pretty)
        }
        Commands::Oracle { input } => cmd_oracle(&input.input, pretty),
        Commands::Briefing { input } => cmd_briefing(&input.input, pretty),
        Commands::Chat {
            metrics,
            name,
            goal,
            hour,
            thinking_delay_ms,
        } => cmd_chat(metrics.as_deref(), name, goal, hour, thinking_delay_ms),
        Commands::Scan { input } => cmd_scan(&input.input, pretty),
        Commands::Doctor { json } => cmd_doctor(json),
    }
}

fn cmd_score(input: &Path, breakdown: bool, pretty: bool) -> Result<(), ForgeCliError> {
    let frame: MetricsFrame = serde_json::from_str(&read_input(input)?)?;
    let score = wellness_score(&frame);

    let output = if breakdown {
        let parts = ScoreBreakdown::of(&frame);
        serde_json::json!({
            "score": score,
            "breakdown": {
                "steps": parts.steps,
                "sleep": parts.sleep,
                "heart_rate": parts.heart_rate,
                "hrv": parts.hrv,
            }
        })
    } else {
        serde_json::json!({ "score": score })
    };

    print_json(&output, pretty)
}

fn cmd_forecast(
    input: &Path,
    hour: Option<i64>,
    goal: FitnessGoal,
    pretty: bool,
) -> Result<(), ForgeCliError> {
    let frame: MetricsFrame = serde_json::from_str(&read_input(input)?)?;
    let hour = resolve_hour(hour)?;
    print_json(&predict_slump(&frame, hour, goal), pretty)
}

fn cmd_oracle(input: &Path, pretty: bool) -> Result<(), ForgeCliError> {
    let request = read_request(input)?;
    let nutrition = NutritionTotals::from_meals(&request.meals);
    print_json(
        &generate_oracle(&request.metrics, &nutrition, request.hour),
        pretty,
    )
}

fn cmd_briefing(input: &Path, pretty: bool) -> Result<(), ForgeCliError> {
    let request = read_request(input)?;
    print_json(&daily_briefing(&request), pretty)
}

fn cmd_chat(
    metrics: Option<&Path>,
    name: Option<String>,
    goal: Option<GoalArg>,
    hour: Option<i64>,
    thinking_delay_ms: Option<u64>,
) -> Result<(), ForgeCliError> {
    let frame = match metrics {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => MetricsFrame::default(),
    };

    let user = match (name, goal) {
        (None, None) => None,
        (name, goal) => Some(UserContext::new(
            name.unwrap_or_default(),
            goal.map(FitnessGoal::from).unwrap_or_default(),
        )),
    };

    let hour = resolve_hour(hour)?;

    let mut config = ForgeConfig::from_env()?;
    if let Some(ms) = thinking_delay_ms {
        config = config.with_thinking_delay(Duration::from_millis(ms));
    }
    let coach = Coach::from_config(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(chat_loop(coach, frame, user, hour))
}

async fn chat_loop(
    coach: Coach,
    frame: MetricsFrame,
    user: Option<UserContext>,
    hour: u8,
) -> Result<(), ForgeCliError> {
    let mut session = ChatSession::new(Utc::now());
    let interactive = atty::is(atty::Stream::Stdin);
    let mut stdout = io::stdout();

    if let Some(welcome) = session.turns().first() {
        writeln!(stdout, "coach> {}", welcome.content)?;
    }

    // Ctrl-C cancels a pending reply, or ends the chat while waiting for input
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("chat interrupted");
                break;
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        if interactive {
            writeln!(stdout, "coach is thinking... (Ctrl-C to cancel)")?;
            stdout.flush()?;
        }

        let reply = tokio::select! {
            result = session.send(&coach, &line, frame, user.clone(), hour, Utc::now) => {
                result.map(|turn| turn.content.clone())
            }
            _ = tokio::signal::ctrl_c() => Err(ForgeError::ReplyCancelled),
        };

        match reply {
            Ok(content) => writeln!(stdout, "coach> {}", content)?,
            Err(ForgeError::ReplyCancelled) => {
                info!("reply cancelled");
                writeln!(stdout, "coach> (cancelled)")?;
            }
            Err(e) => return Err(e.into()),
        }
        stdout.flush()?;
    }

    debug!(turns = session.turns().len(), "chat finished");
    Ok(())
}

fn cmd_scan(input: &Path, pretty: bool) -> Result<(), ForgeCliError> {
    let observations: Vec<Classification> = serde_json::from_str(&read_input(input)?)?;
    let config = ForgeConfig::from_env()?;
    let catalog = FoodCatalog::with_config(&config);

    let top = FoodCatalog::describe_top(&observations);
    match catalog.best_match(&observations) {
        Some(item) => print_json(
            &serde_json::json!({ "match": item, "top_label": top }),
            pretty,
        ),
        None => Err(ForgeCliError::NoFoodMatch(top)),
    }
}

fn cmd_doctor(json: bool) -> Result<(), ForgeCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "forge_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Forge version {}", FORGE_VERSION),
    });

    match ForgeConfig::from_env() {
        Ok(config) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "thinking delay {} ms, food confidence > {}, {} food candidates",
                config.thinking_delay.as_millis(),
                config.food_min_confidence,
                config.food_candidate_limit
            ),
        }),
        Err(e) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        }),
    }

    let catalog = FoodCatalog::default();
    checks.push(DoctorCheck {
        name: "food_catalog".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} entries", catalog.keys().count()),
    });

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive chat)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (scripted input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FORGE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Forge Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(ForgeCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, ForgeCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_request(input: &Path) -> Result<BriefingRequest, ForgeCliError> {
    Ok(parse_request(&read_input(input)?)?)
}

fn resolve_hour(hour: Option<i64>) -> Result<u8, ForgeCliError> {
    let hour = hour.unwrap_or_else(|| i64::from(Local::now().hour()));
    Ok(checked_hour(hour)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ForgeCliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

enum ForgeCliError {
    Io(io::Error),
    Parse(ForgeError),
    Json(serde_json::Error),
    NoFoodMatch(Option<String>),
    DoctorFailed,
}

impl From<io::Error> for ForgeCliError {
    fn from(e: io::Error) -> Self {
        ForgeCliError::Io(e)
    }
}

impl From<ForgeError> for ForgeCliError {
    fn from(e: ForgeError) -> Self {
        ForgeCliError::Parse(e)
    }
}

impl From<serde_json::Error> for ForgeCliError {
    fn from(e: serde_json::Error) -> Self {
        ForgeCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ForgeCliError> for CliError {
    fn from(e: ForgeCliError) -> Self {
        match e {
            ForgeCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ForgeCliError::Parse(ForgeError::InvalidConfig { key, reason }) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: format!("{}: {}", key, reason),
                hint: Some("Fix or unset the variable in the environment or .env".to_string()),
            },
            ForgeCliError::Parse(ForgeError::InvalidHour(hour)) => CliError {
                code: "INVALID_HOUR".to_string(),
                message: format!("Hour {} is out of range", hour),
                hint: Some("Use an hour between 0 and 23".to_string()),
            },
            ForgeCliError::Parse(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the briefing request format".to_string()),
            },
            ForgeCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ForgeCliError::NoFoodMatch(top) => CliError {
                code: "NO_FOOD_MATCH".to_string(),
                message: match top {
                    Some(label) => format!("No catalog food matched (top label: {})", label),
                    None => "No observations in input".to_string(),
                },
                hint: Some("Run 'forge doctor' to see catalog size".to_string()),
            },
            ForgeCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Error,
}
