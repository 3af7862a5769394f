use std::io::IsTerminal;
use std::time::SystemTime;

use chrono::Utc;

use crate::cli::{Cli, Commands, RunArgs};
use crate::config::RunConfig;
use crate::consts::HISTORY_TIME_FORMAT;
use crate::error::AppError;
use crate::generator::{Launcher, RunInvocation, RunOutcome, current_seed, error_lines};
use crate::notify::{Notification, RunStatus, build_notifiers, dispatch};
use crate::output::{
    output_history_json, output_run_json, output_selection_json, print_history_table,
    print_selection, tail,
};
use crate::prompt::Selection;
use crate::recorder::{HistoryUpdate, Recorder, open_run_log, read_history};
use crate::utils::{LogLevel, init_logging, validate_day};

/// Lines of raw output sent when a failure printed no error lines
const FALLBACK_TAIL_LINES: usize = 20;

/// Execute the selected command. The returned code becomes the process exit code.
pub(crate) fn execute(cli: &Cli, config: &RunConfig) -> Result<i32, AppError> {
    let level = cli.log_level();
    match cli.command() {
        Commands::Run(args) => run(config, &args, level),
        Commands::Prompt { day, json } => {
            start_console_logging(config, level)?;
            let selection = select(config, day)?;
            if json {
                println!("{}", output_selection_json(&selection));
            } else {
                print_selection(&selection);
            }
            Ok(0)
        }
        Commands::History { limit, json } => {
            start_console_logging(config, level)?;
            let records = read_history(&config.history_file)?;
            let records = tail(&records, limit);
            if json {
                println!("{}", output_history_json(records));
            } else if records.is_empty() {
                println!("No images recorded in {}.", config.history_file.display());
            } else {
                print_history_table(records, std::io::stdout().is_terminal());
            }
            Ok(0)
        }
        Commands::Rotate => {
            start_console_logging(config, level)?;
            let report = recorder(config).rotate(SystemTime::now());
            println!(
                "Removed {} log file(s) from {}",
                report.removed.len(),
                config.log_dir.display()
            );
            Ok(0)
        }
    }
}

fn start_console_logging(config: &RunConfig, level: LogLevel) -> Result<(), AppError> {
    init_logging(level, None)?;
    log_config_warnings(config);
    Ok(())
}

fn log_config_warnings(config: &RunConfig) {
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(
        "Env files: {} (preferred), {} (fallback)",
        config.preferred_env.display(),
        config.fallback_env.display()
    );
    if let Some(path) = &config.settings_path {
        tracing::debug!("Loaded settings from {}", path.display());
    }
}

fn recorder(config: &RunConfig) -> Recorder<'_> {
    Recorder::new(&config.history_file, &config.log_dir, config.retention_days)
}

/// Prompt for an explicit day, or for today in the configured timezone
fn select(config: &RunConfig, day: Option<u32>) -> Result<Selection<'_>, AppError> {
    let day = match day {
        Some(day) => validate_day(day)?,
        None => config.timezone.rotation_day(Utc::now()),
    };
    Ok(config.catalog.select(day))
}

fn run(config: &RunConfig, args: &RunArgs, level: LogLevel) -> Result<i32, AppError> {
    let started = config.timezone.now();

    if args.dry_run {
        start_console_logging(config, level)?;
        let selection = select(config, args.day)?;
        let invocation =
            RunInvocation::new(selection.prompt, current_seed(), &config.bucket, &config.region);
        println!("{}", Launcher::from_config(config).display(&invocation));
        return Ok(0);
    }

    let (log_path, log_file) = open_run_log(&config.log_dir, started)?;
    init_logging(level, Some(log_file))?;
    log_config_warnings(config);
    tracing::info!(
        "=== Daily generation started {} ===",
        started.format(HISTORY_TIME_FORMAT)
    );
    tracing::debug!("Run log: {}", log_path.display());

    let result = generate(config, args);

    // Retention runs at the end of every run, failed ones included.
    recorder(config).rotate(SystemTime::now());

    match &result {
        Ok(code) => tracing::info!("=== Daily generation finished with exit code {code} ==="),
        Err(e) => tracing::error!("=== Daily generation aborted: {e} ==="),
    }
    result
}

fn generate(config: &RunConfig, args: &RunArgs) -> Result<i32, AppError> {
    let selection = select(config, args.day)?;
    tracing::info!(
        "Day {} -> prompt #{}: {}",
        selection.day,
        selection.index,
        selection.prompt
    );

    let seed = current_seed();
    let invocation = RunInvocation::new(selection.prompt, seed, &config.bucket, &config.region);
    let launcher = Launcher::from_config(config);
    launcher.check()?;

    tracing::info!(
        "Generating into bucket {} ({}) with seed {seed}",
        config.bucket,
        config.region
    );
    tracing::debug!("Command: {}", launcher.display(&invocation));

    let outcome = RunOutcome::from_captured(launcher.run(&invocation)?);
    let finished = config.timezone.now();

    match recorder(config).record(&outcome, selection.prompt, finished) {
        Ok(HistoryUpdate::Appended(record)) => tracing::debug!("History: {}", record.to_line()),
        Ok(HistoryUpdate::Private | HistoryUpdate::Failed) => {}
        // History is bookkeeping; the generator's exit code still decides.
        Err(e) => tracing::error!("Could not update history: {e}"),
    }

    let message = notification_message(&outcome);
    let notification = Notification {
        status: if outcome.succeeded() {
            RunStatus::Success
        } else {
            RunStatus::Error
        },
        message: &message,
        prompt: selection.prompt,
    };
    dispatch(&build_notifiers(&config.notify), &notification);

    if args.json {
        println!("{}", output_run_json(&selection, seed, &outcome));
    }

    Ok(outcome.exit_code)
}

fn notification_message(outcome: &RunOutcome) -> String {
    if outcome.succeeded() {
        let fields = &outcome.fields;
        return fields
            .public_url
            .clone()
            .or_else(|| fields.storage_uri.clone())
            .unwrap_or_else(|| "Image generated (no URL reported)".to_string());
    }

    let diagnostics = error_lines(&outcome.raw_output);
    if !diagnostics.is_empty() {
        return diagnostics.join("\n");
    }
    let lines: Vec<&str> = outcome.raw_output.lines().collect();
    let start = lines.len().saturating_sub(FALLBACK_TAIL_LINES);
    if start == lines.len() {
        format!("Generator exited with code {}", outcome.exit_code)
    } else {
        lines[start..].join("\n")
    }
}
