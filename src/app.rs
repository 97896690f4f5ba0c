//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads and groups the rate sheet
//! - asks for confirmation before remote work
//! - runs the batch and prints progress and the final report

use clap::Parser;
use serde_json::Value;

use crate::cli::{Command, CreateArgs, InputArgs, RemoteArgs, SplitArgs, ZipGroupArgs};
use crate::config::ApiConfig;
use crate::domain::{Classification, ClassificationKey, EffectiveWindow, RateGroups, RecordDefaults, Terminal};
use crate::error::AppError;
use crate::io::ingest::ColumnNames;
use crate::report::{format_plan, format_summary, summarize};

pub mod pipeline;

/// Entry point for the `ziprates` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Plan(args) => handle_plan(args),
        Command::Create(args) => handle_create(args),
        Command::Split(args) => handle_split(args),
        Command::ZipGroups(args) => handle_zip_groups(args),
    }
}

fn handle_plan(args: InputArgs) -> Result<(), AppError> {
    let groups = pipeline::load_groups(&args.file, &column_names(&args))?;
    print!("{}", format_plan(&groups));
    Ok(())
}

fn handle_create(args: CreateArgs) -> Result<(), AppError> {
    let defaults = record_defaults_from_args(&args)?;
    let terminal = terminal_from_args(&args)?;

    let groups = pipeline::load_groups(&args.input.file, &column_names(&args.input))?;
    print!("{}", format_plan(&groups));
    if groups.is_empty() {
        println!("\nNo rates to create.");
        return Ok(());
    }

    // Credentials are only needed once there is remote work to do.
    let api = ApiConfig::resolve(args.remote.base_url.clone(), args.remote.token.clone())?;

    let question = format!(
        "\nCreate {} rate record(s) in {} mode for terminal '{}'?",
        groups.len(),
        args.mode.display_name(),
        terminal.name
    );
    confirm_or_cancel(&args.remote, &question)?;

    let run = pipeline::CreateRun {
        api,
        mode: args.mode,
        terminal,
        defaults,
        workers: args.remote.workers,
    };
    let outcomes = pipeline::run_create(&groups, &run)?;
    print!("{}", format_summary(&summarize(&outcomes)));
    Ok(())
}

fn handle_split(args: SplitArgs) -> Result<(), AppError> {
    let groups = pipeline::load_groups(&args.input.file, &column_names(&args.input))?;
    let written = crate::io::export::write_group_files(&args.out_dir, &groups)?;
    println!("\nWrote {} file(s) to {}", written.len(), args.out_dir.display());
    Ok(())
}

fn handle_zip_groups(args: ZipGroupArgs) -> Result<(), AppError> {
    let groups = pipeline::load_groups(&args.input.file, &column_names(&args.input))?;
    print!("{}", format_plan(&groups));
    if groups.is_empty() {
        println!("\nNo zip groups to create.");
        return Ok(());
    }

    let api = ApiConfig::resolve(args.remote.base_url.clone(), args.remote.token.clone())?;

    confirm_or_cancel(&args.remote, &zip_group_question(&groups))?;

    let outcomes = pipeline::run_zip_groups(&groups, api, args.remote.workers)?;
    print!("{}", format_summary(&summarize(&outcomes)));
    Ok(())
}

fn zip_group_question(groups: &RateGroups) -> String {
    format!("\nCreate {} zip-code group profile(s)?", groups.len())
}

fn confirm_or_cancel(remote: &RemoteArgs, question: &str) -> Result<(), AppError> {
    if remote.yes || crate::cli::prompt::confirm(question)? {
        return Ok(());
    }
    Err(AppError::new(3, "Operation cancelled."))
}

fn column_names(args: &InputArgs) -> ColumnNames {
    ColumnNames {
        location: args.zip_column.clone(),
        rate: args.rate_column.clone(),
    }
}

fn terminal_from_args(args: &CreateArgs) -> Result<Terminal, AppError> {
    let id = args.terminal_id.trim();
    let name = args.terminal_name.trim();
    if id.is_empty() || name.is_empty() {
        return Err(AppError::new(2, "Terminal id and name must not be empty."));
    }
    Ok(Terminal::new(id, name))
}

pub fn record_defaults_from_args(args: &CreateArgs) -> Result<RecordDefaults, AppError> {
    let base = RecordDefaults::default();

    let effective = EffectiveWindow::new(
        args.effective_start.unwrap_or_else(|| base.effective.start()),
        args.effective_end.unwrap_or_else(|| base.effective.end()),
    )
    .map_err(|e| AppError::new(2, e))?;

    let mut classification = Classification::default();
    for raw in &args.classifications {
        let (key, value) = parse_classification(raw)?;
        classification.set(key, value);
    }

    let defaults = RecordDefaults {
        load_types: args.load_types.iter().map(|t| t.trim().to_string()).collect(),
        effective,
        description: args.description.clone(),
        charge_name: args.charge_name.clone(),
        charge_code: args.charge_code.clone(),
        charge_description: args.charge_description.clone(),
        charge_profile_groups: args.charge_profile_groups.clone(),
        classification,
    };
    defaults.validate().map_err(|e| AppError::new(2, e))?;
    Ok(defaults)
}

/// `key=value`; the value is JSON if it parses as JSON, otherwise a string.
fn parse_classification(raw: &str) -> Result<(ClassificationKey, Value), AppError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(AppError::new(
            2,
            format!("Invalid classification '{raw}': expected KEY=VALUE."),
        ));
    };
    let key: ClassificationKey = key.trim().parse().map_err(|e: String| AppError::new(2, e))?;

    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key, value))
}
