//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `ironlog_core` linkage and the configured store end to end.
//! - Keep output deterministic for quick local sanity checks.

use ironlog_core::{
    open_store_from_env, ProgressService, SqliteProgressRepository, SqliteTemplateRepository,
    TemplateService,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("ironlog_core version={}", ironlog_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("ironlog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let conn = open_store_from_env()?;

    let templates = TemplateService::new(SqliteTemplateRepository::try_new(&conn)?);
    println!("templates={}", templates.count_templates()?);

    let progress = ProgressService::new(SqliteProgressRepository::try_new(&conn)?);
    for name in progress.exercise_names()? {
        println!("exercise={name}");
    }
    Ok(())
}
