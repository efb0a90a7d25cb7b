//! Startup entry point: resolve config, open the store, seed sample data once.

use log::error;
use std::process::ExitCode;
use userbase_core::{
    init_logging, open_target, AppConfig, RepoError, SeedService, SqliteAccountRepository,
    SqliteProfileRepository,
};

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("userbase: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("userbase: logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=startup module=cli status=error error={err}");
            eprintln!("userbase: seeding failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), RepoError> {
    let conn = open_target(&config.db_target)?;
    let accounts = SqliteAccountRepository::try_new(&conn)?;
    let profiles = SqliteProfileRepository::try_new(&conn)?;

    let report = SeedService::new(accounts, profiles).seed_defaults()?;

    println!("userbase_core version={}", userbase_core::core_version());
    println!(
        "seeded={} skipped={}",
        report.seeded.len(),
        report.skipped.len()
    );
    for seeded in &report.seeded {
        println!(
            "account_id={} profile_id={}",
            seeded.account.id, seeded.profile.id
        );
    }
    Ok(())
}
