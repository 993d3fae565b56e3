use anyhow::Result;
use clap::{Arg, Command};
use devconnect::db::{get_db_pool, requests, users, DatabaseConfig};
use devconnect::utils::init_logging;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct AuditReport {
    users: i64,
    requests_by_status: Vec<requests::StatusCount>,
    violations: Vec<requests::LedgerViolation>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("ledger-audit")
        .about("Report connection request counts and verify ledger invariants")
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON instead of log lines")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .help("Database to audit (defaults to DATABASE_URL)")
                .num_args(1),
        )
        .get_matches();

    let as_json = matches.get_flag("json");

    let db_config = match matches.get_one::<String>("database-url") {
        Some(url) => DatabaseConfig {
            database_url: url.clone(),
            max_connections: 2,
        },
        None => DatabaseConfig {
            max_connections: 2,
            ..DatabaseConfig::from_env()?
        },
    };

    let pool = get_db_pool(&db_config).await?;

    let report = AuditReport {
        users: users::count_users(&pool).await?,
        requests_by_status: requests::count_requests_by_status(&pool).await?,
        violations: requests::find_ledger_violations(&pool).await?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!("📒 Users in directory: {}", report.users);
        for count in &report.requests_by_status {
            info!("📊 {:>10}: {}", count.status, count.count);
        }
        if report.violations.is_empty() {
            info!("✅ Ledger invariants hold");
        }
        for violation in &report.violations {
            error!("❌ Request {}: {}", violation.request_id, violation.problem);
        }
    }

    if !report.violations.is_empty() {
        anyhow::bail!("{} ledger invariant violations found", report.violations.len());
    }

    Ok(())
}
