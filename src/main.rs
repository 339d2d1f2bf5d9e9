// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use monthwise::{cli, commands, db, utils};

fn init_logging() {
    let filter = EnvFilter::try_from_env("MONTHWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_flag = matches.get_one::<String>("db").map(PathBuf::from);
    let conn = db::open_or_init(db_flag.as_deref())?;
    let user = utils::resolve_user(&conn, matches.get_one::<String>("user"))?;
    tracing::debug!(%user, "resolved user");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {}",
                db::db_path(db_flag.as_deref())?.display()
            );
        }
        Some(("budget", sub)) => commands::budgets::handle(&conn, &user, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &user, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, &user, sub)?,
        Some(("template", sub)) => commands::templates::handle(&conn, &user, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, &user, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &user, sub)?,
        Some(("doctor", sub)) => {
            if commands::doctor::handle(&conn, &user, sub)? > 0 {
                std::process::exit(1);
            }
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
