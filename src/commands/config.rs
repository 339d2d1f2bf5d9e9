// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_setting, set_setting, DEFAULT_USER};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("user", sub)) = m.subcommand() {
        match sub.get_one::<String>("name").map(|n| n.trim()) {
            Some("") => bail!("User name cannot be blank"),
            Some(name) => {
                set_setting(conn, "default_user", name)?;
                println!("Default user set to '{}'", name);
            }
            None => {
                let current = get_setting(conn, "default_user")?;
                println!("{}", current.as_deref().unwrap_or(DEFAULT_USER));
            }
        }
    }
    Ok(())
}
