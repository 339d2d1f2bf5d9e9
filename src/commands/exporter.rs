// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::export::archive_name;
use crate::pipeline;
use crate::utils::{arg, parse_year};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(arg(m, "year")?)?;
    let out = m.get_one::<String>("out").map(PathBuf::from);

    if m.get_flag("dir") {
        let dir = out.unwrap_or_else(|| PathBuf::from(format!("ExportedFinancialData{}", year)));
        let bundle = pipeline::export_bundle(conn, user, year)?;
        fs::create_dir_all(&dir).with_context(|| format!("Create {}", dir.display()))?;
        for (name, body) in &bundle {
            let path = dir.join(name);
            fs::write(&path, body).with_context(|| format!("Write {}", path.display()))?;
        }
        println!("Exported {} files to {}", bundle.len(), dir.display());
    } else {
        let (name, bytes) = pipeline::export_archive(conn, user, year)?;
        let path = out.unwrap_or_else(|| PathBuf::from(&name));
        fs::write(&path, &bytes).with_context(|| format!("Write {}", path.display()))?;
        println!("Exported {} to {}", archive_name(year), path.display());
    }
    Ok(())
}
