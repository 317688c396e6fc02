// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `canvas`: validate, normalise and summarise `.canvas` documents.

mod cli;
mod commands;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use canvas_store::{ConfigService, FsConfigStore, ToolPrefs};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{FmtFlags, PrefsUpdate};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(io::stderr)
        .init();

    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    let service = match store {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) => {
            warn!(error = %err, "config store unavailable; using default preferences");
            None
        }
    };
    let prefs = service.as_ref().map_or_else(ToolPrefs::default, |service| {
        ToolPrefs::load(service).unwrap_or_else(|err| {
            warn!(error = %err, "could not read preferences; using defaults");
            ToolPrefs::default()
        })
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let ok = match cli.command {
        Commands::Check { file, strict } => commands::check(&mut out, &file, strict, &prefs)?,
        Commands::Fmt {
            file,
            output,
            compact,
            literal_newlines,
        } => {
            let flags = FmtFlags {
                compact,
                literal_newlines,
            };
            commands::fmt(&mut out, &file, output, flags, &prefs)?;
            true
        }
        Commands::Stats { file } => {
            commands::stats(&mut out, &file, &prefs)?;
            true
        }
        Commands::Ids { file } => {
            commands::ids(&mut out, &file, &prefs)?;
            true
        }
        Commands::Prefs {
            strict_references,
            pretty,
            newline_mode,
            indent,
        } => {
            let Some(service) = &service else {
                anyhow::bail!("no config directory available; pass --config-dir");
            };
            let update = PrefsUpdate {
                strict_references,
                pretty,
                newline_mode,
                indent,
            };
            commands::prefs(&mut out, service, update)?;
            true
        }
    };
    out.flush()?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
