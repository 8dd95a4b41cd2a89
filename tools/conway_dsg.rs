// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Conway Data Spec Generator

Builds a toroidal Game of Life board seeded with a glider and writes one data
specification per cell into the configured application data folder.

Usage:
  cargo run --bin conway_dsg -- [--width=N] [--height=N] [--steps=N] [--config=PATH]
                                [--<override>=<value> ...] [--debug-<crate>]

Overrides use the configuration loader's keys, e.g. `--app_data_folder=/tmp/run1`
or `--write_text_specs=true`.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use anyhow::{bail, Context, Result};
use gridcore::config::{apply_cli_overrides, find_config_file, load_config, validate_config, GridcoreConfig};
use gridcore::dsg::{RecordingConfig, RunLength};
use gridcore::frontend::{generate_all, BatchOptions, ConwayGrid};
use gridcore::observability::{
    debug_flags_help, init_console_logging, is_debug_flag, parse_debug_flags, LogFormat, LogSettings,
};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::{error, info, warn};

const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

struct Args {
    width: usize,
    height: usize,
    steps: Option<u32>,
    config: Option<PathBuf>,
    overrides: HashMap<String, String>,
    debug_args: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        width: 7,
        height: 7,
        steps: None,
        config: None,
        overrides: HashMap::new(),
        debug_args: Vec::new(),
    };

    for arg in env::args().skip(1) {
        if arg == "--help" {
            println!("Usage: conway_dsg [--width=N] [--height=N] [--steps=N] [--config=PATH] [--<key>=<value>]\n");
            print!("{}", debug_flags_help());
            std::process::exit(0);
        }
        if is_debug_flag(&arg) {
            args.debug_args.push(arg);
            continue;
        }
        let Some((key, value)) = arg.strip_prefix("--").and_then(|a| a.split_once('=')) else {
            bail!("unrecognised argument '{}', expected --key=value", arg);
        };
        match key {
            "width" => args.width = value.parse().context("--width must be a number")?,
            "height" => args.height = value.parse().context("--height must be a number")?,
            "steps" => args.steps = Some(value.parse().context("--steps must be a number")?),
            "config" => args.config = Some(PathBuf::from(value)),
            _ => {
                args.overrides.insert(key.to_string(), value.to_string());
            }
        }
    }

    if args.width < 3 || args.height < 3 {
        bail!("the board must be at least 3x3 so every cell has eight distinct neighbours");
    }
    Ok(args)
}

fn resolve_config(args: &Args) -> Result<GridcoreConfig> {
    let explicit = args.config.clone().or_else(|| find_config_file().ok());
    match explicit {
        Some(path) => load_config(Some(&path), Some(&args.overrides))
            .with_context(|| format!("failed to load {}", path.display())),
        None => {
            let mut config = GridcoreConfig::default();
            apply_cli_overrides(&mut config, &args.overrides);
            validate_config(&config)?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = resolve_config(&args)?;

    let settings = LogSettings {
        level: config.logging.level.clone(),
        format: LogFormat::Text,
        log_dir: Some(config.logging.log_dir.clone()),
        retention_days: config.logging.retention_days,
        retention_runs: config.logging.retention_runs,
    };
    let debug_flags = parse_debug_flags(&args.debug_args);
    #[cfg(feature = "file-logging")]
    let _guard = if config.logging.file_logging {
        Some(gridcore::observability::init_logging(&debug_flags, &settings)?)
    } else {
        init_console_logging(&debug_flags, &settings)?;
        None
    };
    #[cfg(not(feature = "file-logging"))]
    init_console_logging(&debug_flags, &settings)?;

    for name in debug_flags.unknown() {
        warn!(target: "gridcore", "Ignoring debug flag for unknown crate '{}'", name);
    }

    let recording = RecordingConfig::from_buffers(&config.buffers)?;
    let mut grid = ConwayGrid::torus(
        args.width,
        args.height,
        config.machine.machine_time_step,
        &config.machine.hostname,
        |x, y| GLIDER.contains(&(x, y)),
    )?;

    if let Some(steps) = args.steps {
        for y in 0..grid.height {
            for x in 0..grid.width {
                let id = grid.cell_id(x, y);
                if let Some(cell) = grid.graph.vertex_mut(id) {
                    cell.simulator_mut().set_run_length(RunLength::Steps(steps))?;
                }
            }
        }
    }

    let options = BatchOptions::from_config(&config);
    info!(
        target: "gridcore",
        "Writing {}x{} board to {}",
        grid.width,
        grid.height,
        options.run_root
    );
    let report = generate_all(&grid.graph, &grid.routing, &grid.placements, &recording, &options)?;

    for outcome in report.failed() {
        if let Err(e) = &outcome.result {
            error!(target: "gridcore", "{}: {}", outcome.vertex, e);
        }
    }
    println!(
        "{} data specs written, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
    if !report.is_complete() {
        bail!("data spec generation incomplete");
    }
    Ok(())
}
