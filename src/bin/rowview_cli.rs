//! CLI tool for rowview - simulates a scroll session and outputs JSON
//!
//! Drives the windowing engine over a simulated surface: scrolls down in
//! fixed steps, jumps back up mid-run to exercise recycling, and reports
//! per-step operations plus final window metrics.
//!
//! Usage:
//!   rowview_cli [steps]                  # Output JSON to stdout
//!   rowview_cli [steps] -o out.json      # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;

use rowview::{
    DataSource, GridConfig, Result, RowWindowManager, SimSurface, UpdateOps, WindowMetrics,
};

/// Visible height of the simulated container in pixels.
const VIEWPORT_HEIGHT: f64 = 600.0;

/// Scroll distance per step, in rows.
const ROWS_PER_STEP: u64 = 4;

/// Default number of scroll steps.
const DEFAULT_STEPS: u64 = 20;

/// Synthetic data source labeling each cell with its coordinates.
struct LabelSource {
    columns: usize,
}

impl DataSource for LabelSource {
    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn get_item(&self, row: u64, col: usize) -> Result<String> {
        Ok(format!("R{row}C{col}"))
    }
}

#[derive(Serialize)]
struct StepReport {
    step: u64,
    scroll_top: f64,
    ops: UpdateOps,
}

#[derive(Serialize)]
struct SessionReport {
    steps: Vec<StepReport>,
    metrics: WindowMetrics,
}

fn run_session(steps: u64) -> Result<SessionReport> {
    let config = GridConfig::default();
    let source = LabelSource { columns: 4 };
    let mut surface = SimSurface::new(VIEWPORT_HEIGHT);
    let mut manager = RowWindowManager::new(config, source.number_of_columns())?;

    let extent = config.row_extent();
    let mut reports = Vec::with_capacity(steps as usize + 1);

    for step in 0..=steps {
        // Scroll steadily down, with one jump back to the top two thirds
        // of the way through to exercise pool reuse.
        let scroll_top = if steps > 2 && step == steps * 2 / 3 {
            0.0
        } else {
            step as f64 * ROWS_PER_STEP as f64 * extent
        };
        surface.set_scroll_top(scroll_top);
        let ops = manager.render(&mut surface, &source)?;
        reports.push(StepReport {
            step,
            scroll_top,
            ops,
        });
    }

    Ok(SessionReport {
        steps: reports,
        metrics: manager.metrics(),
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut steps = DEFAULT_STEPS;
    let mut output_path: Option<&String> = None;

    let mut i = 1;
    while i < args.len() {
        if args[i] == "-o" {
            if i + 1 >= args.len() {
                eprintln!("Usage: rowview_cli [steps] [-o output.json]");
                std::process::exit(1);
            }
            output_path = Some(&args[i + 1]);
            i += 2;
        } else {
            steps = match args[i].parse() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Invalid step count: {}", args[i]);
                    std::process::exit(1);
                }
            };
            i += 1;
        }
    }

    // Run the simulation
    let report = match run_session(steps) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running session: {}", e);
            std::process::exit(1);
        }
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
