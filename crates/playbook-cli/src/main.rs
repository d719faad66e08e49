//! `playbook` – cross-or-center simulation harness
//!
//! Runs the [`CrossOrCenter`][playbook_gameplay::CrossOrCenter] play in a
//! tick loop against a heuristic pass oracle and simulated pass tasks.  It:
//!
//! 1. Loads `~/.playbook/config.toml` (or `--config PATH`), falling back to
//!    defaults with `PLAYBOOK_*` overrides applied.
//! 2. Runs the configured number of ticks, printing every selection and
//!    binding change.
//! 3. Intercepts **Ctrl-C** to stop the loop and deactivate the play cleanly.
//! 4. Prints the play metrics as JSON.
//!
//! `--write-default-config` writes the default config file and exits.

mod config;
mod sim;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use colored::Colorize;
use playbook_gameplay::{BindingEvent, TickReport, init_tracing};
use tracing::{error, warn};

/// Run the cross-or-center play against a simulated field.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to load instead of `~/.playbook/config.toml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default config to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG filters, PLAYBOOK_LOG_FORMAT=json switches to JSON lines and
    // OTEL_EXPORTER_OTLP_ENDPOINT enables span export.  Tick output below
    // still goes through println! for readability.
    let _otel_guard = init_tracing("playbook");

    let args = Args::parse();
    let path = args.config.unwrap_or_else(config::config_path);

    if args.write_default_config {
        return match config::save_to(&config::Config::default(), &path) {
            Ok(()) => {
                println!("  Default config written to {}", path.display().to_string().bold());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", "Config error".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    print_banner();

    let cfg = match config::load_from(&path) {
        Ok(Some(cfg)) => {
            println!("  Config loaded from {}", path.display().to_string().bold());
            cfg
        }
        Ok(None) => {
            println!("  No config at {}; using defaults.", path.display().to_string().dimmed());
            default_with_overrides()
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            default_with_overrides()
        }
    };

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping the play …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; the run can only end by tick limit");
    }

    println!(
        "  Ball at {}, {} robot(s), {} tick(s)\n",
        cfg.ball.to_string().bold(),
        cfg.robots.len(),
        cfg.ticks
    );

    let metrics = match sim::run(&cfg, &shutdown, print_tick) {
        Ok(metrics) => metrics,
        Err(e) => {
            error!(error = %e, "simulation aborted");
            eprintln!("{}: {}", "Simulation error".red(), e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("{}", "  ✓ Play deactivated.".green());
    match serde_json::to_string_pretty(&metrics) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!(error = %e, "could not serialise metrics"),
    }
    ExitCode::SUCCESS
}

fn default_with_overrides() -> config::Config {
    let mut cfg = config::Config::default();
    config::apply_env_overrides(&mut cfg);
    cfg
}

fn print_banner() {
    println!();
    println!("{}", "  playbook · cross or center".bold().cyan());
    println!("{}", "  ──────────────────────────".dimmed());
}

fn print_tick(tick: u64, report: &TickReport) {
    let prefix = format!("[{tick:>4}]").dimmed();
    if report.completed {
        println!("{prefix} {}", "pass completed".green());
    }
    if let Some(sel) = &report.selection {
        println!(
            "{prefix} target {} on line {} (raw {:.3}, effective {:.3})",
            sel.point.to_string().bold(),
            sel.priority,
            sel.raw_score,
            sel.effective_score
        );
    }
    if let Some(err) = &report.task_failure {
        println!("{prefix} {}: {}", "task failed".yellow(), err);
    }
    match report.binding {
        BindingEvent::Unchanged => {}
        BindingEvent::Bound(robot) => {
            println!("{prefix} bound robot {}", robot.to_string().cyan());
        }
        BindingEvent::Released { robot, reason } => {
            println!("{prefix} released robot {} ({})", robot.to_string().yellow(), reason);
        }
        BindingEvent::Rebound { from, to, reason } => {
            println!(
                "{prefix} rebound robot {} → {} ({})",
                from.to_string().yellow(),
                to.to_string().cyan(),
                reason
            );
        }
    }
}
