use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the spring pendulum")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and the headless smoke run
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run the mesh build benchmark in release mode
    Bench,
    /// Simulate headlessly and check the bob settles near its rest point
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_smoke()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Bench => run_bench()?,
        Commands::Smoke => run_smoke()?,
    }

    Ok(())
}

fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {what}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn run_bench() -> Result<()> {
    cargo(
        "bench (mesh)",
        &["bench", "-p", "pendulum-mesh", "--bench", "bench_mesh_build"],
    )
}

/// Rest point for the default anchor `(0, 10, 0)`.
const EQUILIBRIUM_Y: f64 = 0.19;

fn run_smoke() -> Result<()> {
    println!("==> Running pendulum-cli simulate");
    let output = Command::new("cargo")
        .args([
            "run", "-q", "-p", "pendulum-cli", "--", "simulate", "--steps", "30000", "--dt",
            "0.01", "--every", "30000", "--json",
        ])
        .output()?;
    if !output.status.success() {
        anyhow::bail!(
            "pendulum-cli simulate failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let stdout = String::from_utf8(output.stdout).context("simulate output is not UTF-8")?;
    let y = final_bob_y(&stdout)?;
    if (y - EQUILIBRIUM_Y).abs() > 1e-2 {
        anyhow::bail!("bob settled at y={y}, expected {EQUILIBRIUM_Y}");
    }
    println!("bob settled at y={y:.4}");
    Ok(())
}

/// The bob's y from the summary block of the simulate JSON.
fn final_bob_y(json: &str) -> Result<f64> {
    let report: serde_json::Value = serde_json::from_str(json)?;
    report["summary"]["bob"][1]
        .as_f64()
        .context("no bob position in simulate output")
}
