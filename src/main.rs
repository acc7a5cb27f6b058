//! Margin Masters terminal game
//!
//! Run with: cargo run
//! Balance the catalog with: cargo run -- --simulate 5000 --policy=greedy

use anyhow::{Context, Result};
use margin_masters::{
    config::GameConfig,
    report,
    session::{GameSession, Phase},
    simulate::{self, Policy, SimulationConfig},
    Catalog, Choice, TerminationRule,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = take_config_path(&mut args)?;
    let config = GameConfig::load(config_path.as_deref())?;

    match args.first().map(|s| s.as_str()) {
        Some("--catalog") => run_catalog(&config),
        Some("--simulate") => run_simulate(config, &args[1..]),
        Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        None | Some("--play") => run_game(config),
        Some(other) => {
            print_usage();
            anyhow::bail!("unknown argument '{}'", other)
        }
    }
}

fn print_usage() {
    println!("Usage: margin-masters [--config <path>] [COMMAND]");
    println!();
    println!("Commands:");
    println!("  --play                         Play interactively (default)");
    println!("  --catalog                      Print the scenario catalog as JSON");
    println!("  --simulate [games] [--policy=always_a|always_b|random|greedy] [--quarters=N]");
    println!("                                 Autoplay seeded games and print statistics");
}

/// Remove `--config <path>` from the argument list
fn take_config_path(args: &mut Vec<String>) -> Result<Option<PathBuf>> {
    match args.iter().position(|a| a == "--config") {
        Some(idx) => {
            let path = args
                .get(idx + 1)
                .cloned()
                .context("Usage: --config <path>")?;
            args.drain(idx..=idx + 1);
            Ok(Some(PathBuf::from(path)))
        }
        None => Ok(None),
    }
}

fn run_catalog(config: &GameConfig) -> Result<()> {
    let catalog = Catalog::from_set(config.catalog)?;
    println!("{}", serde_json::to_string_pretty(&catalog.entries())?);
    Ok(())
}

fn run_simulate(game: GameConfig, args: &[String]) -> Result<()> {
    let mut config = SimulationConfig {
        game,
        ..SimulationConfig::default()
    };

    for arg in args {
        if let Some(policy) = arg.strip_prefix("--policy=") {
            config.policy = policy.parse::<Policy>().map_err(anyhow::Error::msg)?;
        } else if let Some(quarters) = arg.strip_prefix("--quarters=") {
            config.max_quarters = quarters
                .parse()
                .with_context(|| format!("Invalid quarter count '{}'", quarters))?;
        } else {
            config.games = arg
                .parse()
                .with_context(|| format!("Invalid game count '{}'", arg))?;
        }
    }

    let results = simulate::run_simulation(&config)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn run_game(config: GameConfig) -> Result<()> {
    let mut session = GameSession::new(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Margin Masters: Account My Account");
    println!("==================================");
    let ending = match session.termination() {
        TerminationRule::MarginOrCashFloor => "the game ends at 0% margin or -$200,000 cash",
        TerminationRule::Endless => "endless mode",
    };
    println!("{} scenarios in the deck; {}.", session.catalog().len(), ending);
    println!("Answer A or B. Other commands: history, export <path>, restart, quit.\n");

    loop {
        if session.phase() == Phase::GameOver {
            println!("\nGAME OVER after {} quarters.", session.history().len());
            println!("{}", report::metrics_line(session.state()));
            println!("Type 'restart' to play again or 'quit' to exit.");
        } else {
            session.next_scenario()?;
            let quarter = session.state().quarter();
            let scenario = session.present()?;
            println!("\n### Quarter {}: {}", quarter, scenario.name());
            println!("{}", scenario.rendered_text);
            for choice in Choice::ALL {
                println!("  {}) {}", choice, scenario.option_label(choice));
            }
        }

        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "history" => {
                print!("{}", report::history_table(session.history()));
                continue;
            }
            "restart" => {
                session.restart();
                println!("New game started.");
                continue;
            }
            _ => {}
        }

        if let Some(path) = line.strip_prefix("export ") {
            let json = report::SessionExport::from_session(&session).to_json()?;
            std::fs::write(path.trim(), json)
                .with_context(|| format!("Failed to write {}", path.trim()))?;
            println!("Exported to {}", path.trim());
            continue;
        }

        if session.phase() == Phase::GameOver {
            continue;
        }

        match session.choose_label(line) {
            Ok(outcome) => {
                println!("\nOutcome: {}", outcome);
                println!("{}", report::metrics_line(session.state()));
                session.advance()?;
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}
