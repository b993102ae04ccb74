//! Postflop drill CLI.
//!
//! Usage:
//!   cargo run --release --bin drill -- analyze --hand AhKh --board QhJhTh [OPTIONS]
//!   cargo run --release --bin drill -- batch --count 10000 [OPTIONS]
//!
//! Commands:
//!   analyze              Classify one deal and show the recommended action
//!   batch                Evaluate random scenarios in parallel and summarize
//!
//! Options:
//!   --hand <CARDS>       Hole cards, e.g. AhKh (analyze)
//!   --board <CARDS>      Flop, e.g. QhJhTh (analyze)
//!   --turn <CARD>        Turn card, e.g. 9c (analyze, optional)
//!   --spot <NAME>        Spot, e.g. BTN_vs_BB (default: first spot in the book)
//!   --mode <CONTEXT>     flop_bet or facing_bet (default: flop_bet)
//!   --count <N>          Number of scenarios (batch, default: 10000)
//!   --seed <N>           Random seed (batch, optional)
//!   --tables <FILE>      Strategy book JSON (default: built-in book)
//!   --config <FILE>      Trainer options JSON (batch, optional)
//!   --output <FILE>      Write the batch report as JSON

use std::env;
use std::fs;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use postflop_trainer::cards::{Card, CardError, Deal};
use postflop_trainer::strategy::{DecisionContext, StrategyBook};
use postflop_trainer::training::{evaluate_batch, BatchReport, Scenario, TrainerConfig};

#[derive(Default)]
struct Options {
    command: Option<String>,
    hand: Option<String>,
    board: Option<String>,
    turn: Option<String>,
    spot: Option<String>,
    mode: Option<String>,
    count: usize,
    seed: Option<u64>,
    tables: Option<String>,
    config: Option<String>,
    output: Option<String>,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options {
        count: 10_000,
        ..Options::default()
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "analyze" | "batch" if opts.command.is_none() => {
                opts.command = Some(args[i].clone());
                i += 1;
                continue;
            }
            "--hand" => opts.hand = value,
            "--board" | "-b" => opts.board = value,
            "--turn" => opts.turn = value,
            "--spot" => opts.spot = value,
            "--mode" | "-m" => opts.mode = value,
            "--count" | "-n" => opts.count = value.and_then(|v| v.parse().ok()).unwrap_or(10_000),
            "--seed" | "-s" => opts.seed = value.and_then(|v| v.parse().ok()),
            "--tables" | "-t" => opts.tables = value,
            "--config" | "-c" => opts.config = value,
            "--output" | "-o" => opts.output = value,
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                return;
            }
        }
        i += 2;
    }

    let book = match &opts.tables {
        Some(path) => StrategyBook::from_json_file(path),
        None => StrategyBook::builtin(),
    };
    let book = match book {
        Ok(book) => book,
        Err(e) => {
            eprintln!("Error loading strategy book: {}", e);
            return;
        }
    };

    let context = match opts.mode.as_deref() {
        None => DecisionContext::FlopBet,
        Some(name) => match DecisionContext::from_name(name) {
            Some(context) => context,
            None => {
                eprintln!("Unknown mode: {} (expected flop_bet or facing_bet)", name);
                return;
            }
        },
    };

    let result = match opts.command.as_deref() {
        Some("analyze") => analyze(&opts, &book, context),
        Some("batch") => batch(&opts, &book, context),
        _ => {
            print_help();
            return;
        }
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn analyze(opts: &Options, book: &StrategyBook, context: DecisionContext) -> Result<(), String> {
    let hand = opts.hand.as_deref().ok_or("--hand is required")?;
    let board = opts.board.as_deref().ok_or("--board is required")?;
    let deal = Deal::parse(hand, board).map_err(|e| e.to_string())?;
    let spot = match &opts.spot {
        Some(spot) => spot.clone(),
        None => book
            .spots(context)
            .first()
            .map(|s| s.to_string())
            .ok_or("the strategy book has no spots for this mode")?,
    };

    let flop = Scenario::new(context, &spot, deal);
    let decision = flop.decision(book).map_err(|e| e.to_string())?;

    println!("Hand:     {} ({})", flop.deal.hand(), flop.hand_notation());
    println!("Board:    {}", flop.deal.board());
    println!("Spot:     {} [{}]", spot, context);
    println!("Texture:  {}", flop.texture);
    println!("Category: {} ({})", flop.category, flop.category.display_name());
    println!("Decision: {}", decision.describe());

    let Some(turn_card) = &opts.turn else {
        return Ok(());
    };
    let turn_context = flop
        .turn_context()
        .ok_or("--turn needs a flop mode")?;
    let card: Card = turn_card.parse().map_err(|e: CardError| e.to_string())?;
    let deal = flop.deal.with_board_card(card).map_err(|e| e.to_string())?;
    let mut turn = Scenario::new(turn_context, &spot, deal);
    turn.texture = flop.texture;
    let turn_decision = turn.decision(book).map_err(|e| e.to_string())?;

    println!();
    println!("Turn:     {} [{}]", card, turn_context);
    println!("Brought:  {}", turn.transition.map(|t| t.to_string()).unwrap_or_default());
    println!("Category: {} ({})", turn.category, turn.category.display_name());
    println!("Decision: {}", turn_decision.describe());
    Ok(())
}

fn batch(opts: &Options, book: &StrategyBook, context: DecisionContext) -> Result<(), String> {
    let mut config = match &opts.config {
        Some(path) => TrainerConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => TrainerConfig::default(),
    };
    if opts.mode.is_some() {
        config = config.with_context(context);
    }
    if let Some(spot) = &opts.spot {
        config = config.with_spots(vec![spot.clone()]);
    }
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    config.validate().map_err(|e| e.to_string())?;

    println!("=================================================");
    println!("  Postflop Batch Evaluation");
    println!("=================================================");
    println!();
    println!("Book:      {} v{}", book.name, book.version);
    println!("Mode:      {}", config.context);
    println!("Scenarios: {}", opts.count);
    if let Some(seed) = config.seed {
        println!("Seed:      {}", seed);
    }
    println!("Threads:   {}", rayon::current_num_threads());
    println!();

    let pb = ProgressBar::new(opts.count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "  evaluating [{bar:40}] {pos}/{len} [{elapsed} < {eta}, {per_sec}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let start = Instant::now();
    let report = evaluate_batch(book, &config, opts.count, |_| pb.inc(1))
        .map_err(|e| e.to_string())?;
    pb.finish_and_clear();
    let elapsed = start.elapsed().as_secs_f64();
    info!("batch of {} finished in {:.2}s", report.samples, elapsed);

    print_report(&report);
    println!();
    println!(
        "Time: {:.2}s ({:.0} scenarios/s)",
        elapsed,
        report.samples as f64 / elapsed.max(f64::EPSILON)
    );

    if let Some(path) = &opts.output {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("{}: {}", path, e))?;
        println!("Report written to {}", path);
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    let pct = |n: usize| 100.0 * n as f64 / report.samples.max(1) as f64;

    println!("Textures:");
    for (texture, n) in &report.textures {
        println!("  {:<20} {:>7} {:>6.1}%", texture.name(), n, pct(*n));
    }
    println!("Flop categories:");
    for (category, n) in &report.flop_categories {
        println!("  {:<20} {:>7} {:>6.1}%", category.name(), n, pct(*n));
    }
    println!("Turn transitions:");
    for (transition, n) in &report.transitions {
        println!("  {:<20} {:>7} {:>6.1}%", transition.name(), n, pct(*n));
    }
    println!("Flop actions (most frequent):");
    for (action, n) in &report.flop_actions {
        println!("  {:<20} {:>7} {:>6.1}%", action.name(), n, pct(*n));
    }
    println!("Turn actions (most frequent):");
    for (action, n) in &report.turn_actions {
        println!("  {:<20} {:>7} {:>6.1}%", action.name(), n, pct(*n));
    }
    println!(
        "Mixed decisions: flop {:.1}%, turn {:.1}%",
        100.0 * report.mixed_flop_rate(),
        pct(report.mixed_turn)
    );
}

fn print_help() {
    println!("Postflop drill");
    println!();
    println!("Usage:");
    println!("  drill analyze --hand AhKh --board QhJhTh [--turn 9c] [--spot BTN_vs_BB] [--mode flop_bet]");
    println!("  drill batch [--count N] [--seed S] [--mode flop_bet|facing_bet] [--spot NAME]");
    println!();
    println!("Options:");
    println!("  --hand <CARDS>     Hole cards");
    println!("  --board <CARDS>    Flop cards");
    println!("  --turn <CARD>      Turn card");
    println!("  --spot <NAME>      Spot name");
    println!("  --mode <CONTEXT>   flop_bet or facing_bet");
    println!("  --count <N>        Number of scenarios (default: 10000)");
    println!("  --seed <N>         Random seed");
    println!("  --tables <FILE>    Strategy book JSON");
    println!("  --config <FILE>    Trainer options JSON");
    println!("  --output <FILE>    Write the batch report as JSON");
    println!("  --help             Show this help");
}
