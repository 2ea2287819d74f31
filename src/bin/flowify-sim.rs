//! flowify-sim — run a scripted career and print the economy summary.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use flowify::career::logic::format_cash;
use flowify::career::save;
use flowify::career::simulator::simulate_career;
use flowify::career::state::city_info;
use flowify::Tuning;

#[derive(Parser, Debug)]
#[command(name = "flowify-sim", about = "Headless Flowify balance simulation")]
struct Args {
    /// Weeks to simulate
    #[arg(short, long, default_value_t = 52)]
    weeks: u32,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// TOML file overriding the economy tuning
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Print the final player record as save JSON
    #[arg(long)]
    dump_save: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> flowify::Result<Tuning> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .map_err(|e| flowify::Error::InvalidInput(format!("{}: {}", p.display(), e)))?;
            Tuning::from_toml_str(&text)
        }
        None => Ok(Tuning::default()),
    }
}

fn run(args: &Args) -> flowify::Result<()> {
    let tuning = load_tuning(args.tuning.as_ref())?;
    let summary = simulate_career(args.weeks, args.seed, tuning)?;
    let p = &summary.final_player;

    println!("=== Flowify: {} weeks, seed {} ===", summary.weeks, args.seed);
    println!("Level {} in {}", p.level, city_info(p.city_id).name);
    println!("Monthly listeners: {}", p.monthly_listeners);
    println!("Cash: {}", format_cash(p.cash));
    println!(
        "Songs: {} (best popularity {})",
        summary.songs_released, summary.best_popularity
    );
    println!("Concerts: {}", summary.concerts_played);
    println!("Release payouts: {}", format_cash(summary.release_cash));
    println!("Concert revenue: {}", format_cash(summary.concert_cash));
    println!("Royalties:       {}", format_cash(summary.royalty_cash));
    println!("Rent paid:       {}", format_cash(summary.rent_paid));
    println!("Evictions: {}", summary.evictions);

    if args.dump_save {
        println!("{}", save::to_json(p)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
