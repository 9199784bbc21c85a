use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use pix_core::replay::{load_requests, Replayer};
use pix_core::{logging, Config};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("replay") => match args.get(2) {
            Some(path) => run_replay(Path::new(path)),
            None => {
                print_usage();
                bail!("replay needs a CSV file");
            }
        },
        Some("help") | Some("--help") | None => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }
}

fn run_replay(csv_path: &Path) -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config);

    eprintln!("🔁 Replaying transfers from {:?}", csv_path);
    let requests = load_requests(csv_path)?;
    eprintln!("✓ Loaded {} requests", requests.len());

    let replayer = Replayer::new(&config)?;
    let (outcomes, summary) = replayer.run(&requests);

    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("✓ Registered:  {}", summary.registered);
    eprintln!("✗ Rejected:    {}", summary.rejected);
    eprintln!("  completed={} confirmed={} error={} pending={}",
        summary.completed, summary.confirmed, summary.errored, summary.pending);
    if summary.validation_warnings > 0 {
        eprintln!("⚠️  {} transitions failed re-validation", summary.validation_warnings);
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pix-core replay <transfers.csv>   Run a CSV batch of transfers");
    eprintln!("  pix-core help                     Show this message");
    eprintln!();
    eprintln!("CSV columns: from_owner,from_number,to_owner,to_number,to_kind,to_key,amount,description,action");
    eprintln!("Actions: complete | confirm | cancel | fail | none");
}
