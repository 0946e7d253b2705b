use std::io::{self, BufRead, Write};

use tracing::{error, info, warn};

use weekgrid::config::Config;
use weekgrid::engine::Engine;
use weekgrid::model::Action;
use weekgrid::submission;

/// Reads one JSON action record per line on stdin, prints the block list after
/// each committed action, and the submission records at end of input.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the JSON output.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)?;

    let wal_path = config.wal_path();
    let mut engine = Engine::open(&wal_path, config.policy, config.compact_threshold)?;
    info!("weekgrid ready");
    info!("  wal: {}", wal_path.display());
    info!("  policy: {:?}", config.policy);
    info!("  compact_threshold: {}", config.compact_threshold);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let action: Action = match serde_json::from_str(line) {
            Ok(action) => action,
            Err(e) => {
                error!("bad action record: {e}");
                continue;
            }
        };
        match engine.dispatch(action) {
            Ok(blocks) => writeln!(stdout, "{}", serde_json::to_string(blocks)?)?,
            Err(e) => warn!("action rejected: {e}"),
        }
    }

    writeln!(stdout, "{}", submission::to_json(engine.blocks())?)?;
    Ok(())
}
