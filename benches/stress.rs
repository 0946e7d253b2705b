use std::time::{Duration, Instant};

use weekgrid::engine::{Engine, find_overlap};
use weekgrid::model::{Action, BlockArgs, Minute, OverlapPolicy};
use weekgrid::wal::Wal;

const SLOT: Minute = 15;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    if latencies.is_empty() {
        return;
    }
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.1}us, p50={:.1}us, p95={:.1}us, p99={:.1}us, max={:.1}us",
        latencies.len(),
        avg.as_secs_f64() * 1e6,
        percentile(latencies, 50.0).as_secs_f64() * 1e6,
        percentile(latencies, 95.0).as_secs_f64() * 1e6,
        percentile(latencies, 99.0).as_secs_f64() * 1e6,
        latencies.last().map_or(0.0, |d| d.as_secs_f64() * 1e6),
    );
}

/// Deterministic cell for gesture `i`: spreads over the week and both types.
fn cell(i: usize) -> BlockArgs {
    let day = (i % 7) as u8;
    let slot = ((i * 37) % 95) as Minute;
    let start = slot * SLOT;
    BlockArgs::new(i % 3 != 0, day, start, start + SLOT)
}

fn phase1_paint(policy: OverlapPolicy) -> Engine {
    println!("\n=== Phase 1: paint single cells ({policy:?}) ===");
    let mut engine = Engine::new(policy);
    let mut latencies = Vec::new();
    let start = Instant::now();
    for i in 0..5_000 {
        let t = Instant::now();
        let _ = engine.dispatch(Action::Add(cell(i)));
        latencies.push(t.elapsed());
    }
    println!(
        "  {} blocks after {:.2?}",
        engine.blocks().len(),
        start.elapsed()
    );
    print_latency("add", &mut latencies);
    engine
}

fn phase2_drag(engine: &mut Engine) {
    println!("\n=== Phase 2: drag gestures ===");
    let mut steps = Vec::new();
    let mut finals = Vec::new();
    for i in 0..1_000 {
        if engine.begin_drag(cell(i * 7 + 3)).is_err() {
            continue;
        }
        let anchor = engine.drag().map_or(0, |d| d.anchor);
        for k in 1..=8 {
            let to = (anchor + k * SLOT).min(1440);
            let t = Instant::now();
            let _ = engine.drag_to(to);
            steps.push(t.elapsed());
        }
        let t = Instant::now();
        engine.end_drag().expect("finalize");
        finals.push(t.elapsed());
    }
    print_latency("drag step", &mut steps);
    print_latency("finalize", &mut finals);
    assert!(find_overlap(engine.blocks(), engine.policy()).is_none());
}

fn phase3_replay() {
    println!("\n=== Phase 3: log replay ===");
    let dir = std::env::temp_dir().join(format!("weekgrid_bench_{}", ulid::Ulid::new()));
    std::fs::create_dir_all(&dir).expect("bench dir");
    let path = dir.join("bench.wal");

    let t = Instant::now();
    {
        let mut engine = Engine::open(&path, OverlapPolicy::LastWriteWins, 0).expect("open");
        for i in 0..2_000 {
            let _ = engine.dispatch(Action::Add(cell(i)));
        }
    }
    println!("  2000 logged adds in {:.2?}", t.elapsed());

    let events = Wal::replay(&path).expect("replay").len();
    let t = Instant::now();
    let engine = Engine::open(&path, OverlapPolicy::LastWriteWins, 0).expect("reopen");
    println!(
        "  replayed {events} events into {} blocks in {:.2?}",
        engine.blocks().len(),
        t.elapsed()
    );
    let _ = std::fs::remove_dir_all(&dir);
}

fn main() {
    for policy in [
        OverlapPolicy::KeepBoth,
        OverlapPolicy::LastWriteWins,
        OverlapPolicy::UnavailableWins,
    ] {
        let mut engine = phase1_paint(policy);
        phase2_drag(&mut engine);
    }
    phase3_replay();
}
