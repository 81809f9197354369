//! Presence Detection Trace
//!
//! This example replays a scripted day of keyboard activity through a
//! presence detector on a simulated clock and prints every signal.
//!
//! Key concepts:
//! - Going away after `input_timeout` seconds without input
//! - Limbo: a short burst of input is not yet "back"
//! - Scheduled offsets firing once per absence
//!
//! Run with: cargo run --example presence_trace

use gentle::presence::{PresenceConfig, PresenceDetector};
use std::time::{Duration, Instant};

fn main() {
    println!("=== Presence Detection Trace ===\n");

    let config = PresenceConfig {
        input_timeout: 10.0,
        limbo_timeout_to_back: 3.0,
        ..Default::default()
    }
    .with_scheduled_timeouts(vec![30.0, 90.0]);

    let start = Instant::now();
    let mut detector = PresenceDetector::new(&config, start);
    println!("input timeout:       {}s", detector.input_timeout());
    println!("limbo to afk:        {}s", detector.limbo_timeout_to_afk());
    println!("scheduled timeouts:  {:?}\n", detector.scheduled_timeouts());

    // Typing for 20s, away until 40s, a single bump at 40s, away until
    // 100s, then back for good.
    let mut inputs: Vec<u64> = (0..20).collect();
    inputs.push(40);
    inputs.extend(100..110);

    for secs in 0..120u64 {
        let now = start + Duration::from_secs(secs);
        let mut signals = Vec::new();
        if inputs.contains(&secs) {
            signals.extend(detector.notify_input(now));
        }
        signals.extend(detector.on_tick(now));

        for signal in signals {
            println!("{secs:>4}s  {:<14} -> {}", signal.name(), detector.state());
        }
    }

    println!("\n=== Example Complete ===");
}
