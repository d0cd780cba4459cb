use clap::Parser;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use r2k_config::{PhyBackend, SharedConfig, toml_config};
use r2k_core::{CallRef, FRAME_BAUDRATE, SUPER_BAUDRATE, debug};
use r2k_entities::{CallControlUp, ChannelPool};
use r2k_frames::enums::release_cause::ReleaseCause;

/// Interval of the drive loop
const LOOP_INTERVAL: Duration = Duration::from_millis(10);

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// Call control without a telephone network behind it. Outgoing calls are accepted and
/// logged, they never get answered.
struct LoggingCallControl {
    next_callref: CallRef,
}

impl LoggingCallControl {
    fn new() -> Self {
        Self { next_callref: 1 }
    }
}

impl CallControlUp for LoggingCallControl {
    fn setup(&mut self, subscriber: &str, dialed: &str) -> Result<CallRef, ReleaseCause> {
        let callref = self.next_callref;
        self.next_callref = self.next_callref.wrapping_add(1).max(1);
        tracing::info!("call {}: {} dialed {}", callref, subscriber, dialed);
        Ok(callref)
    }

    fn alerting(&mut self, callref: CallRef) {
        tracing::info!("call {}: alerting", callref);
    }

    fn answer(&mut self, callref: CallRef) {
        tracing::info!("call {}: answered", callref);
    }

    fn release(&mut self, callref: CallRef, cause: ReleaseCause) {
        tracing::info!("call {}: released, cause {}", callref, cause);
    }
}

/// Bit clock of one modem channel, counts the bits due since start
struct BitClock {
    baudrate: f64,
    bits_done: u64,
}

impl BitClock {
    fn new(baudrate: f64) -> Self {
        Self { baudrate, bits_done: 0 }
    }

    /// Bits to clock out to catch up with `elapsed` seconds
    fn due(&mut self, elapsed: f64) -> u64 {
        let total = (elapsed * self.baudrate) as u64;
        let due = total.saturating_sub(self.bits_done);
        self.bits_done = total;
        due
    }
}

/// Drives the pool in real time until `running` is cleared
fn run_pool(pool: &mut ChannelPool, running: Arc<AtomicBool>) {
    let start = Instant::now();
    let mut frame_clock = BitClock::new(FRAME_BAUDRATE);
    let mut super_clock = BitClock::new(SUPER_BAUDRATE);
    let mut frame_bits_sent = vec![0u64; pool.len()];

    while running.load(Ordering::SeqCst) {
        let elapsed = start.elapsed().as_secs_f64();

        // No modem attached: transmitted bits are dropped, nothing is received
        for _ in 0..frame_clock.due(elapsed) {
            for (idx, sent) in frame_bits_sent.iter_mut().enumerate() {
                if pool.tx_bit(idx).is_some() {
                    *sent += 1;
                }
            }
        }
        for _ in 0..super_clock.due(elapsed) {
            for idx in 0..pool.len() {
                pool.tx_super_bit(idx);
            }
        }
        for idx in 0..pool.len() {
            pool.take_tx_audio(idx);
        }

        pool.tick(elapsed);
        std::thread::sleep(LOOP_INTERVAL);
    }

    for (idx, sent) in frame_bits_sent.iter().enumerate() {
        tracing::info!("chan {}: {} frame bits sent", pool.channel(idx).sysinfo.number, sent);
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Radiocom 2000 base station",
    long_about = "Runs the Radiocom 2000 relais stack using the provided TOML configuration file"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with relais and channel parameters")]
    config: String,
}

fn main() {
    eprintln!("  ___  ___ _  __  ___ ___");
    eprintln!(" | _ \\|_  ) |/ / | _ ) __|");
    eprintln!(" |   / / /| ' <  | _ \\__ \\");
    eprintln!(" |_|_\\/___|_|\\_\\ |___/___/\n");
    eprintln!(" -> Radiocom 2000 relais\n");

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.config().debug_log.clone());

    match cfg.config().phy_io.backend {
        PhyBackend::None => {
            tracing::warn!("no modem backend configured, running dry");
        }
        PhyBackend::Undefined => {
            tracing::error!("phy_io backend must be defined");
            std::process::exit(1);
        }
    }

    let mut pool = ChannelPool::new(cfg.clone(), Box::new(LoggingCallControl::new()));

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("failed to set Ctrl+C handler");

    run_pool(&mut pool, running);
}
