// Chordkeys CLI
// Grabs one keyboard and re-emits it through a virtual device with timing-based layers

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use chordkeys_core::{Config, Dispatcher, FixedRateLoop, InputDevice, VirtualDevice};

#[path = "../tui/mod.rs"]
mod tui;

use tui::Monitor;

/// Timing-based keyboard layers for Linux
#[derive(Parser, Debug)]
#[command(name = "chordkeys")]
#[command(author = "chordkeys contributors")]
#[command(version)]
#[command(about = "Double-tap layer remapper for evdev keyboards", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Manually specify the device to remap by name or path (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Override the loop rate from the configuration
    #[arg(long, value_name = "HZ")]
    tick_rate: Option<u32>,

    /// Show the terminal monitor while remapping
    #[arg(short, long)]
    monitor: bool,

    /// Enable info logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// Print the configured layers and exit
    #[arg(long)]
    print_layers: bool,

    /// List available input devices
    #[arg(long)]
    list_devices: bool,
}

fn init_logging(args: &Args) {
    // The monitor owns the screen, so stay quiet unless RUST_LOG asks otherwise
    let level = if args.monitor {
        "off"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(hz) = args.tick_rate {
        config.tick_rate_hz = hz;
        config.validate().context("invalid --tick-rate")?;
    }
    Ok(config)
}

fn list_devices() -> Result<()> {
    let devices = InputDevice::list_devices().context("failed to enumerate input devices")?;
    println!("Found {} input device(s):", devices.len());
    for device in &devices {
        println!(
            "  {}: {} ({}){}",
            device.index,
            device.name,
            device.path,
            if device.is_keyboard { " [keyboard]" } else { "" }
        );
    }
    Ok(())
}

fn print_layers(config: &Config) {
    println!(
        "trigger {} ({})  activation {}ms  combo {}ms  {} Hz",
        config.trigger,
        config.activation,
        config.activation_window_ms,
        config.combo_window_ms,
        config.tick_rate_hz
    );
    if let Some(name) = &config.default_layer {
        println!("default layer: {}", name);
    }
    for layer in &config.layers {
        let secondaries: Vec<String> = layer.secondaries().iter().map(|k| k.to_string()).collect();
        println!("\n[{}] secondary: {}", layer.name(), secondaries.join(", "));
        for mapping in layer.mappings() {
            println!("  {}", mapping);
        }
    }
}

/// Stop flag flipped by SIGINT/SIGTERM
fn install_signal_handler() -> Result<Arc<AtomicBool>> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let running = Arc::new(AtomicBool::new(true));
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("failed to install signal handler")?;
    let flag = running.clone();

    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::info!("received signal {}, shutting down", signal);
            flag.store(false, Ordering::SeqCst);
        }
    });

    Ok(running)
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let running = install_signal_handler()?;

    let mut dispatcher = Dispatcher::new(config.build_engine()?);

    // CLI --devices > config [devices].only > first keyboard
    let filter = if args.devices.is_empty() {
        config.device_filter.clone()
    } else {
        args.devices.clone()
    };

    let mut input = InputDevice::open(&filter).context("failed to open input keyboard")?;
    let mut output = VirtualDevice::new().context("failed to create virtual keyboard")?;

    let mut monitor = if args.monitor {
        Some(Monitor::start(input.name(), config).context("failed to start monitor")?)
    } else {
        println!("chordkeys is running on {}. Press Ctrl+C to exit.", input.name());
        None
    };

    let result = run_loop(
        &running,
        config.tick_rate_hz,
        &mut input,
        &mut dispatcher,
        &mut output,
        monitor.as_mut(),
    );

    if let Some(mut monitor) = monitor {
        if let Err(e) = monitor.stop() {
            log::warn!("failed to restore terminal: {}", e);
        }
    }

    // Cleanup: release everything still down, then hand the keyboard back
    let released = dispatcher.release_all();
    if let Err(e) = output.send_all(&released) {
        log::warn!("failed to release keys: {}", e);
    }
    if let Err(e) = output.release_all() {
        log::warn!("failed to release device codes: {}", e);
    }
    input.ungrab();

    result
}

fn run_loop(
    running: &AtomicBool,
    rate_hz: u32,
    input: &mut InputDevice,
    dispatcher: &mut Dispatcher,
    output: &mut VirtualDevice,
    mut monitor: Option<&mut Monitor>,
) -> Result<()> {
    let mut cadence = FixedRateLoop::new(rate_hz, Instant::now());
    let mut edges = Vec::new();

    log::info!("dispatch loop at {} Hz", rate_hz);

    while running.load(Ordering::SeqCst) {
        edges.clear();
        input.drain(&mut edges).context("failed to read input device")?;

        let now = Instant::now();
        let events = dispatcher.tick(&edges, now);
        if !events.is_empty() {
            if let Err(e) = output.send_all(&events) {
                log::error!("error sending output: {}", e);
            }
        }

        if let Some(monitor) = monitor.as_deref_mut() {
            if monitor.update(dispatcher, cadence.overruns(), now)? {
                break;
            }
        }

        cadence.wait();
    }

    log::info!(
        "dispatch loop stopped after {} ticks ({} overruns)",
        cadence.ticks(),
        cadence.overruns()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    // Handle list-devices flag (doesn't require config)
    if args.list_devices {
        return list_devices();
    }

    let config = load_config(&args)?;

    if args.check_config {
        config.build_engine()?;
        println!("Configuration is valid ({} layers)", config.layers.len());
        return Ok(());
    }

    if args.print_layers {
        print_layers(&config);
        return Ok(());
    }

    run(&args, &config)
}
