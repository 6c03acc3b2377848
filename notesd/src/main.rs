//! # Notes UI Host Daemon
//!
//! Main entry point for the notes UI host.

use notesd::{HostRuntime, HostRuntimeConfig};
use services_editor_manager::EditorManagerConfig;
use services_ui_state::UiConfig;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

struct Args {
    config: HostRuntimeConfig,
    verbose: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let Args { config, verbose } = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    init_logging(verbose);

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.run();
    for line in runtime.take_output() {
        println!("{}", line);
    }
    runtime.shutdown();

    if let Err(e) = result {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut config = HostRuntimeConfig::default();
    let mut integration = false;
    let mut query = String::new();
    let mut verbose = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--script" | "-s" => {
                let script_path = value(args, &mut i, "--script")?;
                let script_text = fs::read_to_string(script_path)
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--snapshot" => {
                config.snapshot_path = Some(PathBuf::from(value(args, &mut i, "--snapshot")?));
            }
            "--config" | "-c" => {
                let config_path = value(args, &mut i, "--config")?;
                let bytes = fs::read(config_path)
                    .map_err(|e| format!("Failed to read config file: {}", e))?;
                config.ui = UiConfig::from_json(&bytes).map_err(|e| e.to_string())?;
            }
            "--integration" => {
                integration = true;
            }
            "--query" => {
                query = value(args, &mut i, "--query")?.to_string();
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    config.editor = EditorManagerConfig::new(integration, query);
    Ok(Args { config, verbose })
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --script <FILE>      Host script to run");
    eprintln!("  --snapshot <FILE>        UI snapshot to load and write back on exit");
    eprintln!("  -c, --config <FILE>      UI config (JSON)");
    eprintln!("  --integration            Integration mode (no developer tooling)");
    eprintln!("  --query <QS>             Load-time query string, e.g. debug_pm=yes");
    eprintln!("  -v, --verbose            Debug logging (RUST_LOG overrides)");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script demos/palette_focus.ui --snapshot ui.json", program);
    eprintln!("  {} --query debug_pm=yes --script demos/palette_focus.ui", program);
}
