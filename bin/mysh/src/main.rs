//! mysh - interactive shell binary
//!
//! Parses the command line, sets up logging, loads configuration and
//! history, runs the read loop on stdin and saves history on the way out.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use tracing::{debug, error, info, warn};

use mysh::config::loader::ConfigLoader;
use mysh::{build_session, Config, Interpreter};

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// History file override
    history_file: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Skip the welcome banner
    no_banner: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> anyhow::Result<Self> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut app_args = AppArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("Missing config file path")?;
                    app_args.config_path = Some(PathBuf::from(path));
                }
                "--history-file" => {
                    let path = args.next().context("Missing history file path")?;
                    app_args.history_file = Some(PathBuf::from(path));
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--no-banner" => {
                    app_args.no_banner = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{}", mysh::NAME, mysh::VERSION);
                    process::exit(0);
                }
                other if other.starts_with('-') => {
                    anyhow::bail!("Unknown option: {}", other);
                }
                other => {
                    warn!("Ignoring positional argument: {}", other);
                }
            }
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("mysh - a small interactive shell with process supervision");
    println!();
    println!("USAGE:");
    println!("    mysh [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>        Path to configuration file");
    println!("        --history-file <PATH>  Where history is loaded from and saved to");
    println!("    -d, --debug                Enable debug logging");
    println!("        --no-banner            Do not print the welcome banner");
    println!("    -h, --help                 Print this help message");
    println!("    -v, --version              Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    mysh looks for configuration files in the following order:");
    println!("    1. Path specified with --config or MYSH_CONFIG");
    println!("    2. $XDG_CONFIG_HOME/mysh/config.{{toml,json}}");
    println!("    3. ~/.config/mysh/config.{{toml,json}}");
    println!("    4. ~/.mysh/config.{{toml,json}}");
    println!("    5. ./.mysh.{{toml,json}}");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    MYSH_CONFIG    Path to configuration file");
    println!("    MYSH_DEBUG     Enable debug logging (1 or true)");
    println!("    RUST_LOG       Set logging level (error, warn, info, debug, trace)");
}

/// Load configuration from file or use defaults
fn load_configuration(args: &AppArgs) -> Config {
    let config_path = args
        .config_path
        .clone()
        .or_else(|| env::var("MYSH_CONFIG").ok().map(PathBuf::from));

    let loaded = match &config_path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load(),
    };

    let mut config = loaded.unwrap_or_else(|e| {
        warn!("{}; falling back to default configuration", e);
        Config::default()
    });

    if let Some(history_file) = &args.history_file {
        config.history.file = history_file.clone();
    }
    if args.no_banner {
        config.shell.show_banner = false;
    }
    config
}

/// Initialize logging to stderr so it never mixes with shell output
fn init_logging(args: &AppArgs, config: &Config) {
    let debug_env = env::var("MYSH_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let level = if args.debug || debug_env {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let env_filter = env::var("RUST_LOG").unwrap_or(level);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        print_help();
        process::exit(1);
    });

    // Logging needs the configured level, so config loading logs nothing
    // until the subscriber is installed.
    let config = load_configuration(&args);
    init_logging(&args, &config);
    info!("Starting {} v{}", mysh::NAME, mysh::VERSION);
    debug!("Configuration: {:?}", config);

    let session = match build_session(&config, std::io::stdout()) {
        Ok(session) => session,
        Err(e) => {
            error!("Could not start the shell: {}", e);
            return;
        }
    };

    let mut interpreter = Interpreter::new(session, config.shell.clone());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = interpreter.run(stdin).await {
        error!("Shell stopped: {}", e);
    }

    interpreter.session().save_history();
    info!("Shell exited");
}
