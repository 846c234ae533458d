use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use doorlock::{DoorlockApp, DoorlockConfig};

#[derive(Parser, Debug)]
#[command(name = "doorlock")]
#[command(about = "Remote door lock endpoint with device status tracking")]
#[command(version)]
#[command(long_about = "Accepts HTTP lock/unlock commands for a door actuator, tracks the \
latest known door state and records status pushes from the remote device. Serves a small \
status page for manual testing.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "doorlock.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Override the listening port from the configuration
    #[arg(short, long, help = "Port to listen on, overrides the configuration file")]
    port: Option<u16>,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging, including HTTP tracing")]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable debug level logging for the service only")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the server")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("# Doorlock Configuration File");
        println!("# Every key can also be set through DOORLOCK_<SECTION>_<KEY>");
        println!();
        println!("{}", DoorlockConfig::default().to_toml()?);
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting Doorlock service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match DoorlockConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(port) = args.port {
        info!("Overriding configured port with {}", port);
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let app = DoorlockApp::new(config).await.map_err(|e| {
        error!("Failed to start door lock service: {}", e);
        e
    })?;

    let exit_code = app.run().await.map_err(|e| {
        error!("System error during execution: {}", e);
        e
    })?;

    info!("Doorlock service exited with code: {}", exit_code);
    std::process::exit(exit_code);
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let directives = if args.debug {
        "doorlock=debug,tower_http=debug"
    } else if args.verbose {
        "doorlock=debug"
    } else if args.quiet {
        "doorlock=error"
    } else {
        "doorlock=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("pretty") => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some("compact") | None => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer().compact().with_target(false).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
