/*!
 * jmxlink CLI - validate and inspect JMX service URLs
 *
 * No connection is opened from the command line: the RMI wire protocol is
 * supplied by embedding applications through `RemoteTransport`.
 */

use clap::{Parser, Subcommand, ValueEnum};
use jmxlink::{
    config::{LogLevel, LoggingConfig},
    error::{Result, EXIT_SUCCESS},
    inspect, logging, EndpointReport,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "jmxlink")]
#[command(version, about = "Validate and inspect JMX service URLs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(long = "log-level", value_enum, default_value = "warn", global = true)]
    log_level: LogLevelArg,

    /// Log file (JSON lines)
    #[arg(long = "log", value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a service URL is well-formed
    Validate {
        /// Service URL, e.g. service:jmx:rmi:///jndi/rmi://host:9999/jmxrmi
        url: String,

        /// The RMI registry is TLS-protected (skips URL parsing)
        #[arg(long)]
        registry_ssl: bool,
    },

    /// Print the parts of a service URL
    Inspect {
        /// Service URL
        url: String,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LoggingConfig {
        log_level: cli.log_level.into(),
        log_file: cli.log.clone(),
        verbose: cli.verbose,
    };
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Validate { url, registry_ssl } => {
            jmxlink_connect::validate(&url, registry_ssl)?;
            if registry_ssl {
                println!("ok (not parsed: registry is TLS-protected)");
            } else {
                println!("ok");
            }
            Ok(())
        }
        Commands::Inspect { url, json } => {
            let report = inspect(&url)?;
            debug!("Inspected {}", report.service_url);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
    }
}

fn print_report(report: &EndpointReport) {
    println!("service url: {}", report.service_url);
    println!("protocol:    {}", report.protocol);
    println!(
        "host:        {}",
        if report.host.is_empty() {
            "(none)"
        } else {
            &report.host
        }
    );
    match report.port {
        Some(port) => println!("port:        {}", port),
        None => println!("port:        (none)"),
    }
    println!("url path:    {}", report.url_path);
    if let Some(ref registry) = report.registry {
        println!("registry:    {}:{}", registry.host, registry.port);
    }
}
