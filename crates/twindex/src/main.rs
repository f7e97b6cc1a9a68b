//! Command-line front end for the health trajectory simulator.
//!
//! Reads a patient form file, submits it to the simulation backend and prints
//! the rendered sections (or writes them as an HTML report).
//!
//! # Examples
//!
//! ```sh
//! # Render to the terminal
//! twindex --input patient.toml
//!
//! # Check the form and see the prompt without calling the backend
//! twindex --input patient.json --print-prompt
//!
//! # Write a standalone report against another backend
//! TWINDEX_ENDPOINT=http://10.0.0.5:8000/simulate twindex --input patient.toml --html report.html
//!
//! # Describe the form file format
//! twindex --print-schema
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twindex::api::{ClientConfig, SimulationClient};
use twindex::form::{FormInputs, form_schema};
use twindex::prompt::build_prompt;
use twindex::submit;

/// Simulate future Type 2 Diabetes risk under two lifestyle scenarios.
#[derive(Parser)]
#[command(name = "twindex", version)]
struct Cli {
    /// Patient form file (`.toml`, otherwise JSON).
    #[arg(long, short, required_unless_present = "print_schema")]
    input: Option<PathBuf>,

    /// Simulation endpoint. Overrides TWINDEX_ENDPOINT.
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds. Overrides TWINDEX_TIMEOUT_SECS.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Validate the form and print the prompt without calling the backend.
    #[arg(long)]
    print_prompt: bool,

    /// Print the JSON schema of the form file and exit.
    #[arg(long)]
    print_schema: bool,

    /// Write a standalone HTML report to this path.
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Print the raw backend response instead of rendered sections.
    #[arg(long, conflicts_with = "html")]
    raw: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Logs go to stderr so rendered output on stdout stays clean. `RUST_LOG`
/// applies unless `-v` is given.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: &Cli) -> Result<(), String> {
    if cli.print_schema {
        let schema = serde_json::to_string_pretty(&form_schema())
            .map_err(|e| format!("failed to serialize schema: {e}"))?;
        println!("{schema}");
        return Ok(());
    }

    let Some(path) = &cli.input else {
        return Err("--input is required".to_string());
    };
    let inputs = FormInputs::from_path(path)?;

    if cli.print_prompt {
        let prompt = build_prompt(&inputs).map_err(|e| e.to_string())?;
        println!("{prompt}");
        return Ok(());
    }

    let config = cli.client_config();
    info!("Submitting simulation to {}", config.endpoint);
    let client = SimulationClient::new(config)?;

    let report = submit(&client, &inputs).await.map_err(|e| e.to_string())?;

    if cli.raw {
        println!("{}", report.raw);
    } else if let Some(html) = &cli.html {
        report.write_html(html)?;
        println!("Report written to {}", html.display());
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
