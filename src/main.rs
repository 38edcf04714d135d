//! corsprobe - CORS misconfiguration prober CLI

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use corsprobe::config::{self, CliOverrides};
use corsprobe::error::CorsProbeError;
use corsprobe::http::HttpClient;
use corsprobe::models::ScanConfig;
use corsprobe::origins;
use corsprobe::poc::{self, PocKind};
use corsprobe::report;
use corsprobe::scanner::ScanEngine;
use corsprobe::validation::is_valid_origin;

/// corsprobe - probe endpoints for CORS misconfigurations
#[derive(Parser)]
#[command(name = "corsprobe", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PocArg {
    /// Sandboxed iframe sending `Origin: null`
    Null,
    /// Attacker page whose origin is reflected
    Reflected,
}

impl From<PocArg> for PocKind {
    fn from(arg: PocArg) -> Self {
        match arg {
            PocArg::Null => PocKind::NullOrigin,
            PocArg::Reflected => PocKind::ReflectedOrigin,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a target's endpoints with crafted origins
    Scan {
        /// Target URL (only scheme and host are used)
        #[arg(short, long)]
        target: String,

        /// Single endpoint to probe (e.g. /api/account)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// File with one endpoint per line
        #[arg(short, long)]
        list: Option<PathBuf>,

        /// Attacker origin tested for reflection
        #[arg(short = 'O', long)]
        origin: Option<String>,

        /// Accept a malformed --origin and send it as-is
        #[arg(long)]
        allow_invalid_origin: bool,

        /// Also try file, browser-extension, loopback and trailing-dot origins
        #[arg(short = 'x', long)]
        extended: bool,

        /// HTTP method for probes
        #[arg(short = 'X', long)]
        method: Option<String>,

        /// Custom headers (format: "Key: Value")
        #[arg(short = 'H', long)]
        header: Option<Vec<String>>,

        /// HTTP/HTTPS proxy URL
        #[arg(long)]
        proxy: Option<String>,

        /// Skip TLS certificate verification
        #[arg(short = 'k', long)]
        insecure: bool,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum concurrent probes per endpoint
        #[arg(long)]
        concurrency: Option<usize>,

        /// Do not check that the target is reachable first
        #[arg(long)]
        no_check: bool,

        /// Output file for the findings (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the full scan result instead of the findings array
        #[arg(long)]
        full_report: bool,

        /// Exploit server; when set, a PoC page is written for each vulnerable endpoint
        #[arg(long)]
        poc_server: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with code 1 when any finding is reported
        #[arg(long)]
        fail_on_findings: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the origins that would be sent to a target
    Origins {
        /// Target URL
        #[arg(short, long)]
        target: String,

        /// Attacker origin tested for reflection
        #[arg(short = 'O', long, default_value = "https://attacker.com")]
        origin: String,

        /// Include the extended origin set
        #[arg(short = 'x', long)]
        extended: bool,
    },

    /// Render a proof-of-concept exploit page
    Poc {
        /// Target URL
        #[arg(short, long)]
        target: String,

        /// Vulnerable endpoint (e.g. /accountDetails)
        #[arg(short, long)]
        endpoint: String,

        /// Kind of PoC
        #[arg(short, long, value_enum)]
        kind: PocArg,

        /// Exploit server receiving the stolen response
        #[arg(short, long)]
        log_server: String,

        /// Directory to write the page into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print a previously saved full scan result
    Report {
        /// Path to the JSON results file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "corsprobe=debug" } else { "corsprobe=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════════╗
    ║  CORSPROBE v0.1.0                     ║
    ║  CORS misconfiguration prober         ║
    ╚═══════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            target,
            endpoint,
            list,
            origin,
            allow_invalid_origin,
            extended,
            method,
            header,
            proxy,
            insecure,
            timeout,
            concurrency,
            no_check,
            output,
            full_report,
            poc_server,
            config: config_path,
            fail_on_findings,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mut scan_config = if let Some(ref path) = config_path {
                config::load_config(path)?
            } else {
                let default_path = Path::new("config/default.toml");
                if default_path.exists() {
                    config::load_config(default_path)?
                } else {
                    ScanConfig::default()
                }
            };

            config::merge_cli_args(
                &mut scan_config,
                CliOverrides {
                    target,
                    endpoint,
                    endpoint_list: list,
                    reflected_origin: origin,
                    extended,
                    method,
                    timeout,
                    concurrency,
                    proxy,
                    insecure,
                    skip_reachability: no_check,
                    headers: header,
                },
            );

            if !allow_invalid_origin && !is_valid_origin(&scan_config.reflected_origin) {
                return Err(CorsProbeError::InvalidOrigin(format!(
                    "'{}' (use --allow-invalid-origin to send it anyway)",
                    scan_config.reflected_origin
                ))
                .into());
            }

            println!("  {} {}", "Target:".bold(), scan_config.target.green());
            println!("  {} {}", "Origin:".bold(), scan_config.reflected_origin.cyan());
            println!(
                "  {} {}\n",
                "Extended:".bold(),
                scan_config.extended.to_string().cyan()
            );

            let client = HttpClient::from_config(&scan_config)?;
            let engine = ScanEngine::new(Arc::new(client));
            let result = engine.run(&scan_config).await?;

            report::console::print_findings(&result.findings);
            report::console::print_summary(&result);

            let output_path =
                output.unwrap_or_else(|| PathBuf::from(report::json::DEFAULT_FINDINGS_FILE));
            if full_report {
                report::json::export(&result, &output_path)?;
            } else {
                report::json::export_findings(&result.findings, &output_path)?;
            }
            println!(
                "\n  {} {}",
                "Report saved to:".bold(),
                output_path.display().to_string().green()
            );

            if let Some(ref log_server) = poc_server {
                let mut written = std::collections::BTreeSet::new();
                for finding in &result.findings {
                    let Some(kind) = PocKind::for_vulnerability(finding.vuln) else {
                        continue;
                    };
                    if written.insert((kind.file_stem(), finding.endpoint.clone())) {
                        let path = poc::write(
                            kind,
                            &result.target,
                            &finding.endpoint,
                            log_server,
                            Path::new("."),
                        )?;
                        println!(
                            "  {} {}",
                            "PoC written:".bold(),
                            path.display().to_string().green()
                        );
                    }
                }
            }

            if fail_on_findings && !result.findings.is_empty() {
                println!(
                    "\n  {} {} findings detected.",
                    "FAIL:".red().bold(),
                    result.findings.len()
                );
                std::process::exit(1);
            }
        }

        Commands::Origins {
            target,
            origin,
            extended,
        } => {
            let mut labelled = origins::generate_labelled(&target, &origin, extended);
            labelled.sort();
            labelled.dedup();
            for (category, value) in labelled {
                println!("  {} {}", format!("{category:18}").cyan(), value);
            }
        }

        Commands::Poc {
            target,
            endpoint,
            kind,
            log_server,
            dir,
        } => {
            init_tracing(false);
            let path = poc::write(kind.into(), &target, &endpoint, &log_server, &dir)?;
            println!(
                "  {} {}",
                "PoC file created:".bold(),
                path.display().to_string().green()
            );
        }

        Commands::Report { input } => {
            init_tracing(false);
            print_banner();

            let result = report::json::load(&input)?;
            report::console::print_findings(&result.findings);
            report::console::print_summary(&result);
        }
    }

    Ok(())
}
