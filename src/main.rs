use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use adscout::config::ScanConfig;
use adscout::report::ScanReport;
use adscout::scanner::{ScanObserver, Scanner};
use adscout::session::LdapSessionProvider;
use adscout::FindingCategory;

const BANNER: &str = r"
           _                     _
  __ _  __| |___  ___ ___  _   _| |_
 / _` |/ _` / __|/ __/ _ \| | | | __|
| (_| | (_| \__ \ (_| (_) | |_| | |_
 \__,_|\__,_|___/\___\___/ \__,_|\__|
";

#[derive(Parser)]
#[command(
    name = "adscout",
    about = "Enumerates security-relevant Active Directory misconfigurations",
    version,
    after_help = "Credential file format: one identifier:secret per line; \
                  a secret starting with HASH is treated as hash material."
)]
struct Cli {
    /// Domain name (e.g. corp.example.com)
    #[arg(long)]
    domain: String,

    /// Domain controller address (append :636 or use ldaps:// for LDAPS)
    #[arg(long)]
    domain_controller: String,

    /// Output filename for the JSON report
    #[arg(long)]
    filename: String,

    /// Username for directory login
    #[arg(long)]
    username: Option<String>,

    /// Password for directory login
    #[arg(long)]
    password: Option<String>,

    /// NTLM/AES hash for directory login
    #[arg(long)]
    hash: Option<String>,

    /// Credential file for rotation (one identifier:secret per line)
    #[arg(long)]
    userfile: Option<PathBuf>,

    /// Rotate through the credential file, one credential per query
    #[arg(long)]
    rotate: bool,
}

impl From<Cli> for ScanConfig {
    fn from(cli: Cli) -> Self {
        ScanConfig {
            domain: cli.domain,
            domain_controller: cli.domain_controller,
            filename: cli.filename,
            username: cli.username,
            password: cli.password,
            hash: cli.hash,
            userfile: cli.userfile,
            rotate: cli.rotate,
        }
    }
}

/// Prints per-query progress and per-category counts to the console.
struct ConsoleObserver;

impl ScanObserver for ConsoleObserver {
    fn query_started(&self, step: usize, total: usize, category: FindingCategory) {
        println!("[{}/{}] scanning {} ...", step, total, category);
    }

    fn category_count(&self, category: FindingCategory, count: usize) {
        println!("        {} found: {}", category, count);
    }
}

fn main() -> ExitCode {
    println!("{}", BANNER);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = ScanConfig::from(Cli::parse());

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ScanConfig) -> anyhow::Result<()> {
    // Configuration errors abort here, before any directory contact.
    let source = config.credential_source()?;

    let provider = LdapSessionProvider::new(
        config.domain_controller.clone(),
        config.domain.clone(),
    );
    let mut scanner = Scanner::new(provider, source, &config.domain);

    let findings = scanner.run(&ConsoleObserver)?;

    let report = ScanReport::build(&config.domain, &config.domain_controller, findings);
    println!("\nSummary for {}:", report.domain);
    print!("{}", report.summary());

    report.write_json(Path::new(&config.filename))?;
    println!("\nReport saved to {}", config.filename);

    Ok(())
}
