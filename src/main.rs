//! fetchguard - security policy engine for network-facing tools
//!
//! # Usage
//!
//! ```bash
//! # Check whether a hostname may be contacted
//! fetchguard --check-domain malicious-site.example
//!
//! # Analyse content from stdin (JSON verdict to stdout)
//! cat response-body.txt | fetchguard --tool web_fetch --domain example.com
//!
//! # Validate a rules document
//! fetchguard --rules ./rules.toml --validate
//! ```

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

use fetchguard::{RuleSetConfig, SecurityManager, SourceContext};

/// Print version information
fn print_version() {
    println!("fetchguard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"fetchguard - security policy engine for network-facing tools

USAGE:
    fetchguard [OPTIONS]

With no mode option, content is read from stdin, analysed against the rules,
and the verdict is printed to stdout as JSON.

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -r, --rules PATH        Path to rules file (default: ~/.fetchguard/rules.toml)
        --check-domain HOST Check whether HOST may be contacted
        --validate          Validate the rules document and exit
        --url URL           Source URL for the analysed content
        --domain DOMAIN     Source domain for the analysed content
        --tool NAME         Name of the tool that retrieved the content

ENVIRONMENT:
    FETCHGUARD_RULES_PATH        Rules file override
    FETCHGUARD_DOMAIN_ALLOWLIST  Comma-separated fetch allowlist
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    rules_path: Option<String>,
    check_domain: Option<String>,
    validate: bool,
    url: String,
    domain: String,
    tool: String,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            rules_path: None,
            check_domain: None,
            validate: false,
            url: String::new(),
            domain: String::new(),
            tool: String::new(),
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "--validate" => result.validate = true,
                "-r" | "--rules" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.rules_path = Some(args[i].clone());
                    }
                }
                "--check-domain" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.check_domain = Some(args[i].clone());
                    }
                }
                "--url" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.url = args[i].clone();
                    }
                }
                "--domain" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.domain = args[i].clone();
                    }
                }
                "--tool" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.tool = args[i].clone();
                    }
                }
                arg if arg.starts_with("--rules=") => {
                    result.rules_path = Some(arg.trim_start_matches("--rules=").to_string());
                }
                arg if arg.starts_with("--check-domain=") => {
                    result.check_domain =
                        Some(arg.trim_start_matches("--check-domain=").to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn load_config(args: &Args) -> Result<RuleSetConfig, fetchguard::ConfigError> {
    match &args.rules_path {
        Some(path) => RuleSetConfig::from_file(std::path::Path::new(path)),
        None => RuleSetConfig::load(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if args.validate {
        return match fetchguard::RuleSet::compile(config) {
            Ok(rules) => {
                println!(
                    "rules OK: version {}, {} rules, {} deny domains, {} trusted domains",
                    rules.version(),
                    rules.rules().len(),
                    rules.deny_domains().len(),
                    rules.trusted_domains().len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        };
    }

    let manager = match SecurityManager::new(config) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(hostname) = &args.check_domain {
        return match manager.check_domain_access(hostname) {
            Ok(()) => {
                println!("{}", serde_json::json!({ "allowed": true }));
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!(
                    "{}",
                    serde_json::json!({ "allowed": false, "message": e.to_string() })
                );
                ExitCode::FAILURE
            }
        };
    }

    // Default mode: analyse stdin content.
    let mut content = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut content) {
        eprintln!("Error: failed to read stdin: {}", e);
        return ExitCode::from(2);
    }

    let source = SourceContext {
        url: args.url,
        domain: args.domain,
        content_type: String::new(),
        tool: args.tool,
    };

    let verdict = manager.analyse_content(&content, &source);
    let blocked = verdict.is_blocked();
    match serde_json::to_string(&verdict) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: failed to serialize verdict: {}", e);
            return ExitCode::from(2);
        }
    }

    if blocked {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
