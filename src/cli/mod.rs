//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{Config, Source, View};
use crate::error::{CrumbsError, Result};
use crate::exit_code::exit_code_for_error;
use crate::export::{to_clipboard_text, ClipboardPayload, ExportCookie};
use crate::http::CollectorClient;
use crate::output::{render_profile_summary, render_profiles, OutputWriter};
use crate::profile::{group_by_profile, select_record, total_records, Profile};
use crate::record::{parse_records, RawRecord};
use crate::utils::{FileUtils, StringUtils};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Read;

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    crate::logging::init(matches.get_flag("verbose"));

    let config = match build_config_from_args(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("crumbs: error: {}", e);
            std::process::exit(exit_code_for_error(&e));
        }
    };

    let writer = OutputWriter::new(config.output.clone());
    if let Err(e) = run_with_config(&config, &writer) {
        writer.write_error(&e.to_string());
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Load captures, group them and write the requested view
pub fn run_with_config(config: &Config, writer: &OutputWriter) -> Result<()> {
    let records = load_records(config).map_err(|e| {
        log::error!("Error fetching data: {}", e);
        CrumbsError::NoData(Box::new(e))
    })?;

    let profiles = group_by_profile(&records);
    writer.write_verbose(&format!(
        "{} captures in {} profiles",
        total_records(&profiles),
        profiles.len()
    ));

    writer.write(&render_view(&config.view, &profiles)?)
}

/// Render one view of already grouped captures
pub fn render_view(view: &View, profiles: &[Profile]) -> Result<String> {
    match view {
        View::List { profile, collapsed } => {
            let text = match profile {
                Some(name) => {
                    let selected: Vec<Profile> = profiles
                        .iter()
                        .filter(|p| &p.name == name)
                        .cloned()
                        .collect();
                    render_profiles(&selected, *collapsed)
                }
                None => render_profiles(profiles, *collapsed),
            };
            Ok(text)
        }
        View::Profiles => Ok(render_profile_summary(profiles)),
        View::Cookies { id } => {
            let record = select_record(profiles, id)
                .ok_or_else(|| CrumbsError::NotFound(id.clone()))?;
            let cookies = ExportCookie::from_record(record);
            Ok(with_newline(to_clipboard_text(ClipboardPayload::Cookies(
                &cookies,
            ))))
        }
        View::LocalStorage { id } => {
            let record = select_record(profiles, id)
                .ok_or_else(|| CrumbsError::NotFound(id.clone()))?;
            Ok(with_newline(to_clipboard_text(ClipboardPayload::LocalData(
                &record.local_data,
            ))))
        }
    }
}

fn with_newline(mut text: String) -> String {
    text.push('\n');
    text
}

/// Read the raw capture list from the configured source
pub fn load_records(config: &Config) -> Result<Vec<RawRecord>> {
    match &config.source.source {
        Some(Source::Remote(_)) => {
            let rt = tokio::runtime::Runtime::new().map_err(|e| {
                CrumbsError::Config(format!("Failed to create async runtime: {}", e))
            })?;
            rt.block_on(async {
                let client = CollectorClient::new(config.clone())?;
                client.fetch_records().await
            })
        }
        Some(Source::File(path)) if path.as_os_str() == "-" => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(parse_records(body.as_bytes())?)
        }
        Some(Source::File(path)) => {
            FileUtils::check_file_readable(path)?;
            let body = std::fs::read(path)?;
            Ok(parse_records(&body)?)
        }
        None => Err(CrumbsError::Config(
            "No capture source: pass --input FILE or --url URL".to_string(),
        )),
    }
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("crumbs")
        .version(crate::VERSION)
        .about("Browse captured cookies and local storage by profile")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .help("Read captures from a JSON file ('-' for stdin); overrides --url")
            .global(true))
        .arg(Arg::new("url")
            .long("url")
            .value_name("URL")
            .env("CRUMBS_API_URL")
            .help("Collector endpoint returning the capture list")
            .global(true))
        .arg(Arg::new("key")
            .long("key")
            .value_name("KEY")
            .env("CRUMBS_SPEC")
            .hide_env_values(true)
            .help("Access key sent to the collector")
            .global(true))
        .arg(Arg::new("key-header")
            .long("key-header")
            .value_name("NAME")
            .help("Header name used for the access key")
            .default_value(crate::config::DEFAULT_KEY_HEADER)
            .global(true))
        .arg(Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .help("Maximum time for the collector request")
            .default_value("60")
            .global(true))
        .arg(Arg::new("connect-timeout")
            .long("connect-timeout")
            .value_name("SECONDS")
            .help("Maximum time for connection")
            .default_value("10")
            .global(true))
        .arg(Arg::new("insecure")
            .short('k')
            .long("insecure")
            .help("Allow insecure SSL connections")
            .action(ArgAction::SetTrue)
            .global(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Write output to file")
            .global(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Verbose output")
            .action(ArgAction::SetTrue)
            .global(true))
        .arg(Arg::new("silent")
            .short('s')
            .long("silent")
            .help("Silent mode")
            .action(ArgAction::SetTrue)
            .global(true))
        .subcommand(Command::new("list")
            .about("Show captures grouped by profile, newest first")
            .arg(Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("NAME")
                .help("Only show this profile"))
            .arg(Arg::new("collapsed")
                .long("collapsed")
                .help("Only show capture headers")
                .action(ArgAction::SetTrue)))
        .subcommand(Command::new("profiles")
            .about("List profile names and capture counts"))
        .subcommand(Command::new("cookies")
            .about("Print a capture's cookies in cookie-import format")
            .arg(Arg::new("id")
                .help("Capture _id, or PROFILE:N for the Nth capture listed under PROFILE")
                .required(true)
                .index(1)))
        .subcommand(Command::new("local-storage")
            .about("Print a capture's local storage as JSON")
            .arg(Arg::new("id")
                .help("Capture _id, or PROFILE:N for the Nth capture listed under PROFILE")
                .required(true)
                .index(1)))
}

/// Build configuration from command line arguments
pub fn build_config_from_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::default();

    // Capture source
    if let Some(input) = matches.get_one::<String>("input") {
        let path = if input == "-" {
            input.into()
        } else {
            FileUtils::expand_path(input)?
        };
        config.source.source = Some(Source::File(path));
    } else if let Some(url) = matches.get_one::<String>("url") {
        config.source.source = Some(Source::Remote(url.clone()));
    }

    // Access key
    config.source.key = matches.get_one::<String>("key").cloned();
    if let Some(header) = matches.get_one::<String>("key-header") {
        config.source.key_header = header.clone();
    }

    // Configure timeouts
    if let Some(timeout_str) = matches.get_one::<String>("timeout") {
        config.source.timeout = StringUtils::parse_timeout(timeout_str)?;
    }

    if let Some(connect_timeout_str) = matches.get_one::<String>("connect-timeout") {
        config.source.connect_timeout = StringUtils::parse_timeout(connect_timeout_str)?;
    }

    config.source.verify_certs = !matches.get_flag("insecure");

    // Configure output
    config.output.verbose = matches.get_flag("verbose");
    config.output.silent = matches.get_flag("silent");

    if let Some(output_file) = matches.get_one::<String>("output") {
        config.output.file = Some(FileUtils::expand_path(output_file)?);
    }

    config.view = match matches.subcommand() {
        Some(("list", sub)) => View::List {
            profile: sub.get_one::<String>("profile").cloned(),
            collapsed: sub.get_flag("collapsed"),
        },
        Some(("profiles", _)) => View::Profiles,
        Some(("cookies", sub)) => View::Cookies {
            id: required_id(sub)?,
        },
        Some(("local-storage", sub)) => View::LocalStorage {
            id: required_id(sub)?,
        },
        _ => View::List {
            profile: None,
            collapsed: false,
        },
    };

    Ok(config)
}

fn required_id(matches: &ArgMatches) -> Result<String> {
    matches
        .get_one::<String>("id")
        .cloned()
        .ok_or_else(|| CrumbsError::Config("Missing capture id".to_string()))
}
