//! Profile inspection commands

use comfy_table::Table;
use serde::Serialize;
use tracing::{debug, trace};

use auroractl_core::Profile;

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output;

#[derive(Debug, Serialize)]
struct ProfileSummary<'a> {
    name: &'a str,
    region: Option<&'a str>,
    aws_profile: Option<&'a str>,
    instance_class: &'a str,
    engine: String,
    is_default: bool,
}

pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    explicit_profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    match profile_cmd {
        ProfileCommands::List => handle_list(conn_mgr, output_format),
        ProfileCommands::Path => handle_path(conn_mgr, output_format),
        ProfileCommands::Show { name } => {
            handle_show(conn_mgr, name.as_deref().or(explicit_profile), output_format)
        }
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    trace!("Found {} profiles", profiles.len());

    let default = conn_mgr.config.default_profile.as_deref();
    let summaries: Vec<ProfileSummary> = profiles
        .iter()
        .map(|(name, profile)| ProfileSummary {
            name,
            region: profile.region.as_deref(),
            aws_profile: profile.aws_profile.as_deref(),
            instance_class: &profile.instance.instance_class,
            engine: profile.instance.engine.to_string(),
            is_default: default == Some(name.as_str()),
        })
        .collect();

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let config_path = conn_mgr
                .config_path()
                .ok()
                .map(|p| p.to_string_lossy().to_string());
            let output_data = serde_json::json!({
                "config_path": config_path,
                "profiles": summaries,
                "count": summaries.len(),
            });
            output::print_output(&output_data, structured(output_format))?;
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if summaries.is_empty() {
                println!("No profiles configured.");
                println!("Built-in defaults and the AWS credential chain apply.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["NAME", "REGION", "AWS PROFILE", "INSTANCE", "DEFAULT"]);
            for summary in &summaries {
                table.add_row(vec![
                    summary.name.to_string(),
                    summary.region.unwrap_or("-").to_string(),
                    summary.aws_profile.unwrap_or("-").to_string(),
                    format!("{} {}", summary.engine, summary.instance_class),
                    if summary.is_default { "*" } else { "" }.to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.config_path()?;

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output_data = serde_json::json!({
                "config_path": config_path.to_string_lossy(),
            });
            output::print_output(&output_data, structured(output_format))?;
        }
        _ => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let resolved = conn_mgr.resolve_profile(name)?;
    let display_name = resolved.name.as_deref().unwrap_or("(defaults)");
    debug!(profile = display_name, "Showing profile");

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output_data = serde_json::json!({
                "name": resolved.name,
                "profile": resolved.profile,
            });
            output::print_output(&output_data, structured(output_format))?;
        }
        OutputFormat::Table => {
            output::print_output(&resolved.profile, output::OutputFormat::Table)?;
        }
        OutputFormat::Auto => print_profile(display_name, &resolved.profile),
    }
    Ok(())
}

fn print_profile(name: &str, profile: &Profile) {
    let polling = &profile.polling;
    println!("Profile: {name}");
    println!("Region: {}", profile.region.as_deref().unwrap_or("(AWS default)"));
    println!(
        "AWS profile: {}",
        profile.aws_profile.as_deref().unwrap_or("(AWS default)")
    );
    if let Some(endpoint) = &profile.endpoint_url {
        println!("Endpoint: {endpoint}");
    }
    println!("Poll interval: {}s", polling.interval_secs);
    println!(
        "Max attempts: {}",
        polling
            .max_attempts
            .map_or("unlimited".to_string(), |n| n.to_string())
    );
    println!(
        "Timeout: {}",
        polling
            .timeout_secs
            .map_or("none".to_string(), |secs| format!("{secs}s"))
    );
    println!(
        "Instance: {} {}",
        profile.instance.engine, profile.instance.instance_class
    );
}

fn structured(format: OutputFormat) -> output::OutputFormat {
    match format {
        OutputFormat::Yaml => output::OutputFormat::Yaml,
        OutputFormat::Table => output::OutputFormat::Table,
        _ => output::OutputFormat::Json,
    }
}
