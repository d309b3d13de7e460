//! Profile management command implementations

use colored::Colorize;
use photonctl_core::{Config, Profile, WaitConfig};
use serde_json::json;
use tracing::{debug, info};

use crate::cli::{OutputFormat, ProfileCommands, ProfileSetArgs};
use crate::connection::ConnectionManager;
use crate::error::{PhotonCtlError, Result as CliResult};
use crate::output::{print_output, render_table};

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &mut ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    match profile_cmd {
        ProfileCommands::List => handle_list(conn_mgr, output_format),
        ProfileCommands::Show { name } => handle_show(conn_mgr, name, output_format),
        ProfileCommands::Set(args) => handle_set(conn_mgr, args),
        ProfileCommands::Remove { name } => handle_remove(conn_mgr, name),
        ProfileCommands::Default { name } => handle_default(conn_mgr, name),
        ProfileCommands::Path => handle_path(conn_mgr, output_format),
    }
}

fn profile_json(name: &str, profile: &Profile, is_default: bool) -> serde_json::Value {
    json!({
        "name": name,
        "default": is_default,
        "endpoint": profile.endpoint,
        "token": profile.masked_token(),
        "tenant": profile.tenant,
        "project": profile.project,
        "wait": profile.wait,
    })
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config = &conn_mgr.config;
    let default = config.default_profile.as_deref();
    let profiles = config.list_profiles();
    debug!("Listing {} profiles", profiles.len());

    if output_format.is_structured() {
        let list: Vec<_> = profiles
            .iter()
            .map(|(name, p)| profile_json(name, p, default == Some(name.as_str())))
            .collect();
        return print_output(list, output_format);
    }

    if profiles.is_empty() {
        println!("No profiles configured.");
        println!("Use 'photonctl profile set <name> --endpoint <url>' to create one.");
        return Ok(());
    }

    let rows = profiles
        .iter()
        .map(|(name, p)| {
            let marker = if default == Some(name.as_str()) { "*" } else { "" };
            vec![
                format!("{}{}", name, marker),
                p.endpoint.clone(),
                p.tenant.clone().unwrap_or_default(),
                p.project.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(&["Name", "Endpoint", "Tenant", "Project"], rows)
    );
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr.config.profile(name)?;
    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);

    if output_format.is_structured() {
        return print_output(profile_json(name, profile, is_default), output_format);
    }

    let policy = profile.wait_policy()?;
    println!("{}: {}", "Profile".bold(), name);
    println!("  Endpoint: {}", profile.endpoint);
    println!(
        "  Token:    {}",
        profile.masked_token().unwrap_or_else(|| "(none)".to_string())
    );
    if let Some(tenant) = &profile.tenant {
        println!("  Tenant:   {}", tenant);
    }
    if let Some(project) = &profile.project {
        println!("  Project:  {}", project);
    }
    println!(
        "  Wait:     timeout {}s, interval {}s, retry budget {}",
        policy.timeout.as_secs(),
        policy.interval.as_secs(),
        policy.retry_budget
    );
    if is_default {
        println!("  {}", "(default)".green());
    }
    Ok(())
}

fn handle_set(conn_mgr: &mut ConnectionManager, args: &ProfileSetArgs) -> CliResult<()> {
    let existing_wait = conn_mgr
        .config
        .profiles
        .get(&args.name)
        .and_then(|p| p.wait.clone());

    let wait = if args.wait_timeout.is_some()
        || args.wait_interval.is_some()
        || args.retry_budget.is_some()
    {
        let mut wait = existing_wait.unwrap_or_default();
        if let Some(secs) = args.wait_timeout {
            wait.timeout_secs = secs;
        }
        if let Some(secs) = args.wait_interval {
            wait.interval_secs = secs;
        }
        if let Some(budget) = args.retry_budget {
            wait.retry_budget = budget;
        }
        Some(wait)
    } else {
        existing_wait
    };
    if let Some(wait) = &wait {
        validate_wait(wait)?;
    }

    let profile = Profile {
        endpoint: args.endpoint.clone(),
        token: args.token.clone(),
        tenant: args.tenant.clone(),
        project: args.project.clone(),
        wait,
    };

    let first = conn_mgr.config.profiles.is_empty();
    conn_mgr.config.set_profile(args.name.clone(), profile);
    if first {
        conn_mgr.config.default_profile = Some(args.name.clone());
    }
    conn_mgr.save_config()?;

    info!("Saved profile {}", args.name);
    println!("Profile '{}' saved", args.name);
    if first {
        println!("Profile '{}' is now the default", args.name);
    }
    Ok(())
}

fn validate_wait(wait: &WaitConfig) -> CliResult<()> {
    wait.to_policy().map(|_| ()).map_err(|e| PhotonCtlError::InvalidInput {
        message: e.to_string(),
    })
}

fn handle_remove(conn_mgr: &mut ConnectionManager, name: &str) -> CliResult<()> {
    if conn_mgr.config.remove_profile(name).is_none() {
        return Err(PhotonCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }
    conn_mgr.save_config()?;
    println!("Profile '{}' removed", name);
    Ok(())
}

fn handle_default(conn_mgr: &mut ConnectionManager, name: &str) -> CliResult<()> {
    conn_mgr.config.profile(name)?;
    conn_mgr.config.default_profile = Some(name.to_string());
    conn_mgr.save_config()?;
    println!("Default profile set to '{}'", name);
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let path = match &conn_mgr.config_path {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    if output_format.is_structured() {
        return print_output(json!({ "path": path.display().to_string() }), output_format);
    }
    println!("{}", path.display());
    Ok(())
}
