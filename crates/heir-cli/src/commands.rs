use std::io::Write;
use std::path::Path;

use colored::Colorize;
use heir_sdk::{
    AppOutcome, FsManifestLoader, InheritanceChain, Resolution, ResolvedApplication, Resolver,
};
use serde_json::json;

use crate::cli::*;
use crate::config::CliConfig;

/// Run a command, writing its report to `out`.
///
/// Returns `Ok(false)` when the command ran but some application failed.
pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<bool> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.format);
    let resolver = Resolver::with_config(FsManifestLoader::new(), &config.resolver);

    match cli.command {
        Command::Resolve(args) => cmd_resolve(&resolver, args, format, out),
        Command::Chain(args) => cmd_chain(&resolver, &args.manifest, format, out),
        Command::Validate(args) => cmd_validate(&resolver, &args.manifest, format, out),
    }
}

fn cmd_resolve(
    resolver: &Resolver<FsManifestLoader>,
    args: ResolveArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let resolution = match &args.app {
        Some(name) => {
            let chain = resolver.chain(&args.manifest)?;
            Resolution {
                chain: chain.paths(),
                outcomes: vec![resolver.resolve_in_chain(&chain, name)],
            }
        }
        None => resolver.resolve_all(&args.manifest)?,
    };

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?,
        OutputFormat::Text => {
            for (i, outcome) in resolution.outcomes.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", render_outcome(outcome))?;
            }
        }
    }
    Ok(resolution.is_success())
}

fn cmd_chain(
    resolver: &Resolver<FsManifestLoader>,
    manifest: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let chain = resolver.chain(manifest)?;
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({ "chain": chain.paths() }))?)?
        }
        OutputFormat::Text => write!(out, "{}", render_chain(&chain))?,
    }
    Ok(true)
}

fn cmd_validate(
    resolver: &Resolver<FsManifestLoader>,
    manifest: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let resolution = resolver.resolve_all(manifest)?;
    match format {
        OutputFormat::Json => {
            let report: Vec<_> = resolution
                .outcomes
                .iter()
                .map(|o| {
                    json!({
                        "name": o.name,
                        "valid": o.is_ok(),
                        "error": o.result.as_ref().err().map(ToString::to_string),
                        "amendments": o.amendments,
                    })
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => {
            for outcome in &resolution.outcomes {
                match &outcome.result {
                    Ok(_) => writeln!(out, "{} {}", "✓".green().bold(), display_name(&outcome.name))?,
                    Err(e) => writeln!(out, "{} {}: {}", "✗".red().bold(), display_name(&outcome.name), e)?,
                }
                for note in &outcome.amendments {
                    writeln!(out, "    {} {}", "note:".yellow(), note)?;
                }
            }
        }
    }
    Ok(resolution.is_success())
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "(unnamed)".to_string()
    } else {
        name.to_string()
    }
}

fn render_chain(chain: &InheritanceChain) -> String {
    let mut text = String::new();
    for (depth, document) in chain.iter().enumerate() {
        let marker = if depth == 0 { "•".to_string() } else { "└─".to_string() };
        let role = if depth + 1 == chain.len() { " (leaf)".dimmed().to_string() } else { String::new() };
        text.push_str(&format!(
            "{}{} {}{}\n",
            "   ".repeat(depth.saturating_sub(1)),
            marker,
            document.location().display().to_string().bold(),
            role
        ));
    }
    text
}

fn render_outcome(outcome: &AppOutcome) -> String {
    match &outcome.result {
        Ok(app) => {
            let mut text = render_application(app);
            for note in &outcome.amendments {
                text.push_str(&format!("  {} {}\n", "note:".yellow(), note));
            }
            text
        }
        Err(e) => format!(
            "{} {}\n  {} {}\n",
            "✗".red().bold(),
            display_name(&outcome.name).bold(),
            "error:".red(),
            e
        ),
    }
}

fn render_application(app: &ResolvedApplication) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();
    let mut push = |key: &'static str, value: Option<String>| {
        if let Some(v) = value {
            fields.push((key, v));
        }
    };

    push("memory", app.memory().map(|m| m.to_string()));
    push("disk_quota", app.disk_quota().map(|m| m.to_string()));
    push("instances", app.instances().map(|n| n.to_string()));
    push("buildpack", app.buildpack().map(str::to_string));
    push("docker.image", app.docker_image().map(str::to_string));
    push("docker.username", app.docker_username().map(str::to_string));
    push("path", app.path().map(|p| p.display().to_string()));
    push("command", app.command().map(str::to_string));
    push("stack", app.stack().map(str::to_string));
    push("health_check_type", app.health_check_type().map(|t| t.to_string()));
    push(
        "health_check_http_endpoint",
        app.health_check_http_endpoint().map(str::to_string),
    );
    push("timeout", app.health_check_timeout().map(|n| n.to_string()));
    push("no_route", app.no_route().map(|b| b.to_string()));
    push("random_route", app.random_route().map(|b| b.to_string()));
    push("no_hostname", app.no_hostname().map(|b| b.to_string()));

    let mut text = format!("{} {}\n", "✓".green().bold(), display_name(app.name()).bold());
    for (key, value) in &fields {
        text.push_str(&format!("  {:<28}{}\n", format!("{key}:").cyan(), value));
    }
    let ports: Vec<String> = app.app_ports().iter().map(u16::to_string).collect();
    let lists: [(&str, &[String]); 5] = [
        ("routes", app.routes()),
        ("services", app.services()),
        ("hosts", app.hosts()),
        ("domains", app.domains()),
        ("app_ports", ports.as_slice()),
    ];
    for (key, items) in lists {
        if items.is_empty() {
            continue;
        }
        text.push_str(&format!("  {}\n", format!("{key}:").cyan()));
        for item in items {
            text.push_str(&format!("    - {item}\n"));
        }
    }
    if !app.env().is_empty() {
        text.push_str(&format!("  {}\n", "env:".cyan()));
        for (key, value) in app.env() {
            text.push_str(&format!("    {key}={value}\n"));
        }
    }
    text
}
