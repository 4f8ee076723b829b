use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use shadertoy_import::{
    ImporterConfig, RemoteClient, import_shader, materialize::AssetStatus, plugin,
};

#[derive(Debug, Default, Clone)]
struct Cli {
    shader: Option<String>,
    output_dir: Option<PathBuf>,
    api_key: Option<String>,
    host: Option<String>,
}

const USAGE: &str =
    "usage: shadertoy-import <shadertoy link | shader id> --output-dir <dir> [--key <api key>] [--host <host>]";

fn parse_cli(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--output-dir" | "--outputdir" | "-o" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --output-dir"));
                };
                cli.output_dir = Some(PathBuf::from(v));
                i += 2;
            }
            "--key" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --key"));
                };
                cli.api_key = Some(v.clone());
                i += 2;
            }
            "--host" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --host"));
                };
                cli.host = Some(v.clone());
                i += 2;
            }
            other if other.starts_with('-') => {
                return Err(anyhow!("unknown argument: {other}\n{USAGE}"));
            }
            positional => {
                if cli.shader.is_some() {
                    bail!("unexpected extra argument: {positional}\n{USAGE}");
                }
                cli.shader = Some(positional.to_string());
                i += 1;
            }
        }
    }
    Ok(cli)
}

/// Accept either a full view link or a bare id.
fn resolve_shader_id(input: &str) -> Result<String> {
    if input.contains('/') {
        return plugin::shader_id_from_link(input)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("{}", plugin::ERR_BAD_LINK));
    }
    if !plugin::is_shader_id(input) {
        bail!("invalid shader id: {input:?}");
    }
    Ok(input.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&argv)?;

    let shader = cli.shader.ok_or_else(|| anyhow!("missing shader link or id\n{USAGE}"))?;
    let shader_id = resolve_shader_id(&shader)?;
    let output_dir = cli
        .output_dir
        .ok_or_else(|| anyhow!("{}\n{USAGE}", plugin::ERR_NO_PATH))?;

    let mut config = ImporterConfig::from_env();
    if let Some(key) = cli.api_key {
        config = config.with_api_key(key);
    }
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if config.api_key.is_empty() {
        log::warn!("no api key set (use --key or SHADERTOY_API_KEY); the request will likely be rejected");
    }

    let client = RemoteClient::new(&config)?;
    let report = import_shader(&client, &config, &shader_id, &output_dir)
        .map_err(|e| anyhow!("[{}] {e}", e.code()))?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for asset in report.failed_assets() {
        let reason = match &asset.status {
            AssetStatus::FetchFailed { reason }
            | AssetStatus::WriteFailed { reason }
            | AssetStatus::Skipped { reason } => reason.as_str(),
            AssetStatus::Written { .. } => continue,
        };
        eprintln!("texture {} skipped: {reason}", asset.source);
    }
    println!(
        "imported '{}' by {}: {} passes, {} render targets, {} textures -> {}",
        report.info.name,
        report.info.username,
        report.pass_count,
        report.render_targets,
        report.textures,
        report.project_file.display()
    );
    Ok(())
}
