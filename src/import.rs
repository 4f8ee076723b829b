use std::path::{Path, PathBuf};

use crate::{
    config::ImporterConfig,
    error::ImportError,
    graph::{self, ShaderInfo, ShaderProject},
    materialize::{AssetOutcome, MaterializeReport, materialize},
    project,
    remote::Fetch,
    resolve,
};

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub output_dir: PathBuf,
    pub project_file: PathBuf,
    pub info: ShaderInfo,
    /// Pass nodes in the project (common passes excluded).
    pub pass_count: usize,
    pub render_targets: usize,
    pub textures: usize,
    /// Resolver and materializer findings: dangling buffer inputs, duplicate
    /// producers, passes sharing a shader file.
    pub warnings: Vec<String>,
    pub materialized: MaterializeReport,
}

impl ImportReport {
    pub fn succeeded_assets(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.materialized.assets.iter().filter(|a| a.is_written())
    }

    pub fn failed_assets(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.materialized.assets.iter().filter(|a| !a.is_written())
    }
}

/// Fetch and decode a shader without touching the filesystem.
pub fn fetch_project(
    fetch: &dyn Fetch,
    config: &ImporterConfig,
    shader_id: &str,
) -> Result<ShaderProject, ImportError> {
    // Errors and logs carry the path without the api key.
    let display_path = format!("/api/v1/shaders/{shader_id}");

    let resp = fetch
        .get(&config.shader_api_path(shader_id))
        .map_err(|e| ImportError::Transport {
            path: display_path.clone(),
            message: format!("{e:#}"),
        })?;
    if !resp.is_ok() {
        return Err(ImportError::Status {
            path: display_path,
            status: resp.status,
        });
    }

    graph::parse_shader_json(&resp.body)
}

/// Run the whole pipeline for one shader id into `out_dir`.
pub fn import_shader(
    fetch: &dyn Fetch,
    config: &ImporterConfig,
    shader_id: &str,
    out_dir: &Path,
) -> Result<ImportReport, ImportError> {
    let project = fetch_project(fetch, config, shader_id)?;
    log::info!(
        "importing '{}' by {} ({} passes) into {}",
        project.info.name,
        project.info.username,
        project.passes.len(),
        out_dir.display()
    );

    let table = resolve::resolve(&project.passes);
    let document = project::emit(&project.passes, &table);
    let materialized = materialize(out_dir, &project, &document, fetch)?;

    let mut warnings = table.warnings;
    warnings.extend(materialized.warnings.iter().cloned());

    Ok(ImportReport {
        output_dir: out_dir.to_path_buf(),
        project_file: out_dir.join(project::PROJECT_FILE),
        pass_count: project.passes.iter().filter(|p| !p.is_common()).count(),
        render_targets: table.render_targets.len(),
        textures: table.textures.len(),
        warnings,
        info: project.info,
        materialized,
    })
}

/// Boolean form of [`import_shader`] used by the host surface.
pub fn generate(fetch: &dyn Fetch, config: &ImporterConfig, shader_id: &str, out_dir: &Path) -> bool {
    match import_shader(fetch, config, shader_id, out_dir) {
        Ok(report) => {
            let failed = report.failed_assets().count();
            if failed > 0 {
                log::warn!("{failed} texture(s) could not be downloaded");
            }
            log::info!("project written to {}", report.project_file.display());
            true
        }
        Err(e) => {
            log::error!("import of {shader_id} failed [{}]: {e}", e.code());
            false
        }
    }
}
