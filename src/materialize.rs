//! Writes an imported project to disk.
//!
//! Layout below the output directory:
//! - `README.txt`
//! - `project.sprj`
//! - `common.glsl` (only when the shader has a common pass)
//! - `shaders/<pass>.glsl` and `shaders/shadertoyVS.glsl`
//! - textures at their remote paths, e.g. `media/a/<hash>.png`
//!
//! Texture downloads are best-effort: each one gets an [`AssetOutcome`], and
//! none of them can fail the import.

use std::{
    collections::HashSet,
    fs::File,
    io::Write,
    path::{Component, Path, PathBuf},
};

use crate::{
    error::ImportError,
    graph::{InputKind, ShaderProject},
    project::{self, ProjectDocument, templates},
    remote::Fetch,
};

pub const README_FILE: &str = "README.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Written {
        bytes: usize,
        /// Image format sniffed from the payload, if recognizable.
        format: Option<String>,
    },
    FetchFailed {
        reason: String,
    },
    WriteFailed {
        reason: String,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutcome {
    /// Remote path as it appeared in the shader json.
    pub source: String,
    pub destination: Option<PathBuf>,
    pub status: AssetStatus,
}

impl AssetOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self.status, AssetStatus::Written { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Generated files (README, project, shaders), in write order.
    pub written: Vec<PathBuf>,
    pub assets: Vec<AssetOutcome>,
    /// Non-fatal findings, e.g. two passes sharing one shader file.
    pub warnings: Vec<String>,
}

pub fn materialize(
    out_dir: &Path,
    project: &ShaderProject,
    document: &ProjectDocument,
    fetch: &dyn Fetch,
) -> Result<MaterializeReport, ImportError> {
    let mut report = MaterializeReport::default();

    let shaders_dir = out_dir.join(templates::SHADERS_DIR);
    std::fs::create_dir_all(&shaders_dir).map_err(|e| ImportError::io(&shaders_dir, e))?;

    write_file(
        &out_dir.join(README_FILE),
        project.info.readme().as_bytes(),
        &mut report,
    )?;

    let xml = document
        .to_xml_string()
        .map_err(|e| ImportError::Serialize(format!("{e:#}")))?;
    write_file(&out_dir.join(project::PROJECT_FILE), xml.as_bytes(), &mut report)?;

    let common = project.common_pass();
    if let Some(common) = common {
        write_file(
            &out_dir.join(templates::COMMON_INCLUDE_FILE),
            common.code.as_bytes(),
            &mut report,
        )?;
    }

    let mut shader_files: HashSet<String> = HashSet::new();
    for pass in project.passes.iter().filter(|p| !p.is_common()) {
        let file = templates::fragment_shader_file(&pass.name);
        if !shader_files.insert(file.clone()) {
            let message = format!(
                "pass '{}' shares shader file {file} with an earlier pass; the later pass wins",
                pass.name
            );
            log::warn!("{message}");
            report.warnings.push(message);
        }
        let source = project::emit_shader_source(pass, common.is_some());
        write_file(&shaders_dir.join(&file), source.as_bytes(), &mut report)?;
    }
    write_file(
        &shaders_dir.join(templates::VERTEX_SHADER_FILE),
        templates::VERTEX_SHADER.as_bytes(),
        &mut report,
    )?;

    let mut seen: HashSet<&str> = HashSet::new();
    let sources = project
        .passes
        .iter()
        .flat_map(|p| p.inputs.iter())
        .filter(|i| i.kind == InputKind::Texture)
        .map(|i| i.source.as_str());
    for source in sources {
        if !seen.insert(source) {
            continue;
        }
        let outcome = download_texture(out_dir, source, fetch);
        match &outcome.status {
            AssetStatus::Written { bytes, .. } => {
                log::info!("downloaded {source} ({bytes} bytes)");
            }
            AssetStatus::FetchFailed { reason }
            | AssetStatus::WriteFailed { reason }
            | AssetStatus::Skipped { reason } => {
                log::warn!("texture {source} not materialized: {reason}");
            }
        }
        report.assets.push(outcome);
    }

    Ok(report)
}

fn write_file(path: &Path, bytes: &[u8], report: &mut MaterializeReport) -> Result<(), ImportError> {
    std::fs::write(path, bytes).map_err(|e| ImportError::io(path, e))?;
    log::debug!("wrote {}", path.display());
    report.written.push(path.to_path_buf());
    Ok(())
}

/// Where a remote texture lands locally. `None` if the path is empty or would
/// escape `out_dir`.
pub fn texture_destination(out_dir: &Path, source: &str) -> Option<PathBuf> {
    let relative = Path::new(source.trim_start_matches('/'));
    let mut has_normal = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    has_normal.then(|| out_dir.join(relative))
}

fn download_texture(out_dir: &Path, source: &str, fetch: &dyn Fetch) -> AssetOutcome {
    let outcome = |destination: Option<PathBuf>, status: AssetStatus| AssetOutcome {
        source: source.to_string(),
        destination,
        status,
    };

    let Some(dest) = texture_destination(out_dir, source) else {
        return outcome(
            None,
            AssetStatus::Skipped {
                reason: "source path is empty or leaves the output directory".to_string(),
            },
        );
    };

    if let Some(parent) = dest.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            let reason = format!("failed to create {}: {e}", parent.display());
            return outcome(Some(dest), AssetStatus::WriteFailed { reason });
        }
    }

    // Created before the request: a failed download leaves an empty file behind.
    let mut file = match File::create(&dest) {
        Ok(f) => f,
        Err(e) => {
            let reason = format!("failed to create {}: {e}", dest.display());
            return outcome(Some(dest), AssetStatus::WriteFailed { reason });
        }
    };

    let status = match fetch.get(source) {
        Ok(resp) if resp.is_ok() => match file.write_all(&resp.body) {
            Ok(()) => AssetStatus::Written {
                bytes: resp.body.len(),
                format: image::guess_format(&resp.body)
                    .ok()
                    .map(|f| format!("{f:?}").to_ascii_lowercase()),
            },
            Err(e) => AssetStatus::WriteFailed {
                reason: format!("failed to write {}: {e}", dest.display()),
            },
        },
        Ok(resp) => AssetStatus::FetchFailed {
            reason: format!("HTTP {}", resp.status),
        },
        Err(e) => AssetStatus::FetchFailed {
            reason: format!("{e:#}"),
        },
    };
    outcome(Some(dest), status)
}
