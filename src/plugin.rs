//! Host integration surface.
//!
//! The editor asks its plugins about a long list of capabilities; this plugin
//! only contributes a `File` menu entry and an import modal. Everything else
//! falls through to [`HostPlugin::supports`], which says no.

use std::path::{Path, PathBuf};

use crate::{
    config::{CANONICAL_VIEW_URL, ImporterConfig},
    import,
    project::PROJECT_FILE,
    remote::Fetch,
};

pub const FILE_MENU: &str = "file";
pub const IMPORT_MENU_ITEM: &str = "Import Shadertoy project";

pub const ERR_BAD_LINK: &str = "Please insert correct Shadertoy link.";
pub const ERR_NO_PATH: &str = "Please set the output path";
pub const ERR_IMPORT_FAILED: &str =
    "Shader either doesn't exist or doesn't have the PublicAPI flag set";

/// Capabilities a host may query beyond the lifecycle/menu hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CustomMenu,
    ContextItems,
    SystemVariables,
    VariableFunctions,
    ObjectPreview,
    ObjectProperties,
    ObjectBinding,
    PipelineItems,
    Options,
    CodeEditorLanguage,
    DropFile,
    ShaderFilePaths,
}

/// What the editor calls on a plugin.
pub trait HostPlugin {
    fn init(&mut self) -> bool {
        true
    }

    fn update(&mut self, _delta: f32) {}

    fn destroy(&mut self) {}

    fn has_menu_items(&self, _menu: &str) -> bool {
        false
    }

    fn menu_items(&self, _menu: &str) -> Vec<&'static str> {
        Vec::new()
    }

    fn on_menu_item(&mut self, _menu: &str, _item: &str) {}

    fn supports(&self, _capability: Capability) -> bool {
        false
    }
}

/// What a plugin may ask of the editor.
pub trait Host {
    /// Load a project file, replacing the current one.
    fn open_project(&mut self, path: &Path) -> bool;
}

/// Shadertoy ids are short ASCII alphanumeric strings; anything else would
/// need escaping in the api path.
pub fn is_shader_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Extract the shader id (last path segment) from a Shadertoy view link.
///
/// Returns `None` unless the link contains `www.shadertoy.com/view/` and ends in
/// a valid [`is_shader_id`] segment. Query strings and fragments are dropped.
pub fn shader_id_from_link(link: &str) -> Option<&str> {
    let link = link.trim();
    if !link.contains(CANONICAL_VIEW_URL) {
        return None;
    }
    let link = link.split(['?', '#']).next().unwrap_or(link);
    let id = link.rsplit('/').next()?;
    is_shader_id(id).then_some(id)
}

/// State behind the import modal, owned by the plugin instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportModalState {
    pub link: String,
    pub path: String,
    /// Set by the menu item; consumed by the next `update`.
    pub popup_requested: bool,
    pub is_open: bool,
    pub error: Option<String>,
}

pub struct ShadertoyPlugin<F: Fetch> {
    config: ImporterConfig,
    fetch: F,
    pub modal: ImportModalState,
}

impl<F: Fetch> ShadertoyPlugin<F> {
    pub fn new(config: ImporterConfig, fetch: F) -> Self {
        Self {
            config,
            fetch,
            modal: ImportModalState::default(),
        }
    }

    /// "Ok" in the modal. On success the new project is opened and the modal closes;
    /// otherwise the modal stays open with `modal.error` set.
    pub fn submit(&mut self, host: &mut dyn Host) -> bool {
        self.modal.error = None;

        let Some(id) = shader_id_from_link(&self.modal.link).map(str::to_string) else {
            self.modal.error = Some(ERR_BAD_LINK.to_string());
            return false;
        };
        if self.modal.path.trim().is_empty() {
            self.modal.error = Some(ERR_NO_PATH.to_string());
            return false;
        }

        let out_dir = PathBuf::from(self.modal.path.trim());
        if !import::generate(&self.fetch, &self.config, &id, &out_dir) {
            self.modal.error = Some(ERR_IMPORT_FAILED.to_string());
            return false;
        }

        let project = out_dir.join(PROJECT_FILE);
        if !host.open_project(&project) {
            log::warn!("host refused to open {}", project.display());
        }
        self.modal.is_open = false;
        true
    }

    pub fn cancel(&mut self) {
        self.modal.is_open = false;
    }
}

impl<F: Fetch> HostPlugin for ShadertoyPlugin<F> {
    fn init(&mut self) -> bool {
        self.modal = ImportModalState::default();
        true
    }

    fn update(&mut self, _delta: f32) {
        if self.modal.popup_requested {
            self.modal.popup_requested = false;
            self.modal.is_open = true;
            self.modal.error = None;
        }
    }

    fn has_menu_items(&self, menu: &str) -> bool {
        menu == FILE_MENU
    }

    fn menu_items(&self, menu: &str) -> Vec<&'static str> {
        if menu == FILE_MENU {
            vec![IMPORT_MENU_ITEM]
        } else {
            Vec::new()
        }
    }

    fn on_menu_item(&mut self, menu: &str, item: &str) {
        if menu == FILE_MENU && item == IMPORT_MENU_ITEM {
            self.modal.popup_requested = true;
        }
    }
}
