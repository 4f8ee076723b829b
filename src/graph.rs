//! Typed render-pass graph decoded from the Shadertoy API response.
//!
//! Decoding is permissive: a missing or wrong-typed field becomes `""`, `0` or
//! `false` instead of an error, so a malformed pass still produces a (degenerate)
//! [`RenderPass`]. Array order is preserved everywhere; channel binding and
//! pass emission depend on it.

use serde_json::Value;

use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassKind {
    Common,
    Buffer,
    Image,
    Sound,
    CubeMap,
    Other(String),
}

impl PassKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "common" => Self::Common,
            "buffer" => Self::Buffer,
            "image" => Self::Image,
            "sound" => Self::Sound,
            "cubemap" => Self::CubeMap,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Texture,
    Buffer,
    Keyboard,
    CubeMap,
    Music,
    Webcam,
    Video,
    Volume,
    Other(String),
}

impl InputKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "texture" => Self::Texture,
            "buffer" => Self::Buffer,
            "keyboard" => Self::Keyboard,
            "cubemap" => Self::CubeMap,
            "music" | "musicstream" => Self::Music,
            "webcam" => Self::Webcam,
            "video" => Self::Video,
            "volume" => Self::Volume,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
    Mipmap,
    Unspecified,
}

impl FilterMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "nearest" => Self::Nearest,
            "linear" => Self::Linear,
            "mipmap" => Self::Mipmap,
            _ => Self::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
    Unspecified,
}

impl WrapMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "clamp" => Self::Clamp,
            "repeat" => Self::Repeat,
            _ => Self::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub flip_vertical: bool,
    pub srgb: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            filter: FilterMode::Unspecified,
            wrap: WrapMode::Unspecified,
            flip_vertical: false,
            srgb: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub resource_id: i64,
    /// Parsed for symmetry with inputs; nothing downstream reads it.
    pub channel: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub resource_id: i64,
    pub channel: i64,
    pub kind: InputKind,
    /// Host-relative asset path, e.g. `/media/a/<hash>.png`. Only meaningful for textures.
    pub source: String,
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    pub name: String,
    pub kind: PassKind,
    pub code: String,
    pub outputs: Vec<Output>,
    pub inputs: Vec<Input>,
}

impl RenderPass {
    pub fn is_common(&self) -> bool {
        self.kind == PassKind::Common
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl ShaderInfo {
    pub fn link(&self) -> String {
        format!("www.shadertoy.com/view/{}", self.id)
    }

    /// Contents of the README written next to the project.
    pub fn readme(&self) -> String {
        format!(
            "Name: {}\nCreated by: {}\nLink: {}\n",
            self.name,
            self.username,
            self.link()
        )
    }
}

/// A decoded shader: metadata plus passes in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProject {
    pub info: ShaderInfo,
    pub passes: Vec<RenderPass>,
}

impl ShaderProject {
    pub fn common_pass(&self) -> Option<&RenderPass> {
        self.passes.iter().find(|p| p.is_common())
    }

    pub fn uses_common(&self) -> bool {
        self.common_pass().is_some()
    }
}

/// Decode a raw API response body.
///
/// Fails on invalid JSON, a non-object top level, or an `Error` string field.
pub fn parse_shader_json(body: &[u8]) -> Result<ShaderProject, ImportError> {
    let root: Value = serde_json::from_slice(body)?;
    parse_shader_value(&root)
}

pub fn parse_shader_value(root: &Value) -> Result<ShaderProject, ImportError> {
    if let Some(message) = root.get("Error").and_then(Value::as_str) {
        return Err(ImportError::Remote(message.to_string()));
    }
    if !root.is_object() {
        return Err(ImportError::NotAnObject);
    }

    let shader = field(root, "Shader");
    Ok(ShaderProject {
        info: parse_info(field(shader, "info")),
        passes: parse_render_passes(field(shader, "renderpass")),
    })
}

pub fn parse_render_passes(value: &Value) -> Vec<RenderPass> {
    items(value)
        .map(|rp| RenderPass {
            name: str_field(rp, "name"),
            kind: PassKind::parse(&str_field(rp, "type")),
            code: str_field(rp, "code"),
            outputs: parse_outputs(field(rp, "outputs")),
            inputs: parse_inputs(field(rp, "inputs")),
        })
        .collect()
}

fn parse_info(value: &Value) -> ShaderInfo {
    ShaderInfo {
        id: str_field(value, "id"),
        name: str_field(value, "name"),
        username: str_field(value, "username"),
    }
}

fn parse_outputs(value: &Value) -> Vec<Output> {
    items(value)
        .map(|o| Output {
            resource_id: int_field(o, "id"),
            channel: int_field(o, "channel"),
        })
        .collect()
}

fn parse_inputs(value: &Value) -> Vec<Input> {
    items(value)
        .map(|i| {
            let sampler = field(i, "sampler");
            Input {
                resource_id: int_field(i, "id"),
                channel: int_field(i, "channel"),
                kind: InputKind::parse(&str_field(i, "ctype")),
                source: str_field(i, "src"),
                sampler: SamplerConfig {
                    filter: FilterMode::parse(&str_field(sampler, "filter")),
                    wrap: WrapMode::parse(&str_field(sampler, "wrap")),
                    flip_vertical: bool_field(sampler, "vflip"),
                    srgb: bool_field(sampler, "srgb"),
                },
            }
        })
        .collect()
}

// Permissive accessors. `Value::Null` stands in for anything absent so lookups chain.

static NULL: Value = Value::Null;

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

fn items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

fn str_field(value: &Value, key: &str) -> String {
    field(value, key).as_str().unwrap_or("").to_string()
}

fn int_field(value: &Value, key: &str) -> i64 {
    let v = field(value, key);
    v.as_i64()
        .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .unwrap_or(0)
}

fn bool_field(value: &Value, key: &str) -> bool {
    field(value, key).as_bool().unwrap_or(false)
}
