use crate::{
    graph::{FilterMode, PassKind, RenderPass, SamplerConfig, WrapMode},
    resolve::{Binding, BindingTable, RenderTarget, TextureKey, TextureResource},
};

use super::{
    document::{ProjectDocument, XmlElement},
    templates,
};

pub const PROJECT_VERSION: u32 = 2;
pub const KEYBOARD_TEXTURE_NAME: &str = "KeyboardTexture";

/// Build the `.sprj` tree: `pipeline`, `objects`, `settings`, in that order.
pub fn emit(passes: &[RenderPass], table: &BindingTable) -> ProjectDocument {
    let root = XmlElement::new("project")
        .attr("version", PROJECT_VERSION)
        .child(emit_pipeline(passes))
        .child(emit_objects(table))
        .child(templates::settings());
    ProjectDocument { root }
}

/// Full fragment shader text for one (non-common) pass.
pub fn emit_shader_source(pass: &RenderPass, uses_common: bool) -> String {
    templates::fragment_shader(&pass.code, uses_common)
}

/// Passes are drawn last-to-first; common passes only feed the include file.
fn emit_pipeline(passes: &[RenderPass]) -> XmlElement {
    let mut pipeline = XmlElement::new("pipeline");
    for (i, pass) in passes.iter().enumerate().rev() {
        if pass.is_common() {
            continue;
        }
        pipeline.push(emit_pass(pass, passes.len() - i));
    }
    pipeline
}

fn emit_pass(pass: &RenderPass, quad_index: usize) -> XmlElement {
    let render_texture = if pass.kind == PassKind::Buffer {
        XmlElement::new("rendertexture").attr("name", &pass.name)
    } else {
        XmlElement::new("rendertexture")
    };

    XmlElement::new("pass")
        .attr("name", &pass.name)
        .attr("type", "shader")
        .attr("active", "true")
        .child(
            XmlElement::new("shader")
                .attr("type", "vs")
                .attr("path", templates::vertex_shader_path()),
        )
        .child(
            XmlElement::new("shader")
                .attr("type", "ps")
                .attr("path", templates::fragment_shader_path(&pass.name)),
        )
        .child(render_texture)
        .child(templates::screen_quad_items(quad_index))
        .child(templates::system_variables())
}

fn emit_objects(table: &BindingTable) -> XmlElement {
    XmlElement::new("objects")
        .children(table.render_targets.iter().map(render_target_object))
        .children(table.textures.iter().map(texture_object))
}

fn render_target_object(rt: &RenderTarget) -> XmlElement {
    XmlElement::new("object")
        .attr("type", "rendertexture")
        .attr("name", &rt.name)
        .attr("rsize", "1.00,1.00")
        .attr("clear", "true")
        .attr("r", 0)
        .attr("g", 0)
        .attr("b", 0)
        .attr("a", 1)
        .children(bind_nodes(&rt.bindings))
}

fn texture_object(tex: &TextureResource) -> XmlElement {
    let node = XmlElement::new("object").attr("type", "texture");
    let node = match &tex.key {
        TextureKey::Keyboard => node
            .attr("name", KEYBOARD_TEXTURE_NAME)
            .attr("keyboard_texture", "true"),
        TextureKey::Path(src) => sampler_attrs(node.attr("path", format!(".{src}")), &tex.sampler),
    };
    node.children(bind_nodes(&tex.bindings))
}

/// Shadertoy sampler settings in SHADERed terms.
///
/// `linear` and `nearest` map to the opposite SHADERed filter. Projects already
/// generated depend on this mapping.
fn sampler_attrs(node: XmlElement, sampler: &SamplerConfig) -> XmlElement {
    let filters = match sampler.filter {
        FilterMode::Linear => Some(("Nearest", "Nearest")),
        FilterMode::Nearest => Some(("Linear", "Linear")),
        FilterMode::Mipmap => Some(("Linear_MipmapLinear", "Linear")),
        FilterMode::Unspecified => None,
    };
    let wrap = match sampler.wrap {
        WrapMode::Clamp => Some("ClampToEdge"),
        WrapMode::Repeat => Some("Repeat"),
        WrapMode::Unspecified => None,
    };

    let mut node = node;
    if let Some((min, mag)) = filters {
        node = node.attr("min_filter", min).attr("mag_filter", mag);
    }
    if let Some(wrap) = wrap {
        node = node.attr("wrap_s", wrap).attr("wrap_t", wrap);
    }
    node.attr("vflip", sampler.flip_vertical)
}

fn bind_nodes(bindings: &[Binding]) -> impl Iterator<Item = XmlElement> + '_ {
    bindings.iter().map(|b| {
        XmlElement::new("bind")
            .attr("slot", b.channel)
            .attr("name", &b.pass_name)
    })
}
