//! Fixed GLSL and `.sprj` fragments shared by every imported project.

use super::document::XmlElement;

pub const VERTEX_SHADER_FILE: &str = "shadertoyVS.glsl";
pub const COMMON_INCLUDE_FILE: &str = "common.glsl";
pub const SHADERS_DIR: &str = "shaders";

/// Passthrough vertex shader used by every pass's screen quad.
pub const VERTEX_SHADER: &str = "#version 330

layout (location = 0) in vec2 pos;
layout (location = 1) in vec2 uv;

out vec2 outUV;

void main() {
\tgl_Position = vec4(pos, 0.0, 1.0);
\toutUV = uv;
}
";

const FRAGMENT_UNIFORMS: &str = "uniform vec2 iResolution;
uniform float iTime;
uniform float iTimeDelta;
uniform int iFrame;
uniform vec4 iMouse;
uniform sampler2D iChannel0;
uniform sampler2D iChannel1;
uniform sampler2D iChannel2;
uniform sampler2D iChannel3;
out vec4 shadertoy_outcolor;
";

/// Wrap a Shadertoy pass body (which defines `mainImage`) into a complete fragment shader.
pub fn fragment_shader(code: &str, uses_common: bool) -> String {
    let include = if uses_common {
        format!("#include <{COMMON_INCLUDE_FILE}>\n")
    } else {
        String::new()
    };
    format!(
        "#version 330\n\n{include}{FRAGMENT_UNIFORMS}\n{code}\nvoid main()\n{{\n\tmainImage(shadertoy_outcolor, gl_FragCoord.xy);\n}}"
    )
}

pub fn vertex_shader_path() -> String {
    format!("{SHADERS_DIR}/{VERTEX_SHADER_FILE}")
}

/// File name a pass's fragment shader is written under, inside [`SHADERS_DIR`].
///
/// Pass names come from remote json, so anything other than ASCII letters,
/// digits, spaces, `_` and `-` becomes `_`. An empty name becomes `pass`.
pub fn fragment_shader_file(pass_name: &str) -> String {
    let stem: String = pass_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim();
    let stem = if stem.is_empty() { "pass" } else { stem };
    format!("{stem}.glsl")
}

pub fn fragment_shader_path(pass_name: &str) -> String {
    format!("{SHADERS_DIR}/{}", fragment_shader_file(pass_name))
}

/// `<items>` with the single full-screen quad a pass draws.
pub fn screen_quad_items(index: usize) -> XmlElement {
    XmlElement::new("items").child(
        XmlElement::new("item")
            .attr("name", format!("ScreenQuad{index}"))
            .attr("type", "geometry")
            .text_child("type", "ScreenQuadNDC")
            .text_child("width", 1)
            .text_child("height", 1)
            .text_child("depth", 1)
            .text_child("topology", "TriangleList"),
    )
}

/// Uniforms SHADERed fills in automatically, named the way Shadertoy code expects.
const SYSTEM_VARIABLES: [(&str, &str, &str); 5] = [
    ("float2", "iResolution", "ViewportSize"),
    ("float", "iTime", "Time"),
    ("float", "iTimeDelta", "TimeDelta"),
    ("int", "iFrame", "FrameIndex"),
    ("float4", "iMouse", "MouseButton"),
];

pub fn system_variables() -> XmlElement {
    XmlElement::new("variables").children(SYSTEM_VARIABLES.iter().map(|(ty, name, system)| {
        XmlElement::new("variable")
            .attr("type", ty)
            .attr("name", name)
            .attr("system", system)
    }))
}

/// Static `<settings>` block; nothing in it comes from the imported shader.
pub fn settings() -> XmlElement {
    XmlElement::new("settings")
        .child(
            XmlElement::new("entry")
                .attr("type", "camera")
                .attr("fp", "false")
                .text_child("distance", 10)
                .text_child("pitch", 0)
                .text_child("yaw", 0)
                .text_child("roll", 0),
        )
        .child(
            XmlElement::new("entry")
                .attr("type", "clearcolor")
                .attr("r", 0)
                .attr("g", 0)
                .attr("b", 0)
                .attr("a", 0),
        )
        .child(
            XmlElement::new("entry")
                .attr("type", "usealpha")
                .attr("val", "false"),
        )
}
