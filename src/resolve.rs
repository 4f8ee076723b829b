//! Resource resolution: which passes become persistent render targets, which
//! inputs become texture objects, and which (pass, channel) pairs read each one.
//!
//! All collections keep first-discovery order. The emitted project derives its
//! object order from them, so output stays reproducible.

use std::collections::HashMap;

use crate::graph::{InputKind, PassKind, RenderPass, SamplerConfig};

/// One consumer of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pass_name: String,
    pub channel: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Name of the buffer pass that renders into it.
    pub name: String,
    pub resource_id: i64,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Path(String),
    Keyboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureResource {
    pub key: TextureKey,
    /// Sampler of the last input seen for this key.
    pub sampler: SamplerConfig,
    pub bindings: Vec<Binding>,
}

/// A buffer input whose resource id no buffer pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingInput {
    pub pass_name: String,
    pub channel: i64,
    pub resource_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    pub render_targets: Vec<RenderTarget>,
    pub textures: Vec<TextureResource>,
    pub dangling: Vec<DanglingInput>,
    pub warnings: Vec<String>,
}

impl BindingTable {
    pub fn render_target(&self, resource_id: i64) -> Option<&RenderTarget> {
        self.render_targets
            .iter()
            .find(|rt| rt.resource_id == resource_id)
    }

    pub fn texture(&self, key: &TextureKey) -> Option<&TextureResource> {
        self.textures.iter().find(|t| &t.key == key)
    }
}

/// Walk every pass once, in source order, and build the binding table.
///
/// Buffer inputs are matched to render targets after the walk, so a pass may
/// read a buffer declared later in the array (Shadertoy allows this).
pub fn resolve(passes: &[RenderPass]) -> BindingTable {
    let mut table = BindingTable::default();

    let mut rt_owner: HashMap<i64, usize> = HashMap::new();
    let mut tex_index: HashMap<TextureKey, usize> = HashMap::new();
    let mut buffer_reads: Vec<(i64, Binding)> = Vec::new();

    for pass in passes {
        if pass.kind == PassKind::Buffer {
            match pass.outputs.first() {
                Some(output) => {
                    let idx = table.render_targets.len();
                    if rt_owner.contains_key(&output.resource_id) {
                        warn(
                            &mut table,
                            format!(
                                "buffer pass '{}' writes resource {} which an earlier pass already owns; it gets no bindings",
                                pass.name, output.resource_id
                            ),
                        );
                    } else {
                        rt_owner.insert(output.resource_id, idx);
                    }
                    table.render_targets.push(RenderTarget {
                        name: pass.name.clone(),
                        resource_id: output.resource_id,
                        bindings: Vec::new(),
                    });
                }
                None => warn(
                    &mut table,
                    format!(
                        "buffer pass '{}' has no outputs and is not a render target",
                        pass.name
                    ),
                ),
            }
        }

        for input in &pass.inputs {
            let binding = Binding {
                pass_name: pass.name.clone(),
                channel: input.channel,
            };
            let key = match input.kind {
                InputKind::Texture => TextureKey::Path(input.source.clone()),
                InputKind::Keyboard => TextureKey::Keyboard,
                InputKind::Buffer => {
                    buffer_reads.push((input.resource_id, binding));
                    continue;
                }
                _ => continue,
            };

            let idx = *tex_index.entry(key.clone()).or_insert_with(|| {
                table.textures.push(TextureResource {
                    key,
                    sampler: input.sampler,
                    bindings: Vec::new(),
                });
                table.textures.len() - 1
            });
            let tex = &mut table.textures[idx];
            tex.sampler = input.sampler;
            tex.bindings.push(binding);
        }
    }

    for (resource_id, binding) in buffer_reads {
        match rt_owner.get(&resource_id) {
            Some(&idx) => table.render_targets[idx].bindings.push(binding),
            None => {
                warn(
                    &mut table,
                    format!(
                        "pass '{}' channel {} reads buffer resource {} that no buffer pass produces; binding dropped",
                        binding.pass_name, binding.channel, resource_id
                    ),
                );
                table.dangling.push(DanglingInput {
                    pass_name: binding.pass_name,
                    channel: binding.channel,
                    resource_id,
                });
            }
        }
    }

    table
}

fn warn(table: &mut BindingTable, message: String) {
    log::warn!("{message}");
    table.warnings.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FilterMode, Input, Output, WrapMode};

    fn pass(name: &str, kind: PassKind, outputs: &[i64], inputs: Vec<Input>) -> RenderPass {
        RenderPass {
            name: name.to_string(),
            kind,
            code: String::new(),
            outputs: outputs
                .iter()
                .map(|&id| Output {
                    resource_id: id,
                    channel: 0,
                })
                .collect(),
            inputs,
        }
    }

    fn input(kind: InputKind, id: i64, channel: i64, src: &str) -> Input {
        Input {
            resource_id: id,
            channel,
            kind,
            source: src.to_string(),
            sampler: SamplerConfig::default(),
        }
    }

    #[test]
    fn buffer_inputs_bind_to_their_producer_in_discovery_order() {
        let passes = vec![
            pass(
                "Buffer A",
                PassKind::Buffer,
                &[257],
                vec![input(InputKind::Buffer, 257, 0, "")],
            ),
            pass(
                "Image",
                PassKind::Image,
                &[37],
                vec![
                    input(InputKind::Buffer, 257, 2, ""),
                    input(InputKind::Buffer, 257, 3, ""),
                ],
            ),
        ];
        let table = resolve(&passes);
        assert_eq!(table.render_targets.len(), 1);
        let rt = table.render_target(257).unwrap();
        assert_eq!(rt.name, "Buffer A");
        let got: Vec<(&str, i64)> = rt
            .bindings
            .iter()
            .map(|b| (b.pass_name.as_str(), b.channel))
            .collect();
        assert_eq!(got, vec![("Buffer A", 0), ("Image", 2), ("Image", 3)]);
        assert!(table.dangling.is_empty());
    }

    #[test]
    fn buffer_declared_after_its_reader_still_binds() {
        let passes = vec![
            pass(
                "Image",
                PassKind::Image,
                &[37],
                vec![input(InputKind::Buffer, 258, 0, "")],
            ),
            pass("Buffer B", PassKind::Buffer, &[258], vec![]),
        ];
        let table = resolve(&passes);
        assert_eq!(table.render_target(258).unwrap().bindings.len(), 1);
    }

    #[test]
    fn textures_dedup_by_path_and_last_sampler_wins() {
        let mut first = input(InputKind::Texture, 5, 0, "/media/a/noise.png");
        first.sampler.flip_vertical = true;
        first.sampler.filter = FilterMode::Mipmap;
        let mut second = input(InputKind::Texture, 5, 1, "/media/a/noise.png");
        second.sampler.flip_vertical = false;
        second.sampler.wrap = WrapMode::Repeat;

        let passes = vec![
            pass("Buffer A", PassKind::Buffer, &[257], vec![first]),
            pass("Image", PassKind::Image, &[37], vec![second]),
        ];
        let table = resolve(&passes);
        assert_eq!(table.textures.len(), 1);
        let tex = &table.textures[0];
        assert!(!tex.sampler.flip_vertical);
        assert_eq!(tex.sampler.wrap, WrapMode::Repeat);
        assert_eq!(tex.sampler.filter, FilterMode::Unspecified);
        assert_eq!(tex.bindings.len(), 2);
    }

    #[test]
    fn keyboard_inputs_share_one_reserved_resource() {
        let passes = vec![
            pass(
                "Buffer A",
                PassKind::Buffer,
                &[257],
                vec![input(InputKind::Keyboard, 33, 1, "/presets/tex00.jpg")],
            ),
            pass(
                "Image",
                PassKind::Image,
                &[37],
                vec![
                    input(InputKind::Texture, 6, 0, "/media/a/wood.jpg"),
                    input(InputKind::Keyboard, 33, 3, ""),
                ],
            ),
        ];
        let table = resolve(&passes);
        let keys: Vec<&TextureKey> = table.textures.iter().map(|t| &t.key).collect();
        assert_eq!(
            keys,
            vec![
                &TextureKey::Keyboard,
                &TextureKey::Path("/media/a/wood.jpg".to_string())
            ]
        );
        assert_eq!(table.texture(&TextureKey::Keyboard).unwrap().bindings.len(), 2);
    }

    #[test]
    fn unmatched_buffer_input_is_recorded_not_bound() {
        let passes = vec![pass(
            "Image",
            PassKind::Image,
            &[37],
            vec![input(InputKind::Buffer, 999, 0, "")],
        )];
        let table = resolve(&passes);
        assert!(table.render_targets.is_empty());
        assert_eq!(
            table.dangling,
            vec![DanglingInput {
                pass_name: "Image".to_string(),
                channel: 0,
                resource_id: 999
            }]
        );
        assert_eq!(table.warnings.len(), 1);
    }

    #[test]
    fn duplicate_producer_keeps_bindings_on_first() {
        let passes = vec![
            pass("Buffer A", PassKind::Buffer, &[257], vec![]),
            pass("Buffer B", PassKind::Buffer, &[257], vec![]),
            pass(
                "Image",
                PassKind::Image,
                &[37],
                vec![input(InputKind::Buffer, 257, 0, "")],
            ),
        ];
        let table = resolve(&passes);
        assert_eq!(table.render_targets.len(), 2);
        assert_eq!(table.render_targets[0].bindings.len(), 1);
        assert!(table.render_targets[1].bindings.is_empty());
        assert_eq!(table.warnings.len(), 1);
    }

    #[test]
    fn buffer_pass_without_outputs_is_skipped() {
        let passes = vec![pass("Buffer A", PassKind::Buffer, &[], vec![])];
        let table = resolve(&passes);
        assert!(table.render_targets.is_empty());
        assert_eq!(table.warnings.len(), 1);
    }

    #[test]
    fn other_input_kinds_are_ignored() {
        let passes = vec![pass(
            "Image",
            PassKind::Image,
            &[37],
            vec![
                input(InputKind::CubeMap, 22, 0, "/media/a/cube.png"),
                input(InputKind::Music, 23, 1, "/media/a/song.mp3"),
            ],
        )];
        let table = resolve(&passes);
        assert!(table.textures.is_empty());
        assert!(table.warnings.is_empty());
    }
}
