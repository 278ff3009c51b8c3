use super::*;
use crate::types::{TextureFormat, TextureUsage};

mod culling_test;

/// Square color target used by most tests.
fn color_target(size: u32) -> TextureDescriptor {
    TextureDescriptor::new_2d(
        size,
        size,
        TextureFormat::Rgba8Unorm,
        TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
    )
}

/// Add a pass that does nothing, reads `inputs` and writes `output`.
fn blit(
    fg: &mut FrameGraph<'_>,
    name: &str,
    inputs: &[ResourceHandle],
    output: ResourceHandle,
) -> (PassHandle, ResourceHandle) {
    let pass = fg.create_pass(name, |_, _| Ok(()));
    for &input in inputs {
        fg.read(pass, input);
    }
    let output = fg.write(pass, output);
    (pass, output)
}
