//! Builds a mip chain feedback loop, runs it on the dummy driver and prints
//! the culled graph in Graphviz format.
//!
//! ```bash
//! RUST_LOG=trace cargo run --example feedback_loop | dot -Tsvg > graph.svg
//! ```

use redlilium_framegraph::{
    ClearValue, DummyAllocator, DummyDriver, Extent3d, FrameGraph, FrameGraphConfig,
    FrameGraphError, RenderPassParams, RenderTargetHandle, TextureDescriptor, TextureFormat,
    TextureUsage,
};

fn mip(base: u32, level: u32) -> TextureDescriptor {
    let size = Extent3d::new_2d(base, base).mip_level(level);
    TextureDescriptor::new_2d(
        size.width,
        size.height,
        TextureFormat::Rgba16Float,
        TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
    )
}

fn main() -> Result<(), FrameGraphError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    redlilium_framegraph::init();

    let mut allocator = DummyAllocator::new();
    let mut driver = DummyDriver::new();
    let mut fg = FrameGraph::with_config(
        &mut allocator,
        FrameGraphConfig::new().with_label("feedback loop"),
    );

    let level0 = fg.create_texture("level0", mip(512, 0));
    let level1 = fg.create_texture("level1", mip(512, 1));
    let level2 = fg.create_texture("level2", mip(512, 2));

    let (_, level1) = fg.add_pass(
        "downsample",
        |builder| {
            builder.read(level0);
            builder.write(level1)
        },
        |_, resources, _| {
            log::info!("{} into 256x256", resources.pass_name());
            Ok(())
        },
    );
    let (_, level0) = fg.add_pass(
        "upsample",
        |builder| {
            builder.read(level1);
            builder.write(level0)
        },
        |_, resources, _| {
            log::info!("{} into 512x512", resources.pass_name());
            Ok(())
        },
    );
    // Nobody reads level 2, so this pass never runs.
    fg.add_pass(
        "orphan",
        |builder| {
            builder.read(level1);
            builder.write(level2)
        },
        |_, _, _| Ok(()),
    );

    let backbuffer = fg.import("backbuffer", mip(512, 0), RenderTargetHandle(0));
    let (_, backbuffer) = fg.add_pass(
        "blit",
        |builder| {
            builder.read(level0);
            builder.write(backbuffer)
        },
        |backbuffer, resources, driver| {
            let params = RenderPassParams::new(512, 512)
                .with_clear(ClearValue::color(0.0, 0.0, 0.0, 1.0));
            driver.begin_render_pass(resources.render_target(*backbuffer), &params)?;
            driver.end_render_pass();
            Ok(())
        },
    );
    fg.present(backbuffer);

    fg.compile();
    fg.export_graphviz(&mut std::io::stdout().lock())
        .map_err(|err| redlilium_framegraph::DriverError::Other(err.to_string()))?;
    fg.execute(&mut driver)?;
    drop(fg);

    log::info!(
        "{} commands recorded, {} resources created",
        driver.commands().len(),
        allocator.created().len()
    );
    Ok(())
}
