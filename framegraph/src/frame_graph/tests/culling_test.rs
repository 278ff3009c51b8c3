use super::*;
use crate::driver::DummyAllocator;

#[test]
fn test_unconsumed_pass_is_culled() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(64));
    let (pass, color) = blit(&mut fg, "unused", &[], color);
    fg.compile();

    assert!(fg.is_pass_culled(pass));
    assert!(fg.is_resource_culled(color));
    assert!(fg.pass(pass).executor.is_none());
    assert_eq!(fg.resource_lifetime(color), None);
}

#[test]
fn test_presented_chain_survives() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let gbuffer = fg.create_texture("gbuffer", color_target(64));
    let color = fg.create_texture("color", color_target(64));
    let (geometry, gbuffer) = blit(&mut fg, "geometry", &[], gbuffer);
    let (lighting, color) = blit(&mut fg, "lighting", &[gbuffer], color);
    let present = fg.present(color);
    fg.compile();

    for pass in [geometry, lighting, present] {
        assert!(!fg.is_pass_culled(pass), "{} was culled", fg.pass_name(pass));
    }
    assert!(!fg.is_resource_culled(gbuffer));
    assert!(!fg.is_resource_culled(color));
    assert_eq!(fg.pass(present).kind(), PassKind::Present);
    assert_eq!(fg.pass_name(present), "Present color");
}

#[test]
fn test_feedback_loop_culls_orphan_level() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let level0 = fg.create_texture("level0", color_target(512));
    let level1 = fg.create_texture("level1", color_target(256));
    let level2 = fg.create_texture("level2", color_target(128));

    let (downsample, level1) = blit(&mut fg, "downsample", &[level0], level1);
    let (upsample, level0_v1) = blit(&mut fg, "upsample", &[level1], level0);
    let (orphan, level2) = blit(&mut fg, "orphan", &[level1], level2);
    fg.present(level0_v1);
    fg.compile();

    assert_eq!(level0_v1.version(), 1);
    assert!(!fg.is_pass_culled(downsample));
    assert!(!fg.is_pass_culled(upsample));
    assert!(!fg.is_resource_culled(level0));
    assert!(!fg.is_resource_culled(level0_v1));
    assert!(!fg.is_resource_culled(level1));

    assert!(fg.is_pass_culled(orphan));
    assert!(fg.is_resource_culled(level2));
    assert!(fg.graph().is_acyclic());
}

#[test]
fn test_side_effect_keeps_pass_alive() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let stats = fg.create_buffer("stats", BufferDescriptor::default());
    let (readback, stats) = blit(&mut fg, "readback", &[], stats);
    fg.side_effect(readback);
    fg.compile();

    assert!(!fg.is_pass_culled(readback));
    assert!(fg.pass(readback).has_side_effect());
    assert!(fg.is_resource_culled(stats));
    assert_eq!(
        fg.resource_lifetime(stats),
        Some((readback, readback))
    );
}

#[test]
fn test_side_effect_on_pass_with_consumers() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let a = fg.create_texture("a", color_target(16));
    let b = fg.create_texture("b", color_target(16));
    let (producer, a) = blit(&mut fg, "producer", &[], a);
    let (consumer, _) = blit(&mut fg, "consumer", &[a], b);
    fg.side_effect(producer);
    fg.side_effect(producer);
    fg.compile();

    assert!(!fg.is_pass_culled(producer));
    assert!(fg.is_pass_culled(consumer));
}

#[test]
fn test_first_write_reuses_version() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let (pass, written) = blit(&mut fg, "clear", &[], color);

    assert_eq!(written, color);
    assert_eq!(fg.pass(pass).writes(), &[color]);
    // Writing again from the same pass changes nothing.
    assert_eq!(fg.write(pass, written), written);
}

#[test]
fn test_write_after_read_creates_version() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let scratch = fg.create_texture("scratch", color_target(16));
    blit(&mut fg, "sample", &[color], scratch);
    let (_, color_v1) = blit(&mut fg, "overwrite", &[], color);

    assert_eq!(color_v1.version(), 1);
    assert_eq!(fg.latest_version(color), color_v1);
    assert_eq!(fg.resource_name(color_v1), "color");
    assert_eq!(fg.resource_count(), 2);
}

#[test]
fn test_read_twice_links_once() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let out = fg.create_texture("out", color_target(16));
    let (pass, _) = blit(&mut fg, "double", &[color, color], out);

    assert_eq!(fg.pass(pass).reads(), &[color]);
}

#[test]
fn test_resource_lifetimes() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let a = fg.create_texture("a", color_target(16));
    let b = fg.create_texture("b", color_target(16));
    let c = fg.create_texture("c", color_target(16));
    let (p0, a) = blit(&mut fg, "p0", &[], a);
    let (p1, b) = blit(&mut fg, "p1", &[a], b);
    let (p2, c) = blit(&mut fg, "p2", &[b], c);
    let present = fg.present(c);
    fg.compile();

    assert_eq!(fg.resource_lifetime(a), Some((p0, p1)));
    assert_eq!(fg.resource_lifetime(b), Some((p1, p2)));
    assert_eq!(fg.resource_lifetime(c), Some((p2, present)));
}

#[test]
fn test_culled_reader_does_not_extend_lifetime() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let a = fg.create_texture("a", color_target(16));
    let out = fg.create_texture("out", color_target(16));
    let unused = fg.create_texture("unused", color_target(16));
    let (producer, a) = blit(&mut fg, "producer", &[], a);
    let (consumer, out) = blit(&mut fg, "consumer", &[a], out);
    let (late, _) = blit(&mut fg, "late", &[a], unused);
    fg.present(out);
    fg.compile();

    assert!(fg.is_pass_culled(late));
    assert_eq!(fg.resource_lifetime(a), Some((producer, consumer)));
}

#[test]
fn test_imported_resource_is_never_devirtualized() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let backbuffer = fg.import("backbuffer", color_target(64), RenderTargetHandle(3));
    let (pass, backbuffer) = blit(&mut fg, "tonemap", &[], backbuffer);
    fg.present(backbuffer);
    fg.compile();

    assert!(!fg.is_pass_culled(pass));
    assert!(fg.pass(pass).devirtualize.is_empty());
    assert!(fg.pass(pass).destroy.is_empty());
}

#[test]
fn test_compile_returns_self_for_chaining() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::with_config(
        &mut allocator,
        FrameGraphConfig::new().with_label("chained"),
    );

    assert!(fg.compile().is_compiled());
    assert_eq!(fg.config().label, "chained");
}

#[test]
#[should_panic(expected = "stale handle")]
fn test_stale_handle_panics() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let scratch = fg.create_texture("scratch", color_target(16));
    blit(&mut fg, "sample", &[color], scratch);
    blit(&mut fg, "overwrite", &[], color);

    // `color` now names v0 while the latest is v1.
    fg.present(color);
}

#[test]
#[should_panic(expected = "cannot read resource")]
fn test_read_own_write_panics() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let (pass, color) = blit(&mut fg, "loop", &[], color);
    fg.read(pass, color);
}

#[test]
#[should_panic(expected = "before its writer 'second' runs")]
fn test_reopened_pass_cannot_read_later_output() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::with_config(
        &mut allocator,
        FrameGraphConfig::new().with_cycle_check(false),
    );

    let r = fg.create_texture("r", color_target(16));
    let s = fg.create_texture("s", color_target(16));
    let (first, r) = blit(&mut fg, "first", &[], r);
    let (_, s) = blit(&mut fg, "second", &[r], s);

    // Would close the cycle first -> r -> second -> s -> first.
    fg.pass_builder(first).read(s);
}

#[test]
#[should_panic(expected = "already used by later pass 'reader'")]
fn test_reopened_pass_cannot_overwrite_later_input() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let out = fg.create_texture("out", color_target(16));
    let early = fg.create_pass("early", |_, _| Ok(()));
    blit(&mut fg, "reader", &[color], out);

    fg.pass_builder(early).write(color);
}

#[test]
fn test_reopened_pass_may_read_earlier_output() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    let color = fg.create_texture("color", color_target(16));
    let out = fg.create_texture("out", color_target(16));
    let (_, color) = blit(&mut fg, "producer", &[], color);
    let consumer = fg.create_pass("consumer", |_, _| Ok(()));
    let out = fg.write(consumer, out);
    fg.present(out);

    fg.pass_builder(consumer).read(color);
    fg.compile();

    assert!(fg.graph().is_acyclic());
    assert_eq!(fg.pass(consumer).reads(), &[color]);
}

#[test]
#[should_panic(expected = "contains a dependency cycle")]
fn test_compile_rejects_cycle() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::with_config(
        &mut allocator,
        FrameGraphConfig::new().with_cycle_check(true),
    );

    let a = fg.create_pass("a", |_, _| Ok(()));
    let b = fg.create_pass("b", |_, _| Ok(()));
    let (a, b) = (fg.pass_id(a), fg.pass_id(b));
    fg.graph.link(a, b);
    fg.graph.link(b, a);

    fg.compile();
}

#[test]
#[should_panic(expected = "cannot be modified after compile()")]
fn test_declare_after_compile_panics() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    fg.compile();
    fg.create_texture("late", color_target(16));
}

#[test]
#[should_panic(expected = "already compiled")]
fn test_compile_twice_panics() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::new(&mut allocator);

    fg.compile();
    fg.compile();
}

#[test]
#[should_panic(expected = "invalid pass handle")]
fn test_unknown_pass_handle_panics() {
    let mut allocator = DummyAllocator::new();
    let mut other_allocator = DummyAllocator::new();

    let mut other = FrameGraph::new(&mut other_allocator);
    let foreign = other.create_pass("foreign", |_, _| Ok(()));

    let mut fg = FrameGraph::new(&mut allocator);
    fg.pass_builder(foreign);
}

#[cfg(debug_assertions)]
#[test]
fn test_export_graphviz_uses_label() {
    let mut allocator = DummyAllocator::new();
    let mut fg = FrameGraph::with_config(
        &mut allocator,
        FrameGraphConfig::new().with_label("main view"),
    );

    let color = fg.create_texture("color", color_target(16));
    let (_, color) = blit(&mut fg, "draw", &[], color);
    fg.present(color);
    fg.compile();

    let mut out = Vec::new();
    fg.export_graphviz(&mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();

    assert!(dot.starts_with("digraph \"main view\" {"));
    assert!(dot.contains("color v0"));
    assert!(dot.contains("Present color"));
}
