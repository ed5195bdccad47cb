//! Headless walkthrough of the engine: builds a small chart on recording
//! surfaces, hovers and drags a bar, then plays an entry animation.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use strata_engine::coords::Viewport;
use strata_engine::input::MouseWheelDelta;
use strata_engine::logging::{LoggingConfig, init_logging};
use strata_engine::paint::Color;
use strata_engine::style::keys;
use strata_engine::surface::RecordingFactory;
use strata_engine::time::FrameClock;
use strata_engine::{
    Animator, Curve, Easing, Engine, EngineConfig, EventKind, EventResult, PointerEvent,
    ShapeRecord, ShapeRegistry, Style, ZLevel,
};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let factory = RecordingFactory::new(Viewport::new(640.0, 360.0)).with_readback(true);
    let registry = Rc::new(ShapeRegistry::with_builtins());
    let mut engine = Engine::new(factory, registry, EngineConfig::default());

    // ── scene ─────────────────────────────────────────────────────────────
    engine.add_shape(
        ShapeRecord::new("rectangle")
            .with_id("plot")
            .hoverable(false)
            .with_style(
                Style::new()
                    .with(keys::X, 40.0)
                    .with(keys::Y, 20.0)
                    .with(keys::WIDTH, 560.0)
                    .with(keys::HEIGHT, 300.0)
                    .with(keys::COLOR, Color::from_srgb_u8(245, 245, 245, 255)),
            ),
    );

    let values = [120.0, 200.0, 80.0, 260.0];
    let mut bars = Vec::new();
    for (i, value) in values.into_iter().enumerate() {
        let id = engine.new_id("bar");
        let x = 80.0 + i as f64 * 130.0;
        engine.add_shape(
            ShapeRecord::new("rectangle")
                .with_id(id.clone())
                .with_z(1)
                .draggable(true)
                .with_style(
                    Style::new()
                        .with(keys::X, x)
                        .with(keys::Y, 320.0 - value)
                        .with(keys::WIDTH, 60.0)
                        .with(keys::HEIGHT, value)
                        .with(keys::RADIUS, vec![4.0, 4.0, 0.0, 0.0])
                        .with(keys::COLOR, Color::from_srgb_u8(84, 112, 198, 255))
                        .with(keys::TEXT, format!("{value}"))
                        .with(keys::TEXT_POSITION, "top"),
                ),
        );
        bars.push(id);
    }

    engine.add_shape(
        ShapeRecord::new("sector")
            .with_id("gauge")
            .with_z(2)
            .clickable(true)
            .with_style(
                Style::new()
                    .with(keys::X, 560.0)
                    .with(keys::Y, 70.0)
                    .with(keys::R, 40.0)
                    .with(keys::R0, 20.0)
                    .with(keys::START_ANGLE, 0.0)
                    .with(keys::END_ANGLE, 270.0)
                    .with(keys::COLOR, Color::from_srgb_u8(145, 204, 117, 255)),
            )
            .on(EventKind::Click, |e| {
                log::info!("gauge clicked at ({:.0}, {:.0})", e.pos.x, e.pos.y);
                EventResult::Consumed
            }),
    );

    let report = engine.render();
    log::info!("first render: {} layer(s), {} record(s)", report.redrawn(), report.painted);
    ensure!(report.redrawn() == 3, "expected three layers, got {}", report.redrawn());

    // ── interaction ───────────────────────────────────────────────────────
    let log_sink: Rc<RefCell<Vec<String>>> = Rc::default();
    for kind in EventKind::ALL {
        let sink = Rc::clone(&log_sink);
        engine.on(kind, move |e| {
            let target = e.target.as_ref().map_or("-", |t| t.as_str());
            sink.borrow_mut().push(format!("{}:{target}", e.kind));
        });
    }

    let first = bars.first().context("no bars were added")?.clone();
    let drop_on = bars.get(1).context("need a second bar")?.clone();
    let grab = engine.scene().bounds(&first).context("first bar has no bounds")?.center();
    let target = engine.scene().bounds(&drop_on).context("second bar has no bounds")?.center();

    engine.handle_pointer(&PointerEvent::mouse_move(grab.x, grab.y));
    engine.handle_pointer(&PointerEvent::Wheel {
        pos: grab,
        delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
    });
    engine.handle_pointer(&PointerEvent::mouse_down(grab.x, grab.y));
    engine.handle_pointer(&PointerEvent::mouse_move(target.x, target.y));
    engine.handle_pointer(&PointerEvent::mouse_up(target.x, target.y));
    engine.handle_pointer(&PointerEvent::mouse_down(530.0, 70.0));
    engine.handle_pointer(&PointerEvent::mouse_up(530.0, 70.0));
    engine.handle_pointer(&PointerEvent::Left);

    for line in log_sink.borrow().iter() {
        log::info!("event {line}");
    }
    let moved = engine.shape(&first).context("dragged bar vanished")?.position();
    log::info!("dragged bar now offset by ({:.0}, {:.0})", moved.x, moved.y);
    ensure!(moved == target - grab, "drag offset mismatch: {moved:?}");

    // ── animation ─────────────────────────────────────────────────────────
    // Simulated 60 Hz host: the frame clock turns instants into timeline ms.
    let mut frame_clock = FrameClock::new();
    let start = frame_clock.now_ms();
    for (i, id) in bars.iter().enumerate() {
        let settled = engine.shape(id).context("bar vanished")?.style().clone();
        let height = settled.number(keys::HEIGHT).unwrap_or(0.0);
        let y = settled.number(keys::Y).unwrap_or(0.0);
        let id_for_log = id.clone();
        let height_path = format!("style.{}", keys::HEIGHT);
        let y_path = format!("style.{}", keys::Y);
        engine.animate(
            Animator::new(id.clone())
                .when(0.0, [(height_path.clone(), 0.0), (y_path.clone(), 320.0)])
                .when(600.0, [(height_path, height), (y_path, y)])
                .delay(i as f64 * 100.0)
                .done(move || log::info!("{id_for_log} settled")),
            Easing::Out(Curve::Cubic),
            start,
        );
    }
    engine.animate(
        Animator::new("gauge")
            .when(0.0, [("style.opacity", 1.0)])
            .when(1200.0, [("style.opacity", 0.4)])
            .looped(true),
        Easing::Linear,
        start,
    );

    let frames = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&frames);
    engine.on_tick(move |_| *counter.borrow_mut() += 1);

    let mut instant = Instant::now();
    loop {
        instant += FRAME;
        let frame = frame_clock.tick_at(instant);
        if frame.now_ms > 1200.0 {
            break;
        }
        engine.tick(frame.now_ms);
    }
    log::info!(
        "{} animated frame(s), {} controller(s) still running",
        frames.borrow(),
        engine.clock().len()
    );

    let top = engine
        .compositor()
        .layer(ZLevel(1))
        .context("bar layer missing")?
        .redraws();
    log::info!("bar layer repainted {top} time(s)");
    log::info!("diagnostics reported {} fault(s)", engine.diagnostics().reported());
    ensure!(engine.diagnostics().reported() == 0, "walkthrough should run clean");
    Ok(())
}
