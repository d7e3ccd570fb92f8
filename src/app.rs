use crate::{
    config::{ConfigError, Configuration},
    controls::{ControlAction, FRAME_RATE_STEP, VIEWPORT_STEP, step_frame_rate, step_viewport_width},
    palette::{PaletteCycler, next_preset},
    playback::{AnimationLoop, LoopPhase, PollableState},
    render::{RenderError, Renderer},
    schedule::PeriodicTask,
    spiral::{DiskStyle, FrameGenerator},
};
use std::time::Instant;

/// Whether the application should keep going after handling an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Quit,
}

/// Owns everything an animation needs: its configuration, the animation loop, the palette cycling
/// task and the renderer frames are drawn with.
///
/// Both periodic tasks run on the caller's thread. Palette updates are applied before the
/// animation ticks within the same poll so a frame never sees a half updated style.
pub struct SpiralApp<R: Renderer> {
    config: Configuration,
    generator: FrameGenerator,
    animation: AnimationLoop,
    palette: PaletteCycler,
    palette_task: PeriodicTask,
    style_before_cycling: Option<DiskStyle>,
    renderer: R,
}

impl<R: Renderer> SpiralApp<R> {
    pub fn new(config: Configuration, running: bool, renderer: R) -> Self {
        Self {
            config,
            generator: FrameGenerator::new(),
            animation: AnimationLoop::new(running),
            palette: PaletteCycler::new(),
            palette_task: PeriodicTask::new(),
            style_before_cycling: None,
            renderer,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn phase(&self) -> LoopPhase {
        self.animation.phase()
    }

    /// Start the animation and, if enabled, palette cycling.
    pub fn start(&mut self, now: Instant) {
        self.animation.start(&self.config, now);
        if self.config.palette_cycling() {
            self.start_palette(now);
        }
    }

    /// Stop every periodic task.
    pub fn stop(&mut self) {
        self.animation.stop();
        self.palette_task.cancel();
    }

    /// Run whatever is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Result<PollableState, RenderError> {
        if self.palette_task.poll(now) {
            self.config.set_style(self.palette.advance());
        }
        self.animation.poll(now, &self.config, &mut self.generator, &mut self.renderer)
    }

    /// Draw the current frame right away, without moving time forward.
    pub fn redraw(&mut self) -> Result<(), RenderError> {
        let disks = self.generator.generate(self.animation.frame_time(&self.config), &self.config);
        self.renderer.render(&disks)
    }

    /// The next point in time something is due, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.animation.next_due(), self.palette_task.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Apply an action coming from the settings controls.
    pub fn apply(&mut self, action: ControlAction, now: Instant) -> Result<AppFlow, ConfigError> {
        tracing::debug!(%action, "applying control action");
        match action {
            ControlAction::ToggleRunning => self.animation.set_running(!self.animation.is_running()),
            ControlAction::ToggleOpacity => self.config.set_opacity_mode(!self.config.opacity_mode()),
            ControlAction::InvertColors => self.config.invert_style(),
            ControlAction::Reverse => {
                let direction = self.config.direction().flipped();
                self.animation.set_direction(&mut self.config, direction);
            }
            ControlAction::TogglePalette => self.set_palette_cycling(!self.config.palette_cycling(), now),
            ControlAction::NextColors => self.next_preset_style(),
            ControlAction::FasterFrameRate => self.step_frame_rate(FRAME_RATE_STEP, now)?,
            ControlAction::SlowerFrameRate => self.step_frame_rate(-FRAME_RATE_STEP, now)?,
            ControlAction::WiderViewport => self.step_viewport(VIEWPORT_STEP)?,
            ControlAction::NarrowerViewport => self.step_viewport(-VIEWPORT_STEP)?,
            ControlAction::Quit => return Ok(AppFlow::Quit),
        };
        Ok(AppFlow::Continue)
    }

    /// Turn palette cycling on or off.
    ///
    /// The style in use when cycling started is restored once it stops.
    pub fn set_palette_cycling(&mut self, enabled: bool, now: Instant) {
        if enabled == self.config.palette_cycling() {
            return;
        }
        tracing::info!(enabled, "palette cycling toggled");
        self.config.set_palette_cycling(enabled);
        if enabled {
            self.start_palette(now);
        } else {
            self.palette_task.cancel();
            if let Some(style) = self.style_before_cycling.take() {
                self.config.set_style(style);
            }
        }
    }

    /// Move on to the next preset style. While palette cycling is on, the preset is the style
    /// restored once cycling stops.
    fn next_preset_style(&mut self) {
        let current = self.style_before_cycling.unwrap_or_else(|| self.config.style());
        let style = next_preset(current);
        match &mut self.style_before_cycling {
            Some(saved) => *saved = style,
            None => self.config.set_style(style),
        };
    }

    fn start_palette(&mut self, now: Instant) {
        self.style_before_cycling.get_or_insert(self.config.style());
        if self.animation.phase() != LoopPhase::Idle {
            self.palette_task.schedule(self.config.palette_interval(), now);
        }
    }

    fn step_frame_rate(&mut self, delta: f64, now: Instant) -> Result<(), ConfigError> {
        let frames_per_second = step_frame_rate(self.config.frames_per_second(), delta);
        self.animation.reconfigure(&mut self.config, frames_per_second, now)
    }

    fn step_viewport(&mut self, delta: f64) -> Result<(), ConfigError> {
        let width = step_viewport_width(self.config.viewport_width(), delta);
        self.config.set_viewport_width(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        config::{Direction, SpiralConfig},
        palette::PRESET_STYLES,
        render::retained::RetainedRenderer,
    };
    use std::time::Duration;

    fn app(config: SpiralConfig) -> SpiralApp<RetainedRenderer> {
        let running = config.running;
        let config = config.validate().expect("invalid config");
        SpiralApp::new(config, running, RetainedRenderer::new())
    }

    #[test]
    fn idle_until_started() {
        let mut app = app(SpiralConfig::default());
        let now = Instant::now();
        assert_eq!(app.poll(now).expect("poll failed"), PollableState::Done);
        assert!(app.next_deadline().is_none());

        app.start(now);
        assert_eq!(app.poll(now).expect("poll failed"), PollableState::Modified);
        assert_eq!(app.renderer().frames(), 1);
        assert_eq!(app.next_deadline(), Some(now + Duration::from_millis(50)));

        app.stop();
        assert_eq!(app.phase(), LoopPhase::Idle);
        assert!(app.next_deadline().is_none());
    }

    #[test]
    fn starts_paused() {
        let mut app = app(SpiralConfig { running: false, ..Default::default() });
        let now = Instant::now();
        app.start(now);
        assert_eq!(app.phase(), LoopPhase::Paused);
        app.poll(now).expect("poll failed");
        assert_eq!(app.animation().tick_counter(), 0);

        app.apply(ControlAction::ToggleRunning, now).expect("apply failed");
        assert_eq!(app.phase(), LoopPhase::Ticking);
    }

    #[test]
    fn palette_cycling_updates_style_before_tick() {
        let mut app = app(SpiralConfig { palette_cycling: true, ..Default::default() });
        let now = Instant::now();
        app.start(now);
        app.poll(now).expect("poll failed");

        let expected = PaletteCycler::new().advance();
        assert_eq!(app.config().style(), expected);
        let node = &app.renderer().nodes()[0];
        assert_eq!(node.fill, expected.fill);
        assert_eq!(node.stroke, expected.fill.complement());
    }

    #[test]
    fn palette_cycling_restores_style() {
        let mut app = app(SpiralConfig::default());
        let now = Instant::now();
        app.start(now);
        app.apply(ControlAction::TogglePalette, now).expect("apply failed");
        assert!(app.config().palette_cycling());
        app.poll(now).expect("poll failed");
        assert_ne!(app.config().style(), DiskStyle::default());

        app.apply(ControlAction::TogglePalette, now).expect("apply failed");
        assert!(!app.config().palette_cycling());
        assert_eq!(app.config().style(), DiskStyle::default());
        let later = now + Duration::from_secs(1);
        app.poll(later).expect("poll failed");
        assert_eq!(app.config().style(), DiskStyle::default());
    }

    #[test]
    fn preset_colors_step_at_runtime() {
        let mut app = app(SpiralConfig::default());
        let now = Instant::now();
        app.start(now);
        app.apply(ControlAction::NextColors, now).expect("apply failed");
        assert_eq!(app.config().style(), PRESET_STYLES[1]);

        app.poll(now).expect("poll failed");
        let node = &app.renderer().nodes()[0];
        assert_eq!(node.fill, PRESET_STYLES[1].fill);
        assert_eq!(node.stroke, PRESET_STYLES[1].stroke);
    }

    #[test]
    fn preset_colors_while_cycling_apply_once_stopped() {
        let mut app = app(SpiralConfig { palette_cycling: true, ..Default::default() });
        let now = Instant::now();
        app.start(now);
        app.poll(now).expect("poll failed");
        app.apply(ControlAction::NextColors, now).expect("apply failed");
        assert_ne!(app.config().style(), PRESET_STYLES[1]);

        app.apply(ControlAction::TogglePalette, now).expect("apply failed");
        assert_eq!(app.config().style(), PRESET_STYLES[1]);
    }

    #[test]
    fn settings_actions() {
        let mut app = app(SpiralConfig::default());
        let now = Instant::now();
        app.start(now);

        app.apply(ControlAction::ToggleOpacity, now).expect("apply failed");
        assert!(app.config().opacity_mode());

        app.apply(ControlAction::InvertColors, now).expect("apply failed");
        assert_eq!(app.config().style().fill, Color::BLACK);

        app.apply(ControlAction::Reverse, now).expect("apply failed");
        assert_eq!(app.config().direction(), Direction::Reverse);

        app.apply(ControlAction::FasterFrameRate, now).expect("apply failed");
        assert_eq!(app.config().frames_per_second(), -25.0);

        app.apply(ControlAction::NarrowerViewport, now).expect("apply failed");
        assert_eq!(app.config().viewport_width(), 380.0);

        assert_eq!(app.apply(ControlAction::Quit, now).expect("apply failed"), AppFlow::Quit);
    }

    #[test]
    fn frame_rate_never_reaches_zero() {
        let mut app = app(SpiralConfig { frames_per_second: 2.0, ..Default::default() });
        let now = Instant::now();
        for _ in 0..5 {
            app.apply(ControlAction::SlowerFrameRate, now).expect("apply failed");
        }
        assert_eq!(app.config().frames_per_second(), 1.0);
    }

    #[test]
    fn redraw_keeps_time() {
        let mut app = app(SpiralConfig::default());
        let now = Instant::now();
        app.start(now);
        app.poll(now).expect("poll failed");
        app.redraw().expect("redraw failed");
        assert_eq!(app.animation().tick_counter(), 1);
        assert_eq!(app.renderer().frames(), 2);
    }
}
