use crate::{
    config::{ConfigError, Configuration, Direction},
    render::{RenderError, Renderer},
    schedule::PeriodicTask,
    spiral::FrameGenerator,
};
use std::time::Instant;
use strum::Display;

/// The state of the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum LoopPhase {
    /// The loop hasn't been started, or was stopped.
    Idle,

    /// The loop is scheduled and time moves forward on every tick.
    Ticking,

    /// The loop is scheduled but time is frozen. Frames are still drawn so configuration changes
    /// show up right away.
    Paused,
}

/// The outcome of polling the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollableState {
    /// Nothing was due.
    Unmodified,

    /// A frame was drawn.
    Modified,

    /// The loop isn't scheduled so it will never draw anything until it's started.
    Done,
}

/// The animation loop: advances time, wraps it around at the end of every cycle, and draws a
/// frame on every tick.
#[derive(Debug)]
pub struct AnimationLoop {
    tick_counter: u64,
    running: bool,
    task: PeriodicTask,
}

impl AnimationLoop {
    pub fn new(running: bool) -> Self {
        Self { tick_counter: 0, running, task: PeriodicTask::new() }
    }

    pub fn phase(&self) -> LoopPhase {
        match (self.task.is_scheduled(), self.running) {
            (false, _) => LoopPhase::Idle,
            (true, true) => LoopPhase::Ticking,
            (true, false) => LoopPhase::Paused,
        }
    }

    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set whether time moves forward on every tick.
    pub fn set_running(&mut self, running: bool) {
        if running != self.running {
            tracing::info!(running, "toggling animation");
        }
        self.running = running;
    }

    /// Start ticking from the beginning of the cycle.
    ///
    /// Starting an already scheduled loop replaces its schedule, so there's never more than one.
    pub fn start(&mut self, config: &Configuration, now: Instant) {
        self.tick_counter = 0;
        let interval = config.tick_interval();
        if self.task.schedule(interval, now) {
            tracing::warn!("animation loop was already scheduled, restarting it");
        }
        tracing::info!(?interval, "animation loop started");
    }

    /// Stop ticking. Nothing will be drawn until the loop is started again.
    pub fn stop(&mut self) {
        if self.task.cancel() {
            tracing::info!(tick = self.tick_counter, "animation loop stopped");
        }
    }

    /// Change the frame rate, rescheduling the loop at the new rate without resetting time.
    pub fn reconfigure(
        &mut self,
        config: &mut Configuration,
        frames_per_second: f64,
        now: Instant,
    ) -> Result<(), ConfigError> {
        config.set_frames_per_second(frames_per_second)?;
        tracing::info!(frames_per_second, "frame rate changed");
        self.reschedule(config, now);
        Ok(())
    }

    /// Play the animation in the given direction.
    ///
    /// Reversing doesn't mirror the forward animation: disks whose distance to the center would
    /// become negative collapse into the center instead.
    pub fn set_direction(&mut self, config: &mut Configuration, direction: Direction) {
        if config.direction() != direction {
            tracing::info!(%direction, "animation direction changed");
        }
        config.set_direction(direction);
    }

    /// The time the next tick will draw a frame for, once wrapping is accounted for.
    pub fn frame_time(&self, config: &Configuration) -> f64 {
        let tick = if self.tick_counter >= config.ticks_per_cycle() { 0 } else { self.tick_counter };
        tick as f64 / config.frames_per_second()
    }

    /// Run a single tick: draw the frame for the current time and, if running, move time forward.
    ///
    /// Returns the time the frame was drawn for.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        config: &Configuration,
        generator: &mut FrameGenerator,
        renderer: &mut R,
    ) -> Result<f64, RenderError> {
        if self.tick_counter >= config.ticks_per_cycle() {
            tracing::trace!(tick = self.tick_counter, "cycle complete, wrapping around");
            self.tick_counter = 0;
        }
        let frame_time = self.tick_counter as f64 / config.frames_per_second();
        let disks = generator.generate(frame_time, config);
        renderer.render(&disks)?;
        if self.running {
            self.tick_counter += 1;
        }
        Ok(frame_time)
    }

    /// Tick if one is due at `now`.
    pub fn poll<R: Renderer + ?Sized>(
        &mut self,
        now: Instant,
        config: &Configuration,
        generator: &mut FrameGenerator,
        renderer: &mut R,
    ) -> Result<PollableState, RenderError> {
        if !self.task.is_scheduled() {
            return Ok(PollableState::Done);
        }
        if !self.task.poll(now) {
            return Ok(PollableState::Unmodified);
        }
        self.tick(config, generator, renderer)?;
        Ok(PollableState::Modified)
    }

    /// The point in time the next tick is due, if the loop is scheduled.
    pub fn next_due(&self) -> Option<Instant> {
        self.task.next_due()
    }

    fn reschedule(&mut self, config: &Configuration, now: Instant) {
        if self.task.is_scheduled() {
            self.task.schedule(config.tick_interval(), now);
        }
    }
}
