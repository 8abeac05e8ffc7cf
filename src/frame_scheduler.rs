//! Frame pacing for the torch main loop.
//!
//! The scheduler does not sleep itself: every `tick` renders and sends
//! one frame and tells the caller how long to wait before the next one.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;
use rand::RngCore;

use crate::command::CommandReceiver;
use crate::composer::FrameComposer;
use crate::pixel_buffer::PixelBuffer;
use crate::protocol::{BitstreamSink, ProtocolDriver};

/// Frames of lag tolerated before the schedule restarts from now
pub const MAX_DRIFT_FRAMES: u64 = 2;

/// Outcome of one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// When the next frame is due
    pub next_deadline: Instant,
    /// How long to wait for it, zero when running late
    pub sleep_duration: Duration,
    /// Whether the frame reached the LEDs
    pub transmitted: bool,
}

/// Ties the composer, the frame buffer and the driver into a paced loop
///
/// ```ignore
/// let channel = CommandChannel::<4>::new();
/// let mut scheduler = FrameScheduler::new(composer, frame, driver, channel.receiver());
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<
    'a,
    R: RngCore,
    S: BitstreamSink,
    const COLS: usize,
    const ROWS: usize,
    const MAX_PIXELS: usize,
    const QUEUE_SIZE: usize,
> {
    composer: FrameComposer<R, COLS, ROWS>,
    frame: PixelBuffer<MAX_PIXELS>,
    driver: ProtocolDriver<S>,
    commands: CommandReceiver<'a, QUEUE_SIZE>,
    next_frame: Option<Instant>,
    line_ready: bool,
    failed_frames: u32,
}

impl<
    'a,
    R: RngCore,
    S: BitstreamSink,
    const COLS: usize,
    const ROWS: usize,
    const MAX_PIXELS: usize,
    const QUEUE_SIZE: usize,
> FrameScheduler<'a, R, S, COLS, ROWS, MAX_PIXELS, QUEUE_SIZE>
{
    pub const fn new(
        composer: FrameComposer<R, COLS, ROWS>,
        frame: PixelBuffer<MAX_PIXELS>,
        driver: ProtocolDriver<S>,
        commands: CommandReceiver<'a, QUEUE_SIZE>,
    ) -> Self {
        Self {
            composer,
            frame,
            driver,
            commands,
            next_frame: None,
            line_ready: false,
            failed_frames: 0,
        }
    }

    /// Pause between frames, taken from the configuration on every tick
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.composer.config().cycle_wait))
    }

    /// Produce one frame and return when the next one is due
    ///
    /// Queued commands are applied first, so a change always takes effect
    /// on a frame boundary. The line is driven low before the first frame
    /// goes out. A failing transmission is counted and the schedule
    /// carries on.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        self.composer.process_pending(&self.commands);

        let frame_duration = self.frame_duration();
        let max_drift = frame_duration.as_millis() * MAX_DRIFT_FRAMES;
        let deadline = match self.next_frame {
            Some(deadline) if now.as_millis() <= deadline.as_millis() + max_drift => deadline,
            // First frame, or fallen too far behind to catch up
            _ => now,
        };

        self.composer.render(&mut self.frame);
        let sent = self
            .prepare_line()
            .and_then(|()| self.driver.transmit(&self.frame));
        let transmitted = match sent {
            Ok(()) => true,
            Err(_) => {
                self.failed_frames = self.failed_frames.saturating_add(1);
                #[cfg(feature = "esp32-log")]
                println!(
                    "[FrameScheduler.tick] transmission failed ({} total)",
                    self.failed_frames
                );
                false
            }
        };

        let next_deadline = deadline + frame_duration;
        self.next_frame = Some(next_deadline);
        let sleep_duration =
            Duration::from_millis(next_deadline.as_millis().saturating_sub(now.as_millis()));

        FrameResult {
            next_deadline,
            sleep_duration,
            transmitted,
        }
    }

    /// Idle the line once, retried on the next frame if the sink fails
    fn prepare_line(&mut self) -> Result<(), S::Error> {
        if !self.line_ready {
            self.driver.begin()?;
            self.line_ready = true;
        }
        Ok(())
    }

    /// Frames whose transmission failed so far
    pub const fn failed_frames(&self) -> u32 {
        self.failed_frames
    }

    pub const fn composer(&self) -> &FrameComposer<R, COLS, ROWS> {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut FrameComposer<R, COLS, ROWS> {
        &mut self.composer
    }

    /// The frame sent last
    pub const fn frame(&self) -> &PixelBuffer<MAX_PIXELS> {
        &self.frame
    }

    pub const fn driver(&self) -> &ProtocolDriver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut ProtocolDriver<S> {
        &mut self.driver
    }
}
