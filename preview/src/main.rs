//! Desktop preview app for the torch composer
//!
//! Runs the real scheduler against an in-memory bitstream sink and draws
//! the logical grid as it would look on the torch, bottom row at the
//! bottom. All changes go through the command channel, the same way a
//! network handler would send them on the device.

use std::convert::Infallible;
use std::time::{Instant as StdInstant, SystemTime, UNIX_EPOCH};

use eframe::egui::{self};
use myrtio_torch_composer::{
    BitstreamSink, CommandChannel, CommandSender, DisplayConfig, DisplayMode, FrameComposer,
    FrameScheduler, Instant, LedChip, PixelBuffer, ProtocolDriver, TORCH_COLUMNS, TORCH_PIXELS,
    TORCH_ROWS, torch_topology,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 18.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Command channel size
const COMMAND_QUEUE_SIZE: usize = 16;

/// Static command channel between the UI and the scheduler
static COMMANDS: CommandChannel<COMMAND_QUEUE_SIZE> = CommandChannel::new();

const MODES: [DisplayMode; 5] = [
    DisplayMode::Off,
    DisplayMode::Torch,
    DisplayMode::ColorCycle,
    DisplayMode::Lamp,
    DisplayMode::TestPattern,
];

/// Sink that only measures the stream
#[derive(Default)]
struct MeasuringSink {
    frame_bytes: usize,
    last_frame_bytes: usize,
}

impl BitstreamSink for MeasuringSink {
    type Error = Infallible;

    fn idle_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.frame_bytes += bytes.len();
        Ok(())
    }

    fn latch(&mut self) -> Result<(), Self::Error> {
        self.last_frame_bytes = std::mem::take(&mut self.frame_bytes);
        Ok(())
    }
}

type Scheduler = FrameScheduler<
    'static,
    SmallRng,
    MeasuringSink,
    TORCH_COLUMNS,
    TORCH_ROWS,
    TORCH_PIXELS,
    COMMAND_QUEUE_SIZE,
>;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 640.0])
            .with_title("Torch Composer Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-torch-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    scheduler: Scheduler,
    commands: CommandSender<'static, COMMAND_QUEUE_SIZE>,

    /// Synthetic time in milliseconds
    t_ms: u64,
    /// When the scheduler wants the next frame
    next_frame_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,

    // UI state, mirrored into commands on change
    mode: DisplayMode,
    brightness: u8,
    upside_down: bool,
    mirror_text: bool,
    message: String,
    params: String,
    status: String,
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let config = DisplayConfig {
            cycle_wait: 20,
            ..DisplayConfig::default()
        };
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        let composer = FrameComposer::new(config, SmallRng::seed_from_u64(seed));
        let frame = match PixelBuffer::new(torch_topology()) {
            Ok(frame) => frame,
            Err(err) => panic!("torch topology does not fit: {err}"),
        };
        let driver = ProtocolDriver::new(MeasuringSink::default(), LedChip::WS2812);

        Self {
            scheduler: FrameScheduler::new(composer, frame, driver, COMMANDS.receiver()),
            commands: COMMANDS.sender(),
            t_ms: 0,
            next_frame_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            mode: config.mode,
            brightness: config.brightness,
            upside_down: config.torch.upside_down,
            mirror_text: config.text.mirrored,
            message: String::from("Hello Torch"),
            params: String::from("spark_prob=5,flame_max=240"),
            status: String::new(),
            led_size: LED_SIZE,
        }
    }

    fn send_params(&mut self, params: &str) {
        self.status = match self.commands.send_params(params) {
            Ok(()) => format!("sent {params}"),
            Err(err) => err.to_string(),
        };
    }

    fn send_message(&mut self) {
        self.status = match self.commands.send_message(self.message.as_bytes()) {
            Ok(()) => format!("message of {} bytes queued", self.message.len()),
            Err(err) => err.to_string(),
        };
    }

    /// Advance synthetic time and run every frame that became due
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if !self.playing {
            return;
        }
        let delta_ms = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0) as u64
        } else {
            0
        };
        self.t_ms = self.t_ms.wrapping_add(delta_ms);

        // Bounded so a long stall does not freeze the UI
        for _ in 0..8 {
            if self.t_ms < self.next_frame_ms {
                break;
            }
            let result = self.scheduler.tick(Instant::from_millis(self.t_ms));
            self.next_frame_ms = result.next_deadline.as_millis();
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // === LED Display ===
                let pitch = self.led_size + LED_GAP;
                #[allow(clippy::cast_precision_loss)]
                let size = egui::vec2(TORCH_COLUMNS as f32 * pitch, TORCH_ROWS as f32 * pitch);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let origin = response.rect.min;
                let frame = self.scheduler.frame();

                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                for y in 0..TORCH_ROWS {
                    for x in 0..TORCH_COLUMNS {
                        let Some(color) = frame.get_pixel(x as u16, y as u16) else {
                            continue;
                        };
                        let top = origin.y + (TORCH_ROWS - 1 - y) as f32 * pitch;
                        let rect = egui::Rect::from_min_size(
                            egui::pos2(origin.x + x as f32 * pitch, top),
                            egui::vec2(self.led_size, self.led_size),
                        );
                        painter.rect_filled(
                            rect,
                            3.0,
                            egui::Color32::from_rgb(color.r, color.g, color.b),
                        );
                    }
                }

                ui.add_space(16.0);

                ui.vertical(|ui| {
                    // <PlaybackControls>
                    ui.horizontal(|ui| {
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                        ui.label(format!("Time: {}.{:03}s", self.t_ms / 1000, self.t_ms % 1000));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Size:");
                        ui.add(egui::Slider::new(&mut self.led_size, 6.0..=32.0));
                    });
                    // </PlaybackControls>

                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.label("Mode:");
                        let mut selected = self.mode;
                        egui::ComboBox::from_id_salt("mode_selector")
                            .selected_text(self.mode.as_str())
                            .show_ui(ui, |ui| {
                                for mode in MODES {
                                    ui.selectable_value(&mut selected, mode, mode.as_str());
                                }
                            });
                        if selected != self.mode {
                            self.mode = selected;
                            self.status = match self.commands.send_mode(selected) {
                                Ok(()) => format!("mode {}", selected.as_str()),
                                Err(err) => err.to_string(),
                            };
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Brightness:");
                        let old_brightness = self.brightness;
                        ui.add(egui::Slider::new(&mut self.brightness, 0u8..=255u8));
                        if self.brightness != old_brightness {
                            self.send_params(&format!("brightness={}", self.brightness));
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui.checkbox(&mut self.upside_down, "Upside down").changed() {
                            self.send_params(&format!("upside_down={}", u8::from(self.upside_down)));
                        }
                        if ui.checkbox(&mut self.mirror_text, "Mirror text").changed() {
                            self.send_params(&format!("mirror_text={}", u8::from(self.mirror_text)));
                        }
                    });

                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.label("Message:");
                        ui.text_edit_singleline(&mut self.message);
                        if ui.button("Show").clicked() {
                            self.send_message();
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Params:");
                        ui.text_edit_singleline(&mut self.params);
                        if ui.button("Apply").clicked() {
                            let params = self.params.clone();
                            self.send_params(&params);
                        }
                    });

                    ui.separator();

                    let composer = self.scheduler.composer();
                    let text = composer.text();
                    ui.label(format!(
                        "Text: {} (offset {}, pass {})",
                        if text.is_active() { "scrolling" } else { "idle" },
                        text.pixel_offset(),
                        text.repeat_count()
                    ));
                    ui.label(format!(
                        "Bitstream: {} bytes per frame",
                        self.scheduler.driver().sink().last_frame_bytes
                    ));
                    if !self.status.is_empty() {
                        ui.label(&self.status);
                    }
                });
            });
        });
    }
}
