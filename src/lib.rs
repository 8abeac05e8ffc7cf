#![no_std]

pub mod bounds;
pub mod color;
pub mod command;
pub mod composer;
pub mod config;
pub mod device;
pub mod energy;
pub mod frame_scheduler;
pub mod gamma;
pub mod math8;
pub mod pixel_buffer;
pub mod protocol;
pub mod text;
pub mod topology;

pub use color::{EnergyPalette, Intensity, Pixel, Rgb};
pub use command::{
    CommandChannel, CommandError, CommandReceiver, CommandSender, ControlCommand, TrySendError,
};
pub use composer::FrameComposer;
pub use config::{DisplayConfig, DisplayMode, ParamsOutcome};
pub use device::{DEVICE_API_VERSION, DeviceRequest};
pub use energy::{CellMode, EnergyCell, EnergyField, TorchParams};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use gamma::{PWM_TABLE, PwmTable};
pub use pixel_buffer::PixelBuffer;
pub use protocol::{BitstreamSink, ColorOrder, LedChip, ProtocolDriver, SpiSink};
pub use text::{TextCompositor, TextParams};
pub use topology::{Topology, TopologyError};

pub use embassy_time::{Duration, Instant};

/// Columns around the shipped torch
pub const TORCH_COLUMNS: usize = 13;

/// Rows up the shipped torch
pub const TORCH_ROWS: usize = 18;

/// Logical pixels of the shipped torch
pub const TORCH_PIXELS: usize = TORCH_COLUMNS * TORCH_ROWS;

/// The shipped torch: one LED per pixel, rows wound in the same direction
#[allow(clippy::cast_possible_truncation)]
pub const fn torch_topology() -> Topology {
    Topology::new(TORCH_COLUMNS as u16, TORCH_ROWS as u16)
}
