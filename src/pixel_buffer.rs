//! Frame storage in physical chain order.

use heapless::Vec;

use crate::color::{Intensity, Pixel, Rgb};
use crate::math8::dim8;
use crate::topology::{Topology, TopologyError};

/// Pixel buffer holding one frame in physical chain order
///
/// `MAX_PIXELS` is the storage capacity; the actual size comes from the
/// topology given at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct PixelBuffer<const MAX_PIXELS: usize> {
    topology: Topology,
    pixels: Vec<Pixel, MAX_PIXELS>,
}

impl<const MAX_PIXELS: usize> PixelBuffer<MAX_PIXELS> {
    /// Create a buffer with all pixels off
    pub fn new(topology: Topology) -> Result<Self, TopologyError> {
        topology.validate(MAX_PIXELS)?;
        let required = topology.pixel_count();
        let mut pixels = Vec::new();
        pixels
            .resize(required, Pixel::OFF)
            .map_err(|()| TopologyError::CapacityExceeded {
                required,
                capacity: MAX_PIXELS,
            })?;
        Ok(Self { topology, pixels })
    }

    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of logical pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Set the pixel at logical (`x`, `y`)
    ///
    /// Coordinates outside the grid are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        if let Some(index) = self.topology.physical_index(x, y) {
            if let Some(pixel) = self.pixels.get_mut(index) {
                *pixel = Pixel::from_rgb(color);
            }
        }
    }

    /// Set the pixel at logical (`x`, `y`), scaled by `brightness`
    ///
    /// Each channel becomes `channel * brightness / 256` before it is
    /// quantized to 5 bits.
    pub fn set_pixel_dimmed(&mut self, x: u16, y: u16, color: Rgb, brightness: u8) {
        self.set_pixel(
            x,
            y,
            Rgb {
                r: dim8(color.r, brightness),
                g: dim8(color.g, brightness),
                b: dim8(color.b, brightness),
            },
        );
    }

    /// Current color of the pixel at logical (`x`, `y`)
    ///
    /// The value comes back at 5-bit precision, expanded to 8 bits.
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.pixel_at(x, y).map(Pixel::to_rgb)
    }

    /// Stored pixel at logical (`x`, `y`)
    pub fn pixel_at(&self, x: u16, y: u16) -> Option<Pixel> {
        let index = self.topology.physical_index(x, y)?;
        self.pixels.get(index).copied()
    }

    /// Set every channel of every pixel to the same level
    pub fn fill(&mut self, level: Intensity) {
        let pixel = Pixel::new(level, level, level);
        for p in &mut self.pixels {
            *p = pixel;
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(Intensity::OFF);
    }

    /// Pixels in physical chain order
    pub fn as_slice(&self) -> &[Pixel] {
        &self.pixels
    }
}
