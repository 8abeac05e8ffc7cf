//! Logical to physical LED addressing.
//!
//! The strip is wound around the torch body row by row. Depending on how
//! it was wired, rows may run backwards, alternate direction (serpentine),
//! start at the top, or run vertically instead of horizontally.

use core::fmt;

/// Error returned when a topology cannot be used for a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// Zero pixels per row or zero rows
    EmptyGrid,
    /// Every logical pixel must drive at least one LED
    ZeroLedsPerPixel,
    /// The grid needs more pixels than the buffer can hold
    CapacityExceeded { required: usize, capacity: usize },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "topology has no pixels"),
            Self::ZeroLedsPerPixel => write!(f, "leds per pixel must be at least 1"),
            Self::CapacityExceeded { required, capacity } => write!(
                f,
                "topology needs {} pixels but buffer holds {}",
                required, capacity
            ),
        }
    }
}

/// Physical winding of the LED chain
///
/// `pixels_per_row` and `rows` describe the chain as wired; the logical
/// size seen by renderers is swapped when [`Topology::with_swapped_xy`]
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pixels_per_row: u16,
    rows: u16,
    leds_per_pixel: u8,
    x_reversed: bool,
    y_reversed: bool,
    alternating: bool,
    swap_xy: bool,
}

impl Topology {
    /// Plain row-major chain, first LED at logical (0, 0)
    pub const fn new(pixels_per_row: u16, rows: u16) -> Self {
        Self {
            pixels_per_row,
            rows,
            leds_per_pixel: 1,
            x_reversed: false,
            y_reversed: false,
            alternating: false,
            swap_xy: false,
        }
    }

    /// Drive several consecutive LEDs with each logical pixel
    #[must_use]
    pub const fn with_leds_per_pixel(mut self, leds_per_pixel: u8) -> Self {
        self.leds_per_pixel = leds_per_pixel;
        self
    }

    /// Rows run from high to low X
    #[must_use]
    pub const fn with_x_reversed(mut self) -> Self {
        self.x_reversed = true;
        self
    }

    /// The chain starts at the highest row
    #[must_use]
    pub const fn with_y_reversed(mut self) -> Self {
        self.y_reversed = true;
        self
    }

    /// Every odd row runs in the opposite direction (serpentine wiring)
    #[must_use]
    pub const fn with_alternating(mut self) -> Self {
        self.alternating = true;
        self
    }

    /// Chain rows are logical columns
    #[must_use]
    pub const fn with_swapped_xy(mut self) -> Self {
        self.swap_xy = true;
        self
    }

    /// Check that the topology describes a usable grid
    pub const fn validate(&self, capacity: usize) -> Result<(), TopologyError> {
        if self.pixels_per_row == 0 || self.rows == 0 {
            return Err(TopologyError::EmptyGrid);
        }
        if self.leds_per_pixel == 0 {
            return Err(TopologyError::ZeroLedsPerPixel);
        }
        let required = self.pixel_count();
        if required > capacity {
            return Err(TopologyError::CapacityExceeded { required, capacity });
        }
        Ok(())
    }

    /// Number of logical pixels
    pub const fn pixel_count(&self) -> usize {
        self.pixels_per_row as usize * self.rows as usize
    }

    /// Number of physical LEDs in the chain
    pub const fn led_count(&self) -> usize {
        self.pixel_count() * self.leds_per_pixel as usize
    }

    pub const fn leds_per_pixel(&self) -> u8 {
        self.leds_per_pixel
    }

    /// Logical width
    pub const fn size_x(&self) -> u16 {
        if self.swap_xy { self.rows } else { self.pixels_per_row }
    }

    /// Logical height
    pub const fn size_y(&self) -> u16 {
        if self.swap_xy { self.pixels_per_row } else { self.rows }
    }

    /// Physical index of the logical pixel at (`x`, `y`)
    ///
    /// Returns `None` for coordinates outside the logical grid.
    pub const fn physical_index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.size_x() || y >= self.size_y() {
            return None;
        }
        let (mut column, mut row) = if self.swap_xy { (y, x) } else { (x, y) };
        if self.y_reversed {
            row = self.rows - 1 - row;
        }
        let mut reversed = self.x_reversed;
        if self.alternating && row % 2 == 1 {
            reversed = !reversed;
        }
        if reversed {
            column = self.pixels_per_row - 1 - column;
        }
        Some(row as usize * self.pixels_per_row as usize + column as usize)
    }
}
