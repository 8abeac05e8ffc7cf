//! Cellular energy simulation behind the fire effect.
//!
//! The torch is a horizontal cylinder of cells. Flames are injected at the
//! bottom row, radiate upwards and sideways and die down. Sparks are hot
//! cells that hand their energy to the cell above, one row per tick, so
//! they travel up the torch until they are exhausted.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use rand::{Rng, RngCore};

use crate::math8::{increase, reduce, scale_coef};

/// How a cell's energy is computed on the next step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellMode {
    /// Glows from radiation of its neighbours
    #[default]
    Passive,
    /// Energy was set from outside for this tick and is kept as is
    Injected,
    /// Loses energy to the cell above
    Spark,
    /// Pulls energy from the spark below it
    SparkReceiving,
}

/// One cell of the energy grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnergyCell {
    pub energy: u8,
    pub mode: CellMode,
}

/// Tunables for injection and diffusion
///
/// Coefficients typed `u16` are fractions of 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorchParams {
    /// Lower bound of the random flame energy at the bottom row
    pub flame_min: u8,
    /// Upper bound of the random flame energy at the bottom row
    pub flame_max: u8,
    /// Chance in percent that a second-row cell ignites a spark per tick
    pub spark_probability: u8,
    pub spark_min: u8,
    pub spark_max: u8,
    /// Energy a spark hands upwards per tick
    pub spark_transfer: u8,
    /// Share of energy a spark keeps when it moves up a row
    pub spark_cap: u16,
    /// Share of the cell below radiated into a passive cell
    pub up_radiation: u16,
    /// Share of the left and right neighbours radiated into a passive cell
    pub side_radiation: u16,
    /// Share of its own energy a passive cell retains
    pub heat_cap: u16,
    /// Render the field upside down
    pub upside_down: bool,
}

impl Default for TorchParams {
    fn default() -> Self {
        Self {
            flame_min: 100,
            flame_max: 220,
            spark_probability: 2,
            spark_min: 200,
            spark_max: 255,
            spark_transfer: 50,
            spark_cap: 200,
            up_radiation: 40,
            side_radiation: 30,
            heat_cap: 0,
            upside_down: false,
        }
    }
}

/// Energy grid of `COLS` x `ROWS` cells, row 0 at the bottom
#[derive(Debug, Clone)]
pub struct EnergyField<const COLS: usize, const ROWS: usize> {
    cells: [[EnergyCell; COLS]; ROWS],
    next: [[u8; COLS]; ROWS],
}

impl<const COLS: usize, const ROWS: usize> Default for EnergyField<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize> EnergyField<COLS, ROWS> {
    /// Create a cold field, every cell passive
    pub const fn new() -> Self {
        Self {
            cells: [[EnergyCell {
                energy: 0,
                mode: CellMode::Passive,
            }; COLS]; ROWS],
            next: [[0; COLS]; ROWS],
        }
    }

    pub const fn columns(&self) -> usize {
        COLS
    }

    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Put every cell back to zero energy and passive mode
    pub fn reset(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[EnergyField.reset] resetting {}x{} cells", COLS, ROWS);
        *self = Self::new();
    }

    /// Cell at (`x`, `y`), `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<EnergyCell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Energy at (`x`, `y`), zero outside the grid
    pub fn energy(&self, x: usize, y: usize) -> u8 {
        self.cell(x, y).map_or(0, |cell| cell.energy)
    }

    /// Overwrite a cell; coordinates outside the grid are ignored
    pub fn set_cell(&mut self, x: usize, y: usize, cell: EnergyCell) {
        if let Some(target) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *target = cell;
        }
    }

    /// Feed new flames into the bottom row and ignite random sparks in
    /// the second row
    pub fn inject<R: RngCore>(&mut self, params: &TorchParams, rng: &mut R) {
        let (flame_min, flame_max) = ordered(params.flame_min, params.flame_max);
        let (spark_min, spark_max) = ordered(params.spark_min, params.spark_max);

        if let Some(bottom) = self.cells.first_mut() {
            for cell in bottom.iter_mut() {
                *cell = EnergyCell {
                    energy: rng.gen_range(flame_min..=flame_max),
                    mode: CellMode::Injected,
                };
            }
        }

        if let Some(second) = self.cells.get_mut(1) {
            for cell in second.iter_mut() {
                if cell.mode != CellMode::Spark
                    && rng.gen_range(0u8..100) < params.spark_probability
                {
                    *cell = EnergyCell {
                        energy: rng.gen_range(spark_min..=spark_max),
                        mode: CellMode::Spark,
                    };
                }
            }
        }
    }

    /// Compute one diffusion step
    ///
    /// Cells are visited bottom row first. Energy is read from the state
    /// before the step, while mode changes apply immediately so a spark
    /// hands over to the row above within the same step.
    pub fn step(&mut self, params: &TorchParams) {
        for y in 0..ROWS {
            for x in 0..COLS {
                let EnergyCell { energy, mode } = self.cells[y][x];
                let energy = match mode {
                    CellMode::Spark => self.spark(x, y, energy, params),
                    CellMode::SparkReceiving => self.spark_receiving(x, y, energy, params),
                    CellMode::Passive => self.passive(x, y, energy, params),
                    CellMode::Injected => energy,
                };
                self.next[y][x] = energy;
            }
        }

        for (row, next_row) in self.cells.iter_mut().zip(self.next.iter()) {
            for (cell, next) in row.iter_mut().zip(next_row.iter()) {
                cell.energy = *next;
            }
        }
    }

    /// Inject and step in one go
    pub fn tick<R: RngCore>(&mut self, params: &TorchParams, rng: &mut R) {
        self.inject(params, rng);
        self.step(params);
    }

    fn spark(&mut self, x: usize, y: usize, energy: u8, params: &TorchParams) -> u8 {
        if let Some(above) = self.cells.get_mut(y + 1) {
            above[x].mode = CellMode::SparkReceiving;
        }
        reduce(energy, params.spark_transfer, 0)
    }

    fn spark_receiving(&mut self, x: usize, y: usize, energy: u8, params: &TorchParams) -> u8 {
        let Some(below_y) = y.checked_sub(1) else {
            // Nothing to receive from on the bottom row
            self.cells[y][x].mode = CellMode::Passive;
            return energy;
        };
        let below = self.cells[below_y][x].energy;
        if below < params.spark_transfer {
            // The spark below is spent: take the rest and carry on upwards
            self.cells[below_y][x].mode = CellMode::Passive;
            let gathered = increase(energy, below, 255);
            self.cells[y][x].mode = CellMode::Spark;
            scale_coef(gathered, params.spark_cap)
        } else {
            increase(energy, params.spark_transfer, 255)
        }
    }

    fn passive(&self, x: usize, y: usize, energy: u8, params: &TorchParams) -> u8 {
        let left = self.cells[y][(x + COLS - 1) % COLS].energy;
        let right = self.cells[y][(x + 1) % COLS].energy;
        let below = match y.checked_sub(1) {
            Some(below_y) => self.cells[below_y][x].energy,
            None => 0,
        };

        let retained = scale_coef(energy, params.heat_cap);
        let side = ((u32::from(left) + u32::from(right)) * u32::from(params.side_radiation)) >> 9;
        let up = (u32::from(below) * u32::from(params.up_radiation)) >> 8;
        #[allow(clippy::cast_possible_truncation)]
        let gained = (side + up).min(255) as u8;
        increase(retained, gained, 255)
    }
}

const fn ordered(a: u8, b: u8) -> (u8, u8) {
    if a <= b { (a, b) } else { (b, a) }
}
