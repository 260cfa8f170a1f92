use crate::{Cell, Grid, Position, Result};
use image::{Rgb, RgbImage};
use ndarray::{s, Array3};
use std::path::Path;

pub const CHANNELS: usize = 3;

const ORDINARY_RGB: [f32; 3] = [255., 255., 255.];
const BLOCK_RGB: [f32; 3] = [112.5, 112.5, 112.5];
const REWARD_RGB: [f32; 3] = [0., 225., 0.];
const DAMAGE_RGB: [f32; 3] = [0., 0., 0.];
const AGENT_RGB: [f32; 3] = [0., 0., 225.];

/// Image-like view of the grid, `(rows, columns, 3)` with values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pixels: Array3<f32>,
}

impl Observation {
    /// Renders the whole grid. The agent cell always gets the agent colour.
    pub fn render(grid: &Grid, agent: Position, partial: bool) -> Self {
        let mut pixels = Array3::zeros((grid.row_length(), grid.column_length(), CHANNELS));
        for (p, cell) in grid.iter() {
            let rgb = if p == agent {
                AGENT_RGB
            } else {
                match cell {
                    Cell::Ordinary => ORDINARY_RGB,
                    Cell::Block => BLOCK_RGB,
                    Cell::Reward => REWARD_RGB,
                    Cell::Damage => DAMAGE_RGB,
                }
            };
            let (r, c) = (p.row as usize, p.column as usize);
            for (ch, v) in rgb.iter().enumerate() {
                pixels[[r, c, ch]] = v / 255.;
            }
        }

        let obs = Self { pixels };
        if partial {
            obs.masked_to_window(agent)
        } else {
            obs
        }
    }

    /// Zeroes every pixel outside the 3x3 window centred on `center`.
    pub fn masked_to_window(&self, center: Position) -> Self {
        let (rows, cols, _) = self.pixels.dim();
        let r0 = (center.row - 1).clamp(0, rows as i32) as usize;
        let r1 = (center.row + 2).clamp(0, rows as i32) as usize;
        let c0 = (center.column - 1).clamp(0, cols as i32) as usize;
        let c1 = (center.column + 2).clamp(0, cols as i32) as usize;

        let mut pixels = Array3::zeros(self.pixels.raw_dim());
        pixels
            .slice_mut(s![r0..r1, c0..c1, ..])
            .assign(&self.pixels.slice(s![r0..r1, c0..c1, ..]));

        Self { pixels }
    }

    pub fn pixels(&self) -> &Array3<f32> {
        &self.pixels
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.pixels.dim()
    }

    /// Channel-first copy, `(3, rows, columns)`.
    pub fn to_chw(&self) -> Array3<f32> {
        let (rows, cols, _) = self.pixels.dim();
        Array3::from_shape_fn((CHANNELS, rows, cols), |(ch, r, c)| self.pixels[[r, c, ch]])
    }

    /// Channel-first values as a flat vector, the layout the agent modules consume.
    pub fn flatten(&self) -> Vec<f32> {
        self.to_chw().iter().copied().collect()
    }

    pub fn to_image(&self) -> RgbImage {
        let (rows, cols, _) = self.pixels.dim();
        RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
            let (r, c) = (y as usize, x as usize);
            Rgb([0, 1, 2].map(|ch| (self.pixels[[r, c, ch]] * 255.).round() as u8))
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}
