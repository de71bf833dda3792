use crate::color::ColorScheme;
use crate::simulation::{Cell, ForestSimulation};
use gif::{Encoder, Frame, Repeat};
use image::{Rgba, RgbaImage};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Pixels per grid cell in exported PNG snapshots
pub const SNAPSHOT_SCALE: u32 = 4;
/// Pixels per grid cell in recorded GIFs (kept small; GIF frames add up)
pub const GIF_SCALE: u32 = 2;
/// Hard cap on recorded frames per GIF
pub const MAX_GIF_FRAMES: usize = 600;
/// GIF frame delay in hundredths of a second
const GIF_FRAME_DELAY: u16 = 8;

/// Render the current grid to an RGBA image at `scale` pixels per cell
pub fn render_image(simulation: &ForestSimulation, scheme: ColorScheme, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let width = simulation.width as u32 * scale;
    let height = simulation.height as u32 * scale;
    RgbaImage::from_fn(width, height, |px, py| {
        let cell = simulation
            .cell((px / scale) as usize, (py / scale) as usize)
            .unwrap_or(Cell::Empty);
        let [r, g, b] = scheme.cell_rgb(cell);
        Rgba([r, g, b, 255])
    })
}

/// Save a PNG snapshot of the grid into `dir`, returning the written path
pub fn save_snapshot(
    simulation: &ForestSimulation,
    scheme: ColorScheme,
    dir: &Path,
) -> Result<PathBuf, String> {
    let path = dir.join(format!(
        "forest-fire-{}-gen{}.png",
        unix_seconds(),
        simulation.generation
    ));
    let image = render_image(simulation, scheme, SNAPSHOT_SCALE);
    image
        .save(&path)
        .map_err(|e| format!("Failed to write snapshot: {}", e))?;
    Ok(path)
}

/// Collects per-tick frames and encodes an animated GIF on stop
pub struct GifRecorder {
    grid_width: usize,
    grid_height: usize,
    scale: u32,
    frames: Vec<Vec<u8>>,
}

impl GifRecorder {
    /// Start a recording sized to the current grid
    pub fn new(simulation: &ForestSimulation) -> Self {
        Self {
            grid_width: simulation.width,
            grid_height: simulation.height,
            scale: GIF_SCALE,
            frames: Vec::new(),
        }
    }

    /// Capture the current grid as one frame. Frames after the cap, and
    /// frames whose grid was resized since recording began, are skipped.
    pub fn push_frame(&mut self, simulation: &ForestSimulation, scheme: ColorScheme) {
        if self.is_full()
            || simulation.width != self.grid_width
            || simulation.height != self.grid_height
        {
            return;
        }
        let image = render_image(simulation, scheme, self.scale);
        self.frames.push(image.into_raw());
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= MAX_GIF_FRAMES
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode the captured frames into `dir`, returning the written path
    pub fn write(self, dir: &Path) -> Result<PathBuf, String> {
        if self.frames.is_empty() {
            return Err("No frames captured".to_string());
        }
        let pixel_width = self.grid_width as u32 * self.scale;
        let pixel_height = self.grid_height as u32 * self.scale;
        if pixel_width > u16::MAX as u32 || pixel_height > u16::MAX as u32 {
            return Err(format!(
                "Grid too large for GIF export: {}x{} pixels",
                pixel_width, pixel_height
            ));
        }

        let path = dir.join(format!("forest-fire-{}.gif", unix_seconds()));
        let file =
            File::create(&path).map_err(|e| format!("Failed to create GIF file: {}", e))?;
        let mut encoder = Encoder::new(file, pixel_width as u16, pixel_height as u16, &[])
            .map_err(|e| format!("Failed to start GIF encoder: {}", e))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| format!("Failed to configure GIF encoder: {}", e))?;

        for mut rgba in self.frames {
            let mut frame = Frame::from_rgba_speed(
                pixel_width as u16,
                pixel_height as u16,
                &mut rgba,
                10,
            );
            frame.delay = GIF_FRAME_DELAY;
            encoder
                .write_frame(&frame)
                .map_err(|e| format!("Failed to write GIF frame: {}", e))?;
        }
        Ok(path)
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
