use crate::simulation::Cell;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Terminal palette for the three cell states
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Green trees on dark ground, red fire
    #[default]
    Classic,
    /// Dry scrubland with orange flames
    Ember,
    /// Grayscale
    Mono,
    /// Dim forest under a night sky
    Night,
    /// Fresh growth
    Spring,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Classic => "Classic",
            ColorScheme::Ember => "Ember",
            ColorScheme::Mono => "Mono",
            ColorScheme::Night => "Night",
            ColorScheme::Spring => "Spring",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Classic => ColorScheme::Ember,
            ColorScheme::Ember => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Night,
            ColorScheme::Night => ColorScheme::Spring,
            ColorScheme::Spring => ColorScheme::Classic,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::Classic => ColorScheme::Spring,
            ColorScheme::Ember => ColorScheme::Classic,
            ColorScheme::Mono => ColorScheme::Ember,
            ColorScheme::Night => ColorScheme::Mono,
            ColorScheme::Spring => ColorScheme::Night,
        }
    }

    /// RGB triple for a cell state; shared by the terminal canvas and
    /// the PNG/GIF exporters
    pub fn cell_rgb(&self, cell: Cell) -> [u8; 3] {
        match self {
            ColorScheme::Classic => match cell {
                Cell::Tree => [34, 139, 34],
                Cell::Fire => [220, 40, 20],
                Cell::Empty => [12, 12, 12],
            },
            ColorScheme::Ember => match cell {
                Cell::Tree => [140, 120, 50],
                Cell::Fire => [255, 140, 0],
                Cell::Empty => [25, 12, 8],
            },
            ColorScheme::Mono => match cell {
                Cell::Tree => [160, 160, 160],
                Cell::Fire => [255, 255, 255],
                Cell::Empty => [20, 20, 20],
            },
            ColorScheme::Night => match cell {
                Cell::Tree => [20, 90, 70],
                Cell::Fire => [255, 70, 50],
                Cell::Empty => [8, 8, 28],
            },
            ColorScheme::Spring => match cell {
                Cell::Tree => [110, 200, 90],
                Cell::Fire => [240, 90, 60],
                Cell::Empty => [18, 28, 18],
            },
        }
    }

    /// Terminal color for a cell state
    pub fn cell_color(&self, cell: Cell) -> Color {
        let [r, g, b] = self.cell_rgb(cell);
        Color::Rgb(r, g, b)
    }
}
