mod app;
mod blocks;
mod color;
mod config;
mod export;
mod presets;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "forest-fire-simulator")]
#[command(about = "Forest-fire cellular automaton simulation in the terminal")]
struct Args {
    /// Grid width in cells (0 = fit the terminal; both dimensions must be set to take effect)
    #[arg(long, default_value = "0")]
    width: usize,

    /// Grid height in cells (0 = fit the terminal)
    #[arg(long, default_value = "0")]
    height: usize,

    /// Initial tree density, 0.0-1.0 (default 0.5; out-of-range values are rejected)
    #[arg(long = "p-tree")]
    p_tree: Option<f64>,

    /// Spontaneous ignition probability per tree per tick, 0.0-1.0 (default 0.001)
    #[arg(long = "p-fire")]
    p_fire: Option<f64>,

    /// Regrowth probability per empty cell per tick, 0.0-1.0 (default 0.01)
    #[arg(long = "p-grow")]
    p_grow: Option<f64>,

    /// Simulation speed (ticks per frame, 1-50)
    #[arg(long)]
    speed: Option<usize>,

    /// Start from a named preset (see --list-presets)
    #[arg(long)]
    preset: Option<String>,

    /// List available presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Color scheme (classic, ember, mono, night, spring)
    #[arg(long)]
    colors: Option<String>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Load configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved configuration to a JSON file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Start paused
    #[arg(long)]
    paused: bool,
}

fn parse_color_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "ember" => ColorScheme::Ember,
        "mono" | "gray" | "grey" => ColorScheme::Mono,
        "night" => ColorScheme::Night,
        "spring" => ColorScheme::Spring,
        _ => ColorScheme::Classic,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let preset_manager = presets::PresetManager::new();
    if args.list_presets {
        for preset in preset_manager.all_presets() {
            println!("{:<18} {}", preset.name, preset.description);
        }
        return Ok(());
    }

    // Resolution order: defaults, then config file, then preset, then
    // explicit probability flags. Flags go through the fail-fast setters so
    // an out-of-range value exits with the typed error instead of clamping.
    let mut base = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(name) = &args.preset {
        let preset = preset_manager
            .find(name)
            .ok_or_else(|| format!("Unknown preset '{}' (try --list-presets)", name))?;
        base.settings = preset.settings;
    }

    // Density must be settled before the forest is seeded
    let mut settings = base.settings;
    if let Some(p_tree) = args.p_tree {
        settings.set_tree_density(p_tree)?;
    }

    // Create the app before touching the terminal so constraint errors
    // print normally
    let mut app = if args.width > 0 && args.height > 0 {
        App::with_grid_size(args.width, args.height, settings, args.seed)?
    } else {
        let (term_width, term_height) = crossterm::terminal::size()?;
        let frame_rect = ratatui::layout::Rect {
            x: 0,
            y: 0,
            width: term_width,
            height: term_height,
        };
        let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
        App::new(canvas_width, canvas_height, settings, args.seed)?
    };

    // The remaining probability flags route through the controller's
    // validated setters
    if let Some(p_fire) = args.p_fire {
        app.set_fire_probability(p_fire)?;
    }
    if let Some(p_grow) = args.p_grow {
        app.set_growth_probability(p_grow)?;
    }
    app.color_scheme = match &args.colors {
        Some(s) => parse_color_scheme(s),
        None => base.color_scheme,
    };
    app.steps_per_frame = args.speed.unwrap_or(base.steps_per_frame).clamp(1, 50);
    app.simulation.paused = args.paused;

    if let Some(path) = &args.write_config {
        let config = AppConfig {
            version: base.version,
            settings: app.simulation.settings,
            color_scheme: app.color_scheme,
            steps_per_frame: app.steps_per_frame,
        };
        config.save_to_file(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('x') | KeyCode::Char('X') => app.ignite_center(),
                        KeyCode::Char('e') | KeyCode::Char('E') => app.export_snapshot(),
                        KeyCode::Char('w') | KeyCode::Char('W') => app.toggle_recording(),
                        KeyCode::Char(c @ '1'..='9') => {
                            app.apply_preset_index((c as u8 - b'1') as usize)
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::Speed;
                        }

                        // Parameter keys
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.cycle_color_scheme();
                            app.focus = Focus::ColorScheme;
                        }
                        KeyCode::Char('f') | KeyCode::Char('F') => {
                            app.focus = Focus::Burn;
                            app.adjust_focused_up();
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            app.focus = Focus::Burn;
                            app.adjust_focused_down();
                        }
                        KeyCode::Char('g') | KeyCode::Char('G') => {
                            app.focus = Focus::Growth;
                            app.adjust_focused_up();
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            app.focus = Focus::Growth;
                            app.adjust_focused_down();
                        }
                        KeyCode::Char('t') | KeyCode::Char('T') => {
                            app.focus = Focus::Density;
                            app.adjust_focused_up();
                        }
                        KeyCode::Char('y') | KeyCode::Char('Y') => {
                            app.focus = Focus::Density;
                            app.adjust_focused_down();
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES);
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) && !app.show_help {
                        let size = terminal.size()?;
                        let frame_rect = ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width: size.width,
                            height: size.height,
                        };
                        let inner = ui::canvas_inner(frame_rect, app.fullscreen_mode);
                        if let Some((x, y)) = blocks::map_click(
                            mouse.column,
                            mouse.row,
                            inner,
                            app.simulation.width,
                            app.simulation.height,
                        ) {
                            // One character covers two grid rows; light both
                            let _ = app.ignite_at(x, y);
                            if y + 1 < app.simulation.height {
                                let _ = app.ignite_at(x, y + 1);
                            }
                        }
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Run simulation tick
        app.tick();
    }
}
