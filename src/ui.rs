use crate::app::{App, Focus};
use crate::blocks;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 22;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 44;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 16;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Canvas block area (the bordered box right of the sidebar)
pub fn canvas_area(frame_area: Rect, fullscreen: bool) -> Rect {
    if fullscreen {
        frame_area
    } else {
        Rect {
            x: frame_area.x + SIDEBAR_WIDTH,
            y: frame_area.y,
            width: frame_area.width.saturating_sub(SIDEBAR_WIDTH),
            height: frame_area.height,
        }
    }
}

/// Canvas area inside the borders; this is the rect mouse clicks are
/// translated against
pub fn canvas_inner(frame_area: Rect, fullscreen: bool) -> Rect {
    let outer = canvas_area(frame_area, fullscreen);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    let inner = canvas_inner(frame_area, fullscreen);
    (inner.width, inner.height)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Status
            Constraint::Length(9),  // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Forest Fire ");

    let sim = &app.simulation;
    let total = (sim.width * sim.height).max(1);
    let bar_width = (area.width.saturating_sub(4)) as usize;
    // Population bar: trees, then fire, then bare ground
    let tree_chars = (sim.tree_count * bar_width) / total;
    let fire_chars = if sim.fire_count > 0 {
        ((sim.fire_count * bar_width) / total).max(1)
    } else {
        0
    };
    let empty_chars = bar_width.saturating_sub(tree_chars + fire_chars);

    let status_text = if sim.paused { "PAUSED" } else { "RUNNING" };
    let status_color = if sim.paused {
        HIGHLIGHT_COLOR
    } else {
        BORDER_COLOR
    };

    let mut status_line = vec![Span::styled(status_text, Style::default().fg(status_color))];
    if let Some(recorder) = &app.recorder {
        status_line.push(Span::styled(
            format!(" ● REC {}", recorder.frame_count()),
            Style::default().fg(Color::Red),
        ));
    }

    let content = vec![
        Line::from(Span::styled(
            format!("Gen {}  Fires {}", sim.generation, sim.fire_count),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(tree_chars), Style::default().fg(Color::Green)),
            Span::styled("█".repeat(fire_chars), Style::default().fg(Color::Red)),
            Span::styled("░".repeat(empty_chars), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(status_line),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.simulation.settings;

    let content = vec![
        make_line(
            "Burn",
            format!("{:.4}", settings.p_fire),
            app.focus == Focus::Burn,
        ),
        make_line(
            "Color",
            app.color_scheme.name().to_string(),
            app.focus == Focus::ColorScheme,
        ),
        make_line(
            "Density",
            format!("{:.2}", settings.p_tree),
            app.focus == Focus::Density,
        ),
        make_line(
            "Growth",
            format!("{:.3}", settings.p_grow),
            app.focus == Focus::Growth,
        ),
        make_line(
            "Speed",
            format!("{}", app.steps_per_frame),
            app.focus == Focus::Speed,
        ),
        Line::from(Span::styled(
            format!("  Grid: {}x{}", app.simulation.width, app.simulation.height),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("  Bare: {}", app.simulation.empty_count()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("R", "reseed forest".to_string()),
        make_control("Click", "ignite tree".to_string()),
        make_control("X", "ignite center".to_string()),
        make_control("1-9", "presets".to_string()),
        make_control("C", "color scheme".to_string()),
        make_control("F/D", "burn chance".to_string()),
        make_control("G/B", "growth chance".to_string()),
        make_control("T/Y", "tree density".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("E", "save PNG".to_string()),
        make_control("W", "record GIF".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("Tab", "cycle params".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.status_message() {
        Some(message) => format!(" {} ", message),
        None => String::new(),
    };
    let block = styled_block(&title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Two grid rows per character row via half blocks, read from the
    // engine's snapshot view
    let cells = blocks::render_to_blocks(
        app.current_snapshot(),
        app.simulation.width,
        app.simulation.height,
        inner.width,
        inner.height,
        app.color_scheme,
    );

    let mut lines = Vec::with_capacity(inner.height as usize);
    for row in cells.chunks(inner.width as usize) {
        let spans: Vec<Span> = row
            .iter()
            .map(|cell| {
                Span::styled(
                    blocks::HALF_BLOCK.to_string(),
                    Style::default().fg(cell.fg).bg(cell.bg),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(40);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("FOREST FIRE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("A three-state cellular automaton on a wrap-around grid: trees grow, catch fire from burning neighbors or lightning, and burn down to bare ground."),
        Line::from(""),
        Line::from(Span::styled("RULES (each tick):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Fire burns out to bare ground after one tick."),
        Line::from("A tree next to fire always catches; otherwise it ignites with the burn chance."),
        Line::from("Bare ground sprouts a tree with the growth chance."),
        Line::from("Edges wrap: fire crossing the right edge reappears on the left."),
        Line::from(""),
        Line::from(Span::styled("IGNITION:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Click a tree to set it alight (X ignites the center cell). Clicking fire or bare ground does nothing."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(""),
        Line::from(Span::styled("F/D - Burn Chance", Style::default().fg(TEXT_COLOR))),
        Line::from("Spontaneous ignition probability per tree per tick"),
        Line::from(""),
        Line::from(Span::styled("G/B - Growth Chance", Style::default().fg(TEXT_COLOR))),
        Line::from("Regrowth probability per bare cell per tick"),
        Line::from(""),
        Line::from(Span::styled("T/Y - Tree Density", Style::default().fg(TEXT_COLOR))),
        Line::from("Initial forest cover; applies when reseeding with R"),
        Line::from(""),
        Line::from(Span::styled("1-9 - Presets", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Classic, Old Growth, Tinderbox, Lightning Season, Rainforest, Sparse Steppe, Slash and Regrow, Firestorm, Quiet Woods"),
        Line::from(""),
        Line::from(Span::styled("CAPTURE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("E saves a PNG snapshot; W starts/stops a GIF recording. Files land in the working directory."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Reseed, C=Colors, V=Fullscreen, Tab/Arrows=Adjust, +/-=Speed, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
