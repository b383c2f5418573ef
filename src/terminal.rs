// SPDX-License-Identifier: GPL-3.0-only

//! Terminal control surface
//!
//! Renders the live feed with Unicode half-block characters next to the
//! profile list and the three settings fields. Selection changes apply the
//! chosen profile immediately; a save parses the fields, overwrites the
//! active profile and re-applies it. Every outcome lands in the status bar.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Widget},
    Terminal,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::backends::camera::{CameraFrame, PixelFormat};
use crate::constants::{EVENT_POLL_INTERVAL, PREVIEW_TITLE, SNAPSHOT_PREFIX};
use crate::controller::ProfileController;
use crate::pipelines::preview::{CaptureState, PreviewController};
use crate::profiles::{ProfileSettings, ProfileStore};

/// Run the control surface until the operator quits
pub fn run(
    controller: &mut ProfileController,
    preview: &PreviewController,
    frames: watch::Receiver<Option<CameraFrame>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, controller, preview, frames);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Which element receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Profiles,
    Resolution,
    FrameRate,
    Exposure,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Profiles => Focus::Resolution,
            Focus::Resolution => Focus::FrameRate,
            Focus::FrameRate => Focus::Exposure,
            Focus::Exposure => Focus::Profiles,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Profiles => Focus::Exposure,
            Focus::Resolution => Focus::Profiles,
            Focus::FrameRate => Focus::Resolution,
            Focus::Exposure => Focus::FrameRate,
        }
    }
}

/// UI state for the control panel
struct ControlPanel {
    selected: usize,
    focus: Focus,
    resolution_input: String,
    frame_rate_input: String,
    exposure_input: String,
    status: String,
    preview_lost_reported: bool,
}

impl ControlPanel {
    fn new(store: &ProfileStore) -> Self {
        let selected = store
            .names()
            .position(|name| name == store.active_name())
            .unwrap_or(0);
        let [resolution_input, frame_rate_input, exposure_input] =
            field_values(&store.active().settings);

        Self {
            selected,
            focus: Focus::Profiles,
            resolution_input,
            frame_rate_input,
            exposure_input,
            status: help_message(),
            preview_lost_reported: false,
        }
    }

    fn reload_fields(&mut self, settings: &ProfileSettings) {
        let [resolution, frame_rate, exposure] = field_values(settings);
        self.resolution_input = resolution;
        self.frame_rate_input = frame_rate;
        self.exposure_input = exposure;
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Profiles => None,
            Focus::Resolution => Some(&mut self.resolution_input),
            Focus::FrameRate => Some(&mut self.frame_rate_input),
            Focus::Exposure => Some(&mut self.exposure_input),
        }
    }
}

/// Pre-fill values for the three fields, resolution in the "(w, h)" form
fn field_values(settings: &ProfileSettings) -> [String; 3] {
    [
        format!(
            "({}, {})",
            settings.resolution.width, settings.resolution.height
        ),
        settings.frame_rate.to_string(),
        settings.exposure.to_string(),
    ]
}

fn help_message() -> String {
    "Tab: focus | Up/Down: profile | Enter/'s': save | 'p': snapshot | 'q': quit".to_string()
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut ProfileController,
    preview: &PreviewController,
    frames: watch::Receiver<Option<CameraFrame>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = ControlPanel::new(controller.store());

    loop {
        let frame = frames.borrow().clone();

        if preview.state() == CaptureState::Stopped && !panel.preview_lost_reported {
            panel.preview_lost_reported = true;
            panel.status = "Preview stopped (see log); controls remain active".to_string();
        }

        terminal.draw(|f| draw(f, controller.store(), &panel, frame.as_ref()))?;

        if event::poll(EVENT_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if !handle_key(key, controller, &mut panel, frame.as_ref()) {
                break;
            }
        }
    }

    Ok(())
}

/// Handle one key press; returns false when the operator quit
fn handle_key(
    key: KeyEvent,
    controller: &mut ProfileController,
    panel: &mut ControlPanel,
    frame: Option<&CameraFrame>,
) -> bool {
    match key.code {
        KeyCode::Tab => panel.focus = panel.focus.next(),
        KeyCode::BackTab => panel.focus = panel.focus.prev(),
        KeyCode::Esc => panel.focus = Focus::Profiles,
        KeyCode::Enter if panel.focus != Focus::Profiles => save_fields(controller, panel),
        KeyCode::Up if panel.focus == Focus::Profiles => select_profile(controller, panel, -1),
        KeyCode::Down if panel.focus == Focus::Profiles => select_profile(controller, panel, 1),
        KeyCode::Backspace => {
            if let Some(input) = panel.focused_input() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = panel.focused_input() {
                input.push(c);
            } else {
                match c {
                    'q' => return false,
                    's' => save_fields(controller, panel),
                    'p' => snapshot(panel, frame),
                    _ => {}
                }
            }
        }
        _ => {}
    }
    true
}

/// Profile-selection event: move the list selection and apply that profile
fn select_profile(controller: &mut ProfileController, panel: &mut ControlPanel, step: isize) {
    let count = controller.store().len() as isize;
    let selected = (panel.selected as isize + step).rem_euclid(count) as usize;
    panel.selected = selected;

    let name = match controller.store().names().nth(selected) {
        Some(name) => name.to_string(),
        None => return,
    };

    match controller.apply(&name) {
        Ok(status) => {
            panel.status = status.message();
            panel.reload_fields(&controller.store().active().settings);
        }
        // Unreachable from the list, but surfaced all the same
        Err(e) => panel.status = e.to_string(),
    }
}

/// Save event: parse the three fields, overwrite the active profile, re-apply
fn save_fields(controller: &mut ProfileController, panel: &mut ControlPanel) {
    let parsed = ProfileSettings::parse(
        &panel.resolution_input,
        &panel.frame_rate_input,
        &panel.exposure_input,
    );

    match parsed {
        Ok(settings) => match controller.update(settings) {
            Ok(status) => {
                panel.status = status.message();
                panel.reload_fields(&controller.store().active().settings);
            }
            Err(e) => panel.status = e.to_string(),
        },
        Err(e) => {
            warn!(error = %e, "Rejected profile input");
            panel.status = e.to_string();
        }
    }
}

fn snapshot(panel: &mut ControlPanel, frame: Option<&CameraFrame>) {
    let Some(frame) = frame else {
        panel.status = "No frame to save yet".to_string();
        return;
    };

    match save_snapshot(frame) {
        Ok(path) => panel.status = format!("Saved: {}", path.display()),
        Err(e) => {
            error!(error = %e, "Failed to save snapshot");
            panel.status = format!("Snapshot failed: {}", e);
        }
    }
}

/// Save the given preview frame as a timestamped PNG
fn save_snapshot(frame: &CameraFrame) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if frame.format != PixelFormat::Rgb24 {
        return Err(format!("cannot encode {} frames", frame.format).into());
    }

    let img: image::RgbImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, frame.data_slice().to_vec())
            .ok_or("Failed to create image")?;

    let dir = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filepath = dir.join(format!("{}{}.png", SNAPSHOT_PREFIX, timestamp));

    img.save(&filepath)?;
    info!(path = %filepath.display(), "Snapshot saved");

    Ok(filepath)
}

fn draw(
    f: &mut ratatui::Frame,
    store: &ProfileStore,
    panel: &ControlPanel,
    frame: Option<&CameraFrame>,
) {
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(10)])
        .split(rows[0]);

    draw_panel(f, store, panel, columns[0]);

    let title = format!(
        "{} - {} @ {}",
        PREVIEW_TITLE,
        store.active_name(),
        store.active().settings.resolution
    );
    let preview_block = Block::default().title(title).borders(Borders::ALL);
    let inner = preview_block.inner(columns[1]);
    f.render_widget(preview_block, columns[1]);
    f.render_widget(FrameWidget { frame }, inner);

    let status = StatusBar {
        message: &panel.status,
    };
    f.render_widget(status, rows[1]);
}

fn draw_panel(f: &mut ratatui::Frame, store: &ProfileStore, panel: &ControlPanel, area: Rect) {
    let list_height = store.len() as u16 + 2;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(list_height),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let items: Vec<ListItem> = store.names().map(ListItem::new).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title("Profiles")
                .borders(Borders::ALL)
                .border_style(focus_style(panel.focus == Focus::Profiles)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(panel.selected));
    f.render_stateful_widget(list, sections[0], &mut list_state);

    let fields = [
        ("Resolution (w, h)", &panel.resolution_input, Focus::Resolution),
        ("Frame Rate (fps)", &panel.frame_rate_input, Focus::FrameRate),
        ("Exposure (us)", &panel.exposure_input, Focus::Exposure),
    ];
    for (i, (label, value, focus)) in fields.into_iter().enumerate() {
        let field = Paragraph::new(value.as_str()).block(
            Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(focus_style(panel.focus == focus)),
        );
        f.render_widget(field, sections[i + 1]);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a CameraFrame>,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame else {
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        if area.width == 0 || area.height == 0 || frame.width == 0 || frame.height == 0 {
            return;
        }

        // One terminal cell holds two vertically stacked pixels ('▀' with
        // fg as the upper pixel, bg as the lower), so the usable pixel
        // height is twice the cell height.
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center within the pane
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_pixel(frame, src_x, src_y_top);
                let bottom_color = sample_pixel(frame, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

/// Pick the display color for one source pixel, clamped to the frame edge
fn sample_pixel(frame: &CameraFrame, x: u32, y: u32) -> Color {
    let x = x.min(frame.width - 1);
    let y = y.min(frame.height - 1);
    let data = frame.data_slice();

    match frame.format {
        PixelFormat::Rgb24 => {
            let idx = (y * frame.stride + x * 3) as usize;
            if idx + 2 < data.len() {
                Color::Rgb(data[idx], data[idx + 1], data[idx + 2])
            } else {
                Color::Rgb(0, 0, 0)
            }
        }
        PixelFormat::Gray8 => {
            let idx = (y * frame.stride + x) as usize;
            let v = data.get(idx).copied().unwrap_or(0);
            Color::Rgb(v, v, v)
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Status text embeds operator input, so it is not necessarily ASCII
        let text = truncate_to_boundary(self.message, area.width as usize);

        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

/// Cut a message to at most `max_len` bytes without splitting a character
fn truncate_to_boundary(message: &str, max_len: usize) -> &str {
    if message.len() <= max_len {
        return message;
    }
    let mut end = max_len;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
