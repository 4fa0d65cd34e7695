use std::fs::File;
use std::io::{self, stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use matrix_grid_config::{AppConfig, PreviewConfig};
use matrix_grid_effect::{HeadlessPlatform, HostEvent, LifecycleController, Visibility};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
};

mod color;
mod preview;

use preview::{Controller, RowScroll};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = AppConfig::load()?;
    if let Some(path) = &config.preview.log_file {
        init_tracing(path)?;
    }

    let (cols, rows) = crossterm::terminal::size()?;
    let app = App::new(config, cols, rows);

    let terminal = ratatui::init();
    with_terminal_modes(
        || execute!(stdout(), EnableMouseCapture, EnableFocusChange),
        || app.run(terminal),
        || {
            let disabled = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
            ratatui::restore();
            disabled
        },
    )
}

/// Run `body` between `enable` and `restore`.
///
/// `restore` runs whether or not `enable` or `body` failed; the first error wins.
fn with_terminal_modes(
    enable: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> color_eyre::Result<()>,
    restore: impl FnOnce() -> io::Result<()>,
) -> color_eyre::Result<()> {
    let result = enable().map_err(Into::into).and_then(|()| body());
    let restored = restore();
    result?;
    restored?;
    Ok(())
}

fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

/// The preview application: a headless grid document drawn into the terminal.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    controller: Controller,
    scroll: RowScroll,
    preview: PreviewConfig,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `cols` x `rows`.
    pub fn new(config: AppConfig, cols: u16, rows: u16) -> Self {
        let AppConfig { grid, preview } = config;
        let mut platform = HeadlessPlatform::new(
            preview::viewport_for(cols, rows, grid.cell_size),
            grid.cell_size,
        )
        .with_seed(Self::clock_seed());
        platform.add_mount(&grid.mount_id);

        let mut controller = LifecycleController::new(platform, grid);
        controller.start();

        Self {
            running: false,
            controller,
            scroll: RowScroll::new(),
            preview,
        }
    }

    /// Seed captured from the system clock.
    fn clock_seed() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let mut last_tick = Instant::now();
        while self.running {
            let now = Instant::now();
            self.tick(now.duration_since(last_tick));
            last_tick = now;

            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Deliver due timers and frame callbacks, then move the rows.
    fn tick(&mut self, dt: Duration) {
        for event in self.controller.platform_mut().advance(dt) {
            self.controller.dispatch(event);
        }
        for event in self.controller.platform_mut().take_frames() {
            self.controller.dispatch(event);
        }
        self.scroll.advance(&mut self.controller, dt);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        preview::render(frame, &self.controller);

        let chunks =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(frame.area());
        let accent = Color::Rgb(0, 255, 65);
        let state = match self.controller.visibility() {
            Visibility::Visible => " pause  ",
            Visibility::Hidden => " resume  ",
        };
        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "p".bold().fg(accent),
            state.dark_gray(),
            "r".bold().fg(accent),
            " rebuild".dark_gray(),
        ])
        .style(Style::new().bg(Color::Black))
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and forwards them to the grid.
    /// Drains everything already queued so a burst of mouse motion lands in one frame.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let mut timeout = Duration::from_millis(self.preview.frame_interval_ms);
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                Event::FocusLost => self.set_hidden(true),
                Event::FocusGained => self.set_hidden(false),
                _ => {}
            }
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('p')) => self.toggle_pause(),
            (_, KeyCode::Char('r')) => {
                self.controller.init();
            }
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            let cell_size = self.controller.config().cell_size;
            let pointer = preview::pointer_for(mouse.column, mouse.row, cell_size);
            self.controller.dispatch(HostEvent::PointerMove(pointer));
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        let cell_size = self.controller.config().cell_size;
        self.controller
            .platform_mut()
            .set_viewport(preview::viewport_for(cols, rows, cell_size));
        self.controller.dispatch(HostEvent::Resize);
    }

    fn toggle_pause(&mut self) {
        let hidden = self.controller.visibility() == Visibility::Visible;
        self.set_hidden(hidden);
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.controller.dispatch(HostEvent::VisibilityChange { hidden });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
