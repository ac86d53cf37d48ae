//! tabpager - terminal demo of the tabbed page container
//!
//! Shows a handful of scrollable text pages under a tab strip, with an
//! optional collapsible header. Pages follow horizontal mouse drags, the
//! header follows vertical ones.

mod pages;

use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pages::{Banner, TextPage};
use ratatui::prelude::*;
use tabpager_core::{BusReceiver, ContentUnit, GestureSignal, Message, TabPagerConfig};
use tabpager_ui::{title_width_fn, PageLayout, TabPageController};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Tabbed page container demo
#[derive(Parser, Debug)]
#[command(name = "tabpager")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config, then terminal presets)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file; the terminal belongs to the UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Built-in theme name (dark or light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Number of pages to show
    #[arg(short = 'n', long, default_value_t = 5)]
    pages: usize,

    /// Hide the collapsible header
    #[arg(long)]
    no_header: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const PAGE_TITLES: [&str; 8] = [
    "Inbox", "Starred", "Drafts", "Sent", "Archive", "Spam", "Trash", "All Mail",
];

/// Frame interval while something moves
const FRAME: Duration = Duration::from_millis(16);
/// Poll interval while idle
const IDLE: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = load_config(&cli)?;

    let mut pager = TabPageController::new(title_width_fn::<String>()).with_config(config);
    if !cli.no_header {
        pager.set_header_view(Some(Box::new(Banner::default())));
    }
    pager.set_items(
        (0..cli.pages)
            .map(|i| {
                let title = PAGE_TITLES[i % PAGE_TITLES.len()].to_string();
                let page = TextPage::new(title.clone(), 40 + i * 15);
                (Box::new(page) as Box<dyn ContentUnit>, title)
            })
            .collect(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut pager);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("tabpager={level}").parse()?)
        .add_directive(format!("tabpager_ui={level}").parse()?)
        .add_directive(format!("tabpager_core={level}").parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(File::create(path)?))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<TabPagerConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| TabPagerConfig::config_path().filter(|path| path.exists()));
    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            TabPagerConfig::load_from(&path)?
        }
        None => TabPagerConfig::terminal(),
    };
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Pointer drag in progress.
#[derive(Debug, Clone, Copy)]
enum Drag {
    /// Button down, axis not yet known
    Pending { column: u16, row: u16 },
    Paging { start_column: u16, start_offset: f64 },
    Header {
        start_row: u16,
        last_row: u16,
        last_at: Instant,
        velocity: f64,
    },
}

struct Demo<'a> {
    pager: &'a mut TabPageController<String>,
    area: Rect,
    drag: Option<Drag>,
    quit: bool,
}

impl Demo<'_> {
    fn layout(&self) -> PageLayout {
        let header_height = self
            .pager
            .header_view()
            .map_or(0, |header| tabpager_ui::renderer::cells(header.height()));
        PageLayout::new(
            self.area,
            self.pager.strip_config(),
            header_height,
            self.pager.header_offset(),
            self.pager.is_strip_visible(),
        )
    }

    fn dispatch(&mut self, msg: Message) {
        if let Some(unhandled) = self.pager.handle_message(&msg) {
            match unhandled {
                Message::Quit => self.quit = true,
                other => debug!(?other, "unhandled message"),
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c' | 'q'))
            | (_, KeyCode::Char('q'))
            | (_, KeyCode::Esc) => self.dispatch(Message::Quit),
            (_, KeyCode::Tab | KeyCode::Right | KeyCode::Char('l')) => {
                self.dispatch(Message::NextTab)
            }
            (_, KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h')) => {
                self.dispatch(Message::PrevTab)
            }
            (_, KeyCode::Char(c)) if c.is_ascii_digit() && c != '0' => {
                let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                self.dispatch(Message::SelectTab(index));
            }
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_rows(1.0),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_rows(-1.0),
            _ => {}
        }
    }

    /// Scrolls by whole rows: through the header coordinator when there is
    /// a header, otherwise the page scrolls itself.
    fn scroll_rows(&mut self, rows: f64) {
        if self.pager.header_view().is_some() {
            let now = Instant::now();
            self.dispatch(Message::batch(vec![
                Message::TouchBegan,
                Message::Gesture(GestureSignal::began(now)),
                Message::Gesture(GestureSignal::changed(-rows, now)),
                Message::Gesture(GestureSignal::ended(-rows, 0.0, now)),
            ]));
            return;
        }

        let page_height = self.pager.pager().viewport_height();
        let Some(index) = self.pager.selected_index() else {
            return;
        };
        if let Some(scroll) = self
            .pager
            .unit_mut(index)
            .and_then(|unit| unit.inner_scroll_mut())
        {
            let max = (scroll.content_height() - page_height).max(0.0);
            scroll.set_offset((scroll.offset() + rows).clamp(0.0, max));
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now = Instant::now();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dispatch(Message::TouchBegan);
                let layout = self.layout();
                let on_strip = layout
                    .visible(layout.strip)
                    .is_some_and(|strip| strip.contains(Position::new(mouse.column, mouse.row)));
                if on_strip {
                    let x = (mouse.column - self.area.x) as f64;
                    if let Some(index) = self.pager.tab_at(x) {
                        self.dispatch(Message::TapTab(index));
                    }
                    return;
                }
                self.drag = Some(Drag::Pending {
                    column: mouse.column,
                    row: mouse.row,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag_to(mouse.column, mouse.row, now),
            MouseEventKind::Up(MouseButton::Left) => self.release(now),
            MouseEventKind::ScrollDown => self.scroll_rows(3.0),
            MouseEventKind::ScrollUp => self.scroll_rows(-3.0),
            _ => {}
        }
    }

    fn drag_to(&mut self, column: u16, row: u16, now: Instant) {
        let Some(drag) = self.drag else {
            return;
        };
        let next = match drag {
            Drag::Pending {
                column: start_column,
                row: start_row,
            } => {
                let dx = column.abs_diff(start_column);
                let dy = row.abs_diff(start_row);
                if dx == 0 && dy == 0 {
                    drag
                } else if dx >= dy {
                    self.dispatch(Message::PagingBegan);
                    let start_offset = self.pager.pager().offset();
                    self.dispatch(Message::PagingScrolled(
                        start_offset - (column as f64 - start_column as f64),
                    ));
                    Drag::Paging {
                        start_column,
                        start_offset,
                    }
                } else {
                    self.dispatch(Message::Gesture(GestureSignal::began(now)));
                    let translation = row as f64 - start_row as f64;
                    self.dispatch(Message::Gesture(GestureSignal::changed(translation, now)));
                    Drag::Header {
                        start_row,
                        last_row: row,
                        last_at: now,
                        velocity: 0.0,
                    }
                }
            }
            Drag::Paging {
                start_column,
                start_offset,
            } => {
                self.dispatch(Message::PagingScrolled(
                    start_offset - (column as f64 - start_column as f64),
                ));
                drag
            }
            Drag::Header {
                start_row,
                last_row,
                last_at,
                velocity,
            } => {
                let elapsed = now.saturating_duration_since(last_at).as_secs_f64();
                let velocity = if elapsed > 0.0 {
                    (row as f64 - last_row as f64) / elapsed
                } else {
                    velocity
                };
                let translation = row as f64 - start_row as f64;
                self.dispatch(Message::Gesture(GestureSignal::changed(translation, now)));
                Drag::Header {
                    start_row,
                    last_row: row,
                    last_at: now,
                    velocity,
                }
            }
        };
        self.drag = Some(next);
    }

    fn release(&mut self, now: Instant) {
        match self.drag.take() {
            Some(Drag::Paging { .. }) => self.pager.settle_paging(),
            Some(Drag::Header {
                start_row,
                last_row,
                velocity,
                ..
            }) => {
                let translation = last_row as f64 - start_row as f64;
                self.dispatch(Message::Gesture(GestureSignal::ended(
                    translation,
                    velocity,
                    now,
                )));
            }
            Some(Drag::Pending { .. }) | None => {}
        }
    }
}

fn drain_notifications(rx: &mut BusReceiver) {
    while let Ok(msg) = rx.try_recv() {
        debug!(?msg, "container notification");
    }
}

fn run_app<B>(terminal: &mut Terminal<B>, pager: &mut TabPageController<String>) -> Result<()>
where
    B: Backend,
    <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
{
    let size = terminal.size()?;
    let mut rx = pager.subscribe();
    let mut demo = Demo {
        pager,
        area: Rect::new(0, 0, size.width, size.height),
        drag: None,
        quit: false,
    };
    demo.pager
        .set_viewport(size.width as f64, size.height as f64);
    demo.pager.view_will_appear(false);
    demo.pager.view_did_appear(false);

    loop {
        let animating = demo.pager.tick(Instant::now());
        drain_notifications(&mut rx);

        terminal.draw(|frame| {
            let area = frame.area();
            demo.pager.render(area, frame.buffer_mut());
        })?;

        let timeout = if animating || demo.drag.is_some() {
            FRAME
        } else {
            IDLE
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => demo.handle_key(key),
                Event::Mouse(mouse) => demo.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    demo.area = Rect::new(0, 0, width, height);
                    demo.pager.set_viewport(width as f64, height as f64);
                }
                _ => {}
            }
        }

        if demo.quit {
            break;
        }
    }

    demo.pager.view_will_disappear(false);
    demo.pager.view_did_disappear(false);
    info!("quit");
    Ok(())
}
