use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::browse::adapter::{Video, VideoGroup};
use crate::browse::section::Section;
use crate::browse::{BrowsePresenter, Focus};
use crate::catalog::MediaService;
use crate::command::{self, Command};
use crate::config::AppConfig;
use crate::event::{AppEvent, Event, EventHandler};
use crate::screen::{BrowseScreen, SharedScreen, TerminalNavigator};
use crate::ui;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Command,
}

/// Which half of the screen receives movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sections,
    Rows,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,
    pub presenter: BrowsePresenter,
    pub screen: Rc<RefCell<BrowseScreen>>,

    pub mode: AppMode,
    pub pane: Pane,
    pub show_help: bool,
    pub command_input: String,

    // Selection
    pub selected_section: usize,
    pub selected_row: usize,
    pub selected_item: usize,
}

impl App {
    pub fn new(config: AppConfig, service: Arc<dyn MediaService>) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        let screen = Rc::new(RefCell::new(BrowseScreen::default()));

        let mut presenter = BrowsePresenter::new(service, events.sender());
        presenter.register(Box::new(SharedScreen(Rc::clone(&screen))));
        presenter.set_navigator(Box::new(TerminalNavigator::new(Rc::clone(&screen))));
        presenter.on_init_done();

        let selected_section = presenter
            .registry()
            .position(config.default_section)
            .unwrap_or(0);

        Self {
            running: true,
            events,
            config,
            presenter,
            screen,
            mode: AppMode::Normal,
            pane: Pane::Sections,
            show_help: false,
            command_input: String::new(),
            selected_section,
            selected_row: 0,
            selected_item: 0,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.focus_selected();

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => match event {
                    crossterm::event::Event::Key(key)
                        if key.kind == crossterm::event::KeyEventKind::Press =>
                    {
                        self.handle_key_event(key);
                    }
                    crossterm::event::Event::FocusGained => self.presenter.on_view_resumed(),
                    _ => {}
                },
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }

        self.presenter.shutdown();
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn tick(&self) {}

    // -- Selection ----------------------------------------------------------

    pub fn current_section(&self) -> Option<Arc<Section>> {
        self.presenter
            .registry()
            .iter()
            .nth(self.selected_section)
            .cloned()
    }

    fn current_rows_len(&self) -> usize {
        let Some(section) = self.current_section() else {
            return 0;
        };
        self.screen
            .borrow()
            .section(section.id)
            .map_or(0, |s| s.rows.len())
    }

    pub fn current_row(&self) -> Option<VideoGroup> {
        let section = self.current_section()?;
        let screen = self.screen.borrow();
        screen.section(section.id)?.rows.get(self.selected_row).cloned()
    }

    fn current_video(&self) -> Option<Video> {
        self.current_row()?.videos.get(self.selected_item).cloned()
    }

    fn select_section(&mut self, index: usize) {
        let count = self.presenter.registry().len();
        if count == 0 || index >= count || index == self.selected_section {
            return;
        }
        self.selected_section = index;
        self.focus_selected();
    }

    fn focus_selected(&mut self) {
        self.selected_row = 0;
        self.selected_item = 0;
        if let Some(section) = self.current_section() {
            self.events.send(AppEvent::Focus(Focus::Section(section.id)));
        }
    }

    fn move_row(&mut self, down: bool) {
        let count = self.current_rows_len();
        if down {
            if self.selected_row + 1 < count {
                self.selected_row += 1;
            }
        } else {
            self.selected_row = self.selected_row.saturating_sub(1);
        }
        self.selected_item = 0;
    }

    fn move_item_right(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        if self.selected_item + 1 < row.videos.len() {
            self.selected_item += 1;
        } else {
            // Reached the end of the row: ask for more.
            self.presenter.on_scroll_end(&row);
        }
    }

    fn move_item_left(&mut self) {
        if self.selected_item == 0 {
            self.pane = Pane::Sections;
        } else {
            self.selected_item -= 1;
        }
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else if self.screen.borrow().details.is_some() {
                    self.screen.borrow_mut().details = None;
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Sections => Pane::Rows,
                    Pane::Rows => Pane::Sections,
                };
            }
            KeyCode::Char('r') => self.events.send(AppEvent::Refresh),
            KeyCode::Char('?') => self.events.send(AppEvent::ToggleHelp),
            KeyCode::Char(':') => {
                self.mode = AppMode::Command;
                self.command_input.clear();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(index) = section_shortcut(c) {
                    self.select_section(index);
                }
            }
            _ => match self.pane {
                Pane::Sections => self.handle_sections_key(key),
                Pane::Rows => self.handle_rows_key(key),
            },
        }
    }

    fn handle_sections_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_section(self.selected_section + 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(prev) = self.selected_section.checked_sub(1) {
                    self.select_section(prev);
                }
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                self.pane = Pane::Rows;
            }
            _ => {}
        }
    }

    fn handle_rows_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_row(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_row(false),
            KeyCode::Char('l') | KeyCode::Right => self.move_item_right(),
            KeyCode::Char('h') | KeyCode::Left => self.move_item_left(),
            KeyCode::Char('n') => {
                if let Some(row) = self.current_row() {
                    self.presenter.on_scroll_end(&row);
                }
            }
            KeyCode::Enter => {
                if let Some(video) = self.current_video() {
                    self.presenter.on_video_item_clicked(&video);
                }
            }
            KeyCode::Char('d') => {
                if let Some(video) = self.current_video() {
                    self.presenter.on_video_item_long_clicked(&video);
                }
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.execute_command();
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = self.command_input.clone();
        match command::parse_command(&input) {
            Some(Command::Section(kind)) => {
                let index = self.presenter.registry().position(kind);
                if let Some(index) = index {
                    self.select_section(index);
                }
            }
            Some(Command::Refresh) => self.events.send(AppEvent::Refresh),
            Some(Command::More) => {
                if let Some(row) = self.current_row() {
                    self.presenter.on_scroll_end(&row);
                }
            }
            Some(Command::Help) => self.events.send(AppEvent::ToggleHelp),
            Some(Command::Quit) => self.events.send(AppEvent::Quit),
            None => {
                self.screen.borrow_mut().status_message = Some(format!("Unknown command: {input}"));
            }
        }
        self.command_input.clear();
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::Focus(focus) => self.presenter.focus_section(focus),
            AppEvent::Refresh => {
                self.selected_row = 0;
                self.selected_item = 0;
                self.presenter.refresh();
            }
            AppEvent::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            AppEvent::Browse(event) => {
                self.presenter.handle_event(event);
                self.clamp_selection();
            }
        }
    }

    /// Keep the row/item cursor inside the current section's content.
    fn clamp_selection(&mut self) {
        let rows = self.current_rows_len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        let items = self.current_row().map_or(0, |r| r.videos.len());
        self.selected_item = self.selected_item.min(items.saturating_sub(1));
    }
}

/// Number keys jump to a section; `1` is the first one.
fn section_shortcut(c: char) -> Option<usize> {
    match c {
        '1'..='7' => Some((c as u8 - b'1') as usize),
        _ => None,
    }
}
