use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};
use tokio::sync::mpsc;

use crate::auth::token;
use crate::browse::adapter::{SignInData, VideoGroup};
use crate::browse::section::{Section, SectionId, SectionRegistry};
use crate::browse::view::BrowseView;
use crate::browse::{BrowsePresenter, Focus};
use crate::catalog::MediaService;
use crate::catalog::http::HttpCatalogClient;
use crate::catalog::types::CatalogKind;
use crate::config::load_config;
use crate::event::{AppEvent, Event};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "tvbrowse", about = "Browse a video catalog from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// List the browse sections (JSONL)
    Sections,
    /// Load one section and print its rows (JSONL)
    Fetch {
        /// Section name, title, or numeric id
        section: String,
        /// Extra pages to load for every row that has more
        #[arg(long, default_value_t = 0)]
        pages: usize,
    },
    /// Store an access token for signed-in sections
    Signin {
        /// Bearer token issued by the catalog service
        token: String,
    },
    /// Remove the stored access token
    Signout,
}

// ---------------------------------------------------------------------------
// Headless view
// ---------------------------------------------------------------------------

/// Writes every header update as one JSON line and remembers the rows it has
/// seen so later pages can be requested.
struct JsonlView<W: Write> {
    out: W,
    rows: Rc<RefCell<Vec<VideoGroup>>>,
}

impl<W: Write> JsonlView<W> {
    fn emit(&mut self, value: serde_json::Value) {
        if let Err(e) = writeln!(self.out, "{value}") {
            tracing::warn!("failed to write output: {e}");
        }
    }
}

impl<W: Write> BrowseView for JsonlView<W> {
    fn show_progress_bar(&mut self, show: bool) {
        tracing::debug!(show, "progress");
    }

    fn clear_header(&mut self, section: &Section) {
        tracing::debug!(section = %section.title, "clear");
        self.rows.borrow_mut().clear();
    }

    fn update_header(&mut self, group: VideoGroup) {
        if group.is_placeholder() {
            return;
        }
        self.emit(serde_json::json!({
            "section": group.section.catalog,
            "title": &group.title,
            "continuation": group.continuation,
            "has_more": group.media_group.as_ref().is_some_and(|g| g.next_page.is_some()),
            "videos": &group.videos,
        }));

        let mut rows = self.rows.borrow_mut();
        match rows
            .iter_mut()
            .find(|r| group.continuation && r.title == group.title)
        {
            Some(row) => row.media_group = group.media_group,
            None => rows.push(group),
        }
    }

    fn update_header_if_empty(&mut self, data: SignInData) {
        if !self.rows.borrow().is_empty() {
            return;
        }
        self.emit(serde_json::json!({
            "section": data.section.catalog,
            "sign_in": { "title": data.title, "message": data.message },
        }));
    }
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

/// Resolve a section by catalog name, title, or numeric id.
fn resolve_section(registry: &SectionRegistry, name: &str) -> eyre::Result<Arc<Section>> {
    let by_id = name
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| registry.get(SectionId(id)));
    by_id
        .or_else(|| registry.find_by_name(name))
        .cloned()
        .ok_or_else(|| {
            let known: Vec<&str> = CatalogKind::ALL.iter().map(|k| k.as_str()).collect();
            eyre!("unknown section `{name}` (expected one of: {})", known.join(", "))
        })
}

/// Feed worker messages to the presenter until both task slots are idle.
pub(crate) async fn pump(presenter: &mut BrowsePresenter, rx: &mut mpsc::UnboundedReceiver<Event>) {
    while presenter.is_busy() {
        match rx.recv().await {
            Some(Event::App(event)) => {
                if let AppEvent::Browse(event) = *event {
                    presenter.handle_event(event);
                }
            }
            Some(_) => {}
            None => break,
        }
    }
}

/// Load `section` through a presenter with no terminal attached, then walk
/// up to `pages` further pages of every row, writing JSONL to `out`.
async fn fetch_section<W: Write + 'static>(
    service: Arc<dyn MediaService>,
    section: &str,
    pages: usize,
    out: W,
) -> eyre::Result<()> {
    let (sender, mut rx) = mpsc::unbounded_channel();
    let mut presenter = BrowsePresenter::new(service, sender);
    let section = resolve_section(presenter.registry(), section)?;

    let rows = Rc::new(RefCell::new(Vec::new()));
    presenter.register(Box::new(JsonlView {
        out,
        rows: Rc::clone(&rows),
    }));

    presenter.focus_section(Focus::Section(section.id));
    pump(&mut presenter, &mut rx).await;

    for page in 0..pages {
        let pending: Vec<VideoGroup> = rows
            .borrow()
            .iter()
            .filter(|r| r.media_group.as_ref().is_some_and(|g| g.next_page.is_some()))
            .cloned()
            .collect();
        if pending.is_empty() {
            tracing::debug!(page, "no rows with more pages");
            break;
        }
        for row in &pending {
            presenter.on_scroll_end(row);
            pump(&mut presenter, &mut rx).await;
        }
    }

    presenter.shutdown();
    Ok(())
}

fn print_sections() -> eyre::Result<()> {
    for section in SectionRegistry::initialize().iter() {
        println!("{}", serde_json::to_string(section.as_ref())?);
    }
    Ok(())
}

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::Sections => print_sections()?,

        CliCommand::Fetch { section, pages } => {
            crate::auth::load_env_files();
            let config = load_config();
            let client = HttpCatalogClient::new(&config.base_url)?;
            fetch_section(Arc::new(client), &section, pages, std::io::stdout()).await?;
        }

        CliCommand::Signin {
            token: access_token,
        } => {
            token::save_token(&access_token)?;
            println!("Token saved to {}", token::token_path().display());
        }

        CliCommand::Signout => {
            if token::clear_token()? {
                println!("Signed out.");
            } else {
                println!("No stored token.");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
