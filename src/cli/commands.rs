use std::path::Path;
use std::time::Duration;

use crate::cli::config::{
    AppConfig, BehaviorArgs, Cli, build_client_options, resolve_base_url, resolve_journal,
};
use crate::client::actions::{ActionOutcome, Delivery, MovieActionClient};
use crate::client::request::{MovieAction, MovieId};
use crate::client::transport::HttpTransport;
use crate::page::memory::MemoryPage;
use crate::page::page_model::Navigation;
use crate::toggle::visibility::{ToggleMode, toggle_visibility};
use crate::trace::logger::ActionJournal;
use crate::trace::trace::{ActionEvent, ActionEventKind};

// ============================================================================
// delete / update / add subcommands
// ============================================================================

/// Run one movie action against the server. Returns whether the server
/// confirmed the change (detached requests count as confirmed).
pub async fn cmd_action(
    cli: &Cli,
    config: &AppConfig,
    action: MovieAction,
    movie: &str,
    behavior: &BehaviorArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let options = build_client_options(config, behavior, None);
    let timeout = config.server.timeout_secs.map(Duration::from_secs);
    let transport = HttpTransport::new(resolve_base_url(cli, config), timeout)?;
    let client = MovieActionClient::new(transport, options)
        .with_journal(build_journal(cli, config));

    let mut page = load_page(cli.page.as_deref())?;

    if cli.verbose > 0 {
        eprintln!(
            "{} {} ({})...",
            action.method().as_str(),
            movie,
            client.transport().base_url()
        );
    }

    let result = client
        .perform(&mut page, action, MovieId::from(movie))
        .await;

    // Alerts and navigations happened even when the action failed.
    print_page_activity(&page);
    if let Some(path) = cli.page.as_deref() {
        page.save(Path::new(path))?;
    }

    let mut outcome = result?;
    print_outcome(&outcome);

    // The page has already moved on; only keep the process alive until the
    // detached request is done.
    if let Some(pending) = outcome.pending.take() {
        if let Err(e) = pending.await {
            tracing::warn!(error = %e, "detached request task did not finish");
        }
    }

    Ok(!matches!(outcome.delivery, Delivery::Failed(_)))
}

// ============================================================================
// toggle subcommand
// ============================================================================

pub fn cmd_toggle(
    cli: &Cli,
    config: &AppConfig,
    element: &str,
    mode: Option<ToggleMode>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli
        .page
        .as_deref()
        .ok_or("toggle needs a page file (--page <file>)")?;

    let mode = mode.unwrap_or(config.toggle.mode);
    let journal = build_journal(cli, config);

    let mut page = MemoryPage::load(Path::new(path))?;
    let style = toggle_visibility(&mut page, element, mode)?;
    journal.log(&ActionEvent::now(ActionEventKind::Toggled {
        element: element.to_string(),
        style: style.clone(),
    }));
    page.save(Path::new(path))?;

    println!(
        "{}: visibility={:?} display={}",
        element,
        style.visibility,
        if style.display.as_css().is_empty() { "(unset)" } else { style.display.as_css() }
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_journal(cli: &Cli, config: &AppConfig) -> ActionJournal {
    match resolve_journal(cli, config) {
        Some(path) => ActionJournal::new(Path::new(path)),
        None => ActionJournal::disabled(),
    }
}

/// Load the page file if one was given and exists, otherwise start blank.
pub fn load_page(path: Option<&str>) -> Result<MemoryPage, Box<dyn std::error::Error>> {
    match path {
        Some(p) if Path::new(p).exists() => Ok(MemoryPage::load(Path::new(p))?),
        _ => Ok(MemoryPage::default()),
    }
}

fn print_page_activity(page: &MemoryPage) {
    for alert in &page.alerts {
        println!("[alert] {}", alert);
    }
    for navigation in &page.history {
        println!("[navigate] {}", describe_navigation(navigation));
    }
}

fn print_outcome(outcome: &ActionOutcome) {
    match &outcome.delivery {
        Delivery::Confirmed(status) => println!(
            "{} {} -> {}",
            outcome.request.method.as_str(),
            outcome.request.path,
            status
        ),
        Delivery::Failed(reason) => println!(
            "{} {} failed: {}",
            outcome.request.method.as_str(),
            outcome.request.path,
            reason
        ),
        Delivery::Detached => println!(
            "{} {} dispatched",
            outcome.request.method.as_str(),
            outcome.request.path
        ),
    }
}

pub fn describe_navigation(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Reload => "reload".to_string(),
        Navigation::Redirect(path) => format!("redirect {}", path),
    }
}
