use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::client::error::ActionError;
use crate::client::request::{MovieAction, MovieId, MovieRequest};
use crate::client::transport::Transport;
use crate::page::page_model::{Document, ElementStyle, Navigation, Page};
use crate::toggle::visibility::{ToggleMode, toggle_visibility};
use crate::trace::logger::ActionJournal;
use crate::trace::trace::{ActionEvent, ActionEventKind};

// ============================================================================
// Options
// ============================================================================

/// Server paths the actions talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_add")]
    pub add: String,
    /// Where the page goes after an action.
    #[serde(default = "default_listing")]
    pub listing: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            delete: default_delete(),
            edit: default_edit(),
            add: default_add(),
            listing: default_listing(),
        }
    }
}

fn default_delete() -> String { "/movies/delete".to_string() }
fn default_edit() -> String { "/movies/edit".to_string() }
fn default_add() -> String { "/movies/add".to_string() }
fn default_listing() -> String { "/movies".to_string() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Wait for the server before confirming or navigating.
    #[default]
    Await,
    /// Spawn the request and move on without looking at the response.
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NavigatePolicy {
    /// Navigate only once the server accepted the change.
    #[default]
    OnSuccess,
    /// Navigate whatever happened to the request.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    #[default]
    Reload,
    Redirect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub dispatch: DispatchMode,
    #[serde(default)]
    pub navigate: NavigatePolicy,
    #[serde(default)]
    pub navigation: NavigationKind,
    /// Alert "<movie> deleted" (etc.) before navigating.
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub toggle_mode: ToggleMode,
}

// ============================================================================
// Outcome
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Server answered with a 2xx status.
    Confirmed(u16),
    /// Request failed but the page navigated anyway.
    Failed(String),
    /// Request was spawned; nobody waits for the answer.
    Detached,
}

#[derive(Debug)]
pub struct ActionOutcome {
    pub request: MovieRequest,
    pub delivery: Delivery,
    pub navigation: Option<Navigation>,
    /// The spawned request of a detached dispatch. Dropping it does not
    /// cancel the request.
    pub pending: Option<JoinHandle<()>>,
}

// ============================================================================
// Client
// ============================================================================

/// Issues the movie mutations and drives the page afterwards.
pub struct MovieActionClient<T: Transport + 'static> {
    transport: Arc<T>,
    options: ClientOptions,
    journal: Arc<ActionJournal>,
}

impl<T: Transport + 'static> MovieActionClient<T> {
    pub fn new(transport: T, options: ClientOptions) -> Self {
        Self {
            transport: Arc::new(transport),
            options,
            journal: Arc::new(ActionJournal::disabled()),
        }
    }

    pub fn with_journal(mut self, journal: ActionJournal) -> Self {
        self.journal = Arc::new(journal);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn build_request(
        &self,
        action: MovieAction,
        movie: &MovieId,
    ) -> Result<MovieRequest, ActionError> {
        let endpoints = &self.options.endpoints;
        match action {
            MovieAction::Delete => MovieRequest::json(action.method(), &endpoints.delete, movie),
            MovieAction::Update => MovieRequest::json(action.method(), &endpoints.edit, movie),
            MovieAction::Add => Ok(MovieRequest::form(action.method(), &endpoints.add, movie)),
        }
    }

    pub async fn delete_movie<P: Page + ?Sized>(
        &self,
        page: &mut P,
        movie: impl Into<MovieId>,
    ) -> Result<ActionOutcome, ActionError> {
        self.perform(page, MovieAction::Delete, movie.into()).await
    }

    pub async fn update_movie<P: Page + ?Sized>(
        &self,
        page: &mut P,
        movie: impl Into<MovieId>,
    ) -> Result<ActionOutcome, ActionError> {
        self.perform(page, MovieAction::Update, movie.into()).await
    }

    pub async fn add_movie<P: Page + ?Sized>(
        &self,
        page: &mut P,
        movie: impl Into<MovieId>,
    ) -> Result<ActionOutcome, ActionError> {
        self.perform(page, MovieAction::Add, movie.into()).await
    }

    /// Toggle an element using the configured [`ToggleMode`].
    pub fn toggle_visibility<D: Document + ?Sized>(
        &self,
        document: &mut D,
        element_id: &str,
    ) -> Result<ElementStyle, ActionError> {
        let style = toggle_visibility(document, element_id, self.options.toggle_mode)?;
        self.journal.log(&ActionEvent::now(ActionEventKind::Toggled {
            element: element_id.to_string(),
            style: style.clone(),
        }));
        Ok(style)
    }

    pub async fn perform<P: Page + ?Sized>(
        &self,
        page: &mut P,
        action: MovieAction,
        movie: MovieId,
    ) -> Result<ActionOutcome, ActionError> {
        let request = self.build_request(action, &movie)?;

        match self.options.dispatch {
            DispatchMode::Detached => {
                let pending = self.spawn_detached(action, &movie, &request)?;
                let mut outcome = self.finish(page, action, &movie, request, Delivery::Detached);
                outcome.pending = Some(pending);
                Ok(outcome)
            }
            DispatchMode::Await => {
                self.journal
                    .log(&ActionEvent::dispatched(&request, false).for_movie(action, &movie));
                tracing::debug!(
                    method = request.method.as_str(),
                    path = %request.path,
                    body = %request.body,
                    "sending request"
                );

                match self.send_checked(&request).await {
                    Ok(status) => {
                        tracing::info!(%movie, status, "movie {}", action.past_tense());
                        self.journal.log(
                            &ActionEvent::now(ActionEventKind::Responded { status })
                                .for_movie(action, &movie),
                        );
                        Ok(self.finish(page, action, &movie, request, Delivery::Confirmed(status)))
                    }
                    Err(err) => {
                        tracing::warn!(%movie, error = %err, "failed to {} movie", action.verb());
                        self.journal.log(
                            &ActionEvent::now(ActionEventKind::Failed {
                                reason: err.to_string(),
                            })
                            .for_movie(action, &movie),
                        );

                        match self.options.navigate {
                            NavigatePolicy::Always => {
                                let delivery = Delivery::Failed(err.to_string());
                                Ok(self.finish(page, action, &movie, request, delivery))
                            }
                            NavigatePolicy::OnSuccess => {
                                page.alert(&format!(
                                    "{} could not be {}: {}",
                                    movie,
                                    action.past_tense(),
                                    err
                                ));
                                Err(err)
                            }
                        }
                    }
                }
            }
        }
    }

    /// Send and turn a non-2xx status into an error.
    async fn send_checked(&self, request: &MovieRequest) -> Result<u16, ActionError> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response.status)
        } else {
            Err(ActionError::RequestRejected {
                method: request.method.as_str().into(),
                path: request.path.clone(),
                status: response.status,
            })
        }
    }

    fn spawn_detached(
        &self,
        action: MovieAction,
        movie: &MovieId,
        request: &MovieRequest,
    ) -> Result<JoinHandle<()>, ActionError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| ActionError::Transport {
            method: request.method.as_str().into(),
            path: request.path.clone(),
            message: format!("no async runtime for detached dispatch: {}", e),
        })?;

        self.journal
            .log(&ActionEvent::dispatched(request, true).for_movie(action, movie));
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            "dispatching detached request"
        );

        let transport = Arc::clone(&self.transport);
        let journal = Arc::clone(&self.journal);
        let request = request.clone();
        let movie = movie.to_string();

        Ok(handle.spawn(async move {
            let kind = match transport.send(&request).await {
                Ok(response) if response.is_success() => {
                    tracing::info!(%movie, status = response.status, "detached request completed");
                    ActionEventKind::Responded { status: response.status }
                }
                Ok(response) => {
                    tracing::warn!(%movie, status = response.status, "detached request rejected");
                    ActionEventKind::Failed {
                        reason: format!("status {}", response.status),
                    }
                }
                Err(err) => {
                    tracing::warn!(%movie, error = %err, "detached request failed");
                    ActionEventKind::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            journal.log(&ActionEvent::now(kind).for_movie(action, movie));
        }))
    }

    /// Confirm (if enabled) and navigate to the listing.
    fn finish<P: Page + ?Sized>(
        &self,
        page: &mut P,
        action: MovieAction,
        movie: &MovieId,
        request: MovieRequest,
        delivery: Delivery,
    ) -> ActionOutcome {
        if self.options.confirm {
            page.alert(&format!("{} {}", movie, action.past_tense()));
        }

        let navigation = match self.options.navigation {
            NavigationKind::Reload => Navigation::Reload,
            NavigationKind::Redirect => {
                Navigation::Redirect(self.options.endpoints.listing.clone())
            }
        };
        page.navigate(&navigation);
        tracing::debug!(?navigation, "navigated");
        self.journal.log(
            &ActionEvent::now(ActionEventKind::Navigated {
                navigation: navigation.clone(),
            })
            .for_movie(action, movie),
        );

        ActionOutcome {
            request,
            delivery,
            navigation: Some(navigation),
            pending: None,
        }
    }
}
