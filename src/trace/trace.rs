use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    client::request::{MovieAction, MovieRequest},
    page::page_model::{ElementStyle, Navigation},
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActionEventKind {
    Dispatched {
        method: String,
        path: String,
        body: String,
        detached: bool,
    },
    Responded {
        status: u16,
    },
    Failed {
        reason: String,
    },
    Navigated {
        navigation: Navigation,
    },
    Toggled {
        element: String,
        style: ElementStyle,
    },
}

/// One line of the action journal.
#[derive(Debug, Clone, Serialize)]
pub struct ActionEvent {
    pub timestamp_ms: u128,

    pub action: Option<MovieAction>,
    pub movie: Option<String>,

    #[serde(flatten)]
    pub kind: ActionEventKind,
}

impl ActionEvent {
    pub fn now(kind: ActionEventKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            action: None,
            movie: None,
            kind,
        }
    }

    pub fn dispatched(request: &MovieRequest, detached: bool) -> Self {
        Self::now(ActionEventKind::Dispatched {
            method: request.method.as_str().to_string(),
            path: request.path.clone(),
            body: request.body.clone(),
            detached,
        })
    }

    pub fn for_movie(mut self, action: MovieAction, movie: impl ToString) -> Self {
        self.action = Some(action);
        self.movie = Some(movie.to_string());
        self
    }
}
