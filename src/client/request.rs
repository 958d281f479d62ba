use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::error::ActionError;

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Opaque movie identifier, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Number(n) => write!(f, "{}", n),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        MovieId::Text(value.to_string())
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        MovieId::Text(value)
    }
}

impl From<i64> for MovieId {
    fn from(value: i64) -> Self {
        MovieId::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    Put,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// The mutating actions the listing page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieAction {
    Delete,
    Update,
    Add,
}

impl MovieAction {
    pub fn method(&self) -> HttpMethod {
        match self {
            MovieAction::Delete => HttpMethod::Delete,
            MovieAction::Update => HttpMethod::Put,
            MovieAction::Add => HttpMethod::Post,
        }
    }

    /// Past tense used in confirmation messages ("Inception deleted").
    pub fn past_tense(&self) -> &'static str {
        match self {
            MovieAction::Delete => "deleted",
            MovieAction::Update => "updated",
            MovieAction::Add => "added",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            MovieAction::Delete => "delete",
            MovieAction::Update => "update",
            MovieAction::Add => "add",
        }
    }
}

#[derive(Serialize)]
struct MoviePayload<'a> {
    movie: &'a MovieId,
}

/// A fully encoded request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRequest {
    pub method: HttpMethod,
    pub path: String,
    pub content_type: &'static str,
    pub body: String,
}

impl MovieRequest {
    /// `{"movie": <id>}` as JSON.
    pub fn json(method: HttpMethod, path: &str, movie: &MovieId) -> Result<Self, ActionError> {
        let body = serde_json::to_string(&MoviePayload { movie })?;
        Ok(Self {
            method,
            path: path.to_string(),
            content_type: JSON_CONTENT_TYPE,
            body,
        })
    }

    /// `movie=<id>` as a url-encoded form, the shape of the add form.
    pub fn form(method: HttpMethod, path: &str, movie: &MovieId) -> Self {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("movie", &movie.to_string())
            .finish();
        Self {
            method,
            path: path.to_string(),
            content_type: FORM_CONTENT_TYPE,
            body,
        }
    }
}
