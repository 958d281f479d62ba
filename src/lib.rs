//! Client for the movie list web application.
//!
//! The browser-side actions of the listing page (delete, edit, add a movie
//! and show or hide an element) expressed against injected capabilities:
//! a [`page::page_model::Page`] for element styles and navigation, and a
//! [`client::transport::Transport`] for the HTTP calls.

pub mod cli;
pub mod client;
pub mod page;
pub mod toggle;
pub mod trace;

pub use client::actions::{ActionOutcome, ClientOptions, Delivery, MovieActionClient};
pub use client::error::ActionError;
pub use client::request::{MovieAction, MovieId, MovieRequest};
pub use page::memory::MemoryPage;
pub use toggle::visibility::{ToggleMode, toggle_visibility};
