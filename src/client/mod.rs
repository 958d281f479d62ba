pub mod actions;
pub mod error;
pub mod request;
pub mod transport;
