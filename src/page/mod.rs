pub mod memory;
pub mod page_model;
