pub mod capture;
pub mod document;
pub mod page_model;
pub mod snapshot;
