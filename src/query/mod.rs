pub mod css;
pub mod resolve;
pub mod xpath;
