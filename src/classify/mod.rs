pub mod attributes;
pub mod capability;
pub mod visibility;
