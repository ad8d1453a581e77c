pub mod builder;
pub mod tree_model;
