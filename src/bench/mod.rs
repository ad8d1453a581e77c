pub mod bench_model;
pub mod runner;
