// Domain layer: plain data types and ports. No I/O; clap derives only behind the `cli` feature.

pub mod levels;
pub mod model;
pub mod ports;
