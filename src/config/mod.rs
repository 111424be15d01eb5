//! Configuration management for the XOXO tiling compiler

pub mod settings;

pub use settings::{
    Settings, BoardConfig, SolverConfig, EncodingConfig, OutputConfig,
    AtMostOneEncoding, OutputFormat, CliOverrides, SolverBackend
};
