//! Tabular files and canonical project directories

pub mod io;
pub mod paths;

pub use io::{read_csv, write_csv};
pub use paths::ProjectPaths;
