//! Developer diagnostics (feature `bench`).

pub mod bench;
