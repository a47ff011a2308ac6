pub mod args;
pub mod bench;
