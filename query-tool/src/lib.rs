#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod types;
