//! Headless core of a local video player: library discovery over a media
//! index, per-file playback state in SQLite, JSON-backed preferences, and the
//! reactive view models a UI renders from.

pub mod config;
pub mod constants;
pub mod core;
pub mod data;
pub mod datastore;
pub mod db;
pub mod domain;
pub mod media;
pub mod player;

#[cfg(test)]
mod test_utils;

pub use config::Config;
