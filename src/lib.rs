//! Pokedex TUI - browse PokeAPI from the terminal
//!
//! The library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod audio;
pub mod catalog;
pub mod columns;
pub mod components;
pub mod display;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod state;
