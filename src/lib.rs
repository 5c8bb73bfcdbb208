//! Earth Defender: a spaceship orbits a planet and shoots down incoming asteroids.
//!
//! The simulation core ([`types`], [`timer`], [`entities`], [`engine`]) is pure and
//! infallible. [`terminal_io`], [`rendering`] and [`game`] wrap it in a crossterm
//! front-end.

pub mod config;
pub mod constants;
pub mod engine;
pub mod entities;
pub mod error;
pub mod game;
pub mod rendering;
pub mod terminal_io;
pub mod timer;
pub mod types;
