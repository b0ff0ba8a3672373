//! `Taskboard`: terminal task dashboard library.
//!
//! The core ([`tasks`], [`store`], [`notify`]) holds all dashboard logic and
//! knows nothing about the terminal; [`app`] and [`ui`] drive it from a
//! ratatui event loop.

pub mod app;
pub mod config;
pub mod net;
pub mod notify;
pub mod store;
pub mod tasks;
pub mod ui;
