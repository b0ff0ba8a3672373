//! Shared task model and wire vocabulary for `Taskboard`.

pub mod rest;
pub mod task;
