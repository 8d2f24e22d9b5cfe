//! Core library for the `noise-machine` server.
//!
//! A small HTTP control panel that starts and stops a looping ambient-noise
//! player through an external command, tracks it with a pid marker file, and
//! adjusts the output level through the system mixer. The binary wires these
//! pieces together; the library exposes them so the server can be driven
//! in-process with fake process and mixer backends.
pub mod args;
pub mod config;
pub mod download;
pub mod error;
pub mod playback;
pub mod server;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod volume;
