//! blokctl: Storyblok companion library
//!
//! Layers, innermost first: `domain` (content model and component
//! extraction), `application` (services), `infrastructure` (I/O and wiring),
//! `cli` (argument parsing and rendering).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
