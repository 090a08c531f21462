//! Man page backend for document browsers.
//!
//! Builds a catalog → section → page tree for a man page directory, renders
//! pages to transient HTML files and extracts single sections (e.g.
//! DESCRIPTION) from formatted page text.
//!
//! Layers, inner to outer: [`domain`] (trees, listings, section extraction),
//! [`application`] (the [`application::Catalog`]), [`infrastructure`]
//! (I/O traits, the `man` provider), [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
