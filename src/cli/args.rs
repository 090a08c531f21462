//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Browse man page catalogs: list, render and extract sections
#[derive(Parser, Debug)]
#[command(name = "manview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// A single page in a catalog location.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Man page directory (MANPATH entry)
    #[arg(value_hint = ValueHint::DirPath)]
    pub location: PathBuf,
    /// Category, e.g. manual section "1"
    pub category: String,
    /// Page name
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the catalog tree of a location
    Tree {
        /// Man page directory (MANPATH entry)
        #[arg(value_hint = ValueHint::DirPath)]
        location: PathBuf,
    },

    /// Render a page as HTML
    Render {
        #[command(flatten)]
        page: PageArgs,
        /// Terminal width to format for
        #[arg(short, long)]
        width: Option<u16>,
        /// Write the page to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the one-line description of a page
    Brief {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Print the DESCRIPTION section of a page
    Details {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Print one section of a page
    Section {
        #[command(flatten)]
        page: PageArgs,
        /// Section heading, e.g. "SYNOPSIS"
        section: String,
    },

    /// List the section headings of a page
    Sections {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
