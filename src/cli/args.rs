//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::content::SortOrder;
use crate::markdown::Direction;

/// Portfolio document pipeline: discovery, parsing, charts and diagrams
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: search upward for folio.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Discover, parse and hydrate every document into HTML fragments
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// List documents with portfolio filters applied
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },

    /// Render a chart or flow diagram source file to SVG on stdout
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Write the content manifest
    #[command(visible_alias = "m")]
    Manifest,
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Search text or command (show:drafts, show:archive, reveal:<id>)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only documents in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Sort order: default, date or alpha
    #[arg(long, default_value = "default")]
    pub sort: SortOrder,

    /// Print JSON instead of a table
    #[arg(short, long)]
    pub json: bool,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Source file (chart table or flow diagram text)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Chart kind (bar, hbar, line, area, stacked, pie, donut, scatter)
    #[arg(long, conflicts_with = "flow")]
    pub chart: Option<String>,

    /// Treat the file as a flow diagram
    #[arg(long)]
    pub flow: bool,

    /// Diagram direction (TB or LR)
    #[arg(long, requires = "flow", value_parser = parse_direction)]
    pub dir: Option<Direction>,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::from_token(s).ok_or_else(|| format!("unknown direction `{s}` (expected TB or LR)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from(["folio", "query", "--sort", "date", "-s", "show:drafts"]).unwrap();
        match cli.command {
            Commands::Query { args } => {
                assert_eq!(args.sort, SortOrder::Date);
                assert_eq!(args.search, "show:drafts");
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_render_flow() {
        let cli = Cli::try_parse_from(["folio", "render", "g.flow", "--flow", "--dir", "lr"]).unwrap();
        match cli.command {
            Commands::Render { args } => {
                assert!(args.flow);
                assert_eq!(args.dir, Some(Direction::LeftToRight));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["folio", "render", "g.flow", "--dir", "LR"]).is_err());
        assert!(Cli::try_parse_from(["folio", "render", "g", "--flow", "--chart", "pie"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["folio", "manifest", "--verbose", "-C", "site.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
    }
}
