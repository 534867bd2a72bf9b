//! `folio render`: draw one chart or diagram source file to stdout.

use std::fs;

use anyhow::{Context, Result};

use crate::chart;
use crate::cli::RenderArgs;
use crate::diagram::{self, LayeredLayout};

/// Render `args.file` to an SVG string.
///
/// `--flow` selects the diagram engine; otherwise the file is chart text
/// and `--chart` (or the `type:` line) picks the kind.
pub fn render_file(args: &RenderArgs) -> Result<String> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    if args.flow {
        let svg = diagram::render_diagram(&text, args.dir, &LayeredLayout::default())
            .with_context(|| format!("Failed to lay out {}", args.file.display()))?;
        return Ok(svg.to_svg());
    }
    Ok(chart::render_chart(&text, args.chart.as_deref()).to_svg())
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    println!("{}", render_file(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::Direction;
    use tempfile::TempDir;

    fn args(dir: &TempDir, name: &str, text: &str) -> RenderArgs {
        let file = dir.path().join(name);
        fs::write(&file, text).unwrap();
        RenderArgs {
            file,
            chart: None,
            flow: false,
            dir: None,
        }
    }

    #[test]
    fn test_render_chart_kind() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "sales.csv", ",Q1,Q2\nA,1,2\nB,3,4\n");
        args.chart = Some("radar".into());
        let svg = render_file(&args).unwrap();
        assert!(svg.contains("Unknown: radar"));

        args.chart = Some("pie".into());
        assert!(render_file(&args).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_render_flow() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "g.flow", "[Start] -> [End]\n");
        args.flow = true;
        args.dir = Some(Direction::LeftToRight);
        let svg = render_file(&args).unwrap();
        assert!(svg.contains("Start"));
        assert!(svg.contains("data-from"));
    }

    #[test]
    fn test_render_missing_file() {
        let dir = TempDir::new().unwrap();
        let args = RenderArgs {
            file: dir.path().join("nope.txt"),
            chart: None,
            flow: false,
            dir: None,
        };
        assert!(render_file(&args).is_err());
    }
}
