//! Chart source text and the per-kind data adapters.
//!
//! ```text
//! title: Quarterly revenue
//! description: In thousands
//!
//! Region, Q1, Q2, Q3
//! North, 10, 20, 30
//! South, 12, 18, 25
//! ```
//!
//! Leading `key: value` lines are metadata. Everything after the first
//! non-metadata line is a comma-separated table whose first row is the
//! header.

use std::sync::LazyLock;

use regex::Regex;

static META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*:\s*(.+)$").expect("valid regex"));

/// Raw metadata plus table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSource {
    /// Lowercased keys, in source order.
    pub meta: Vec<(String, String)>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChartSource {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.meta("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.meta("description")
    }
}

/// Split chart text into metadata, header and rows. Blank lines are ignored.
pub fn parse_source(text: &str) -> ChartSource {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut source = ChartSource::default();
    let mut start = lines.len();
    for (i, line) in lines.iter().enumerate() {
        match META.captures(line) {
            Some(caps) => source
                .meta
                .push((caps[1].to_lowercase(), caps[2].trim().to_string())),
            None => {
                start = i;
                break;
            }
        }
    }

    let mut table = lines[start..]
        .iter()
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect());
    source.header = table.next().unwrap_or_default();
    source.rows = table.collect();
    source
}

/// Numeric cell. Empty and non-numeric cells are `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// Adapters
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// Value at `index`, missing cells counting as zero.
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().flatten().unwrap_or(0.0)
    }

    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Category labels plus named value series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl SeriesData {
    pub fn from_source(source: &ChartSource) -> Self {
        Self {
            categories: source.header.iter().skip(1).cloned().collect(),
            series: source
                .rows
                .iter()
                .map(|row| Series {
                    label: row.first().cloned().unwrap_or_default(),
                    values: row.iter().skip(1).map(|c| parse_number(c)).collect(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.series.is_empty()
    }

    /// Every numeric value across all series.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
    }

    /// Per-category totals, for stacking.
    pub fn category_totals(&self) -> Vec<f64> {
        (0..self.categories.len())
            .map(|ci| self.series.iter().map(|s| s.value(ci)).sum())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Label/value pairs. A header whose second cell is numeric is itself a
/// slice.
pub fn pie_slices(source: &ChartSource) -> Vec<Slice> {
    let header_is_data = source
        .header
        .get(1)
        .is_some_and(|cell| parse_number(cell).is_some());

    let header = header_is_data.then_some(&source.header);
    header
        .into_iter()
        .chain(&source.rows)
        .map(|row| Slice {
            label: row.first().cloned().unwrap_or_default(),
            value: row.get(1).and_then(|c| parse_number(c)).unwrap_or(0.0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterData {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<Point>,
}

/// `x, y[, label]` rows. A non-numeric first header cell names the axes;
/// otherwise the header is the first point. Rows without two numeric
/// coordinates are skipped.
pub fn scatter_points(source: &ChartSource) -> ScatterData {
    let labelled = source
        .header
        .first()
        .is_none_or(|cell| parse_number(cell).is_none());

    let (x_label, y_label) = if labelled {
        (
            source.header.first().cloned().unwrap_or_else(|| "X".into()),
            source.header.get(1).cloned().unwrap_or_else(|| "Y".into()),
        )
    } else {
        ("X".to_string(), "Y".to_string())
    };

    let header = (!labelled).then_some(&source.header);
    let points = header
        .into_iter()
        .chain(&source.rows)
        .filter_map(|row| {
            let x = parse_number(row.first()?)?;
            let y = parse_number(row.get(1)?)?;
            Some(Point {
                x,
                y,
                label: row.get(2).cloned().unwrap_or_default(),
            })
        })
        .collect();

    ScatterData {
        x_label,
        y_label,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let src = parse_source("Title: Sales\ntype: bar\n\n, Q1, Q2\nA, 1, 2\nB, 3, x\n");
        assert_eq!(src.title(), Some("Sales"));
        assert_eq!(src.meta("type"), Some("bar"));
        assert_eq!(src.header, ["", "Q1", "Q2"]);
        assert_eq!(src.rows.len(), 2);
    }

    #[test]
    fn test_metadata_stops_at_table() {
        let src = parse_source("Name, Value\nnote: not meta\n");
        assert!(src.meta.is_empty());
        assert_eq!(src.header, ["Name", "Value"]);
        assert_eq!(src.rows, vec![vec!["note: not meta".to_string()]]);
    }

    #[test]
    fn test_empty_source() {
        let src = parse_source("   \n");
        assert!(src.header.is_empty());
        assert!(src.rows.is_empty());
    }

    #[test]
    fn test_series_adapter() {
        let data = SeriesData::from_source(&parse_source(",Q1,Q2,Q3\nA,3,,12\nB,1,2,oops"));
        assert_eq!(data.categories, ["Q1", "Q2", "Q3"]);
        assert_eq!(data.series[0].values, vec![Some(3.0), None, Some(12.0)]);
        assert_eq!(data.series[1].value(2), 0.0);
        assert_eq!(data.values().count(), 4);
        assert_eq!(data.category_totals(), vec![4.0, 2.0, 12.0]);
    }

    #[test]
    fn test_pie_with_label_header() {
        let slices = pie_slices(&parse_source("Lang, Share\nRust, 60\nGo, 40"));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0], Slice { label: "Rust".into(), value: 60.0 });
    }

    #[test]
    fn test_pie_with_data_header() {
        let slices = pie_slices(&parse_source("Rust, 60\nGo, 40"));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].label, "Go");
    }

    #[test]
    fn test_scatter_labelled_header() {
        let data = scatter_points(&parse_source("Size, Speed\n1, 2, a\n3, 4\nbad, 1"));
        assert_eq!(data.x_label, "Size");
        assert_eq!(data.y_label, "Speed");
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[0].label, "a");
        assert_eq!(data.points[1].label, "");
    }

    #[test]
    fn test_scatter_numeric_header() {
        let data = scatter_points(&parse_source("1, 2\n3, 4"));
        assert_eq!(data.x_label, "X");
        assert_eq!(data.points.len(), 2);
    }
}
