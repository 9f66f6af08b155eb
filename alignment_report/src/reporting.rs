//! Tabular rendering of main points.

use std::io::Write;

#[cfg(feature = "reporting")]
use umya_spreadsheet::{self, writer::xlsx, Spreadsheet};

use crate::error::{Error, Result};
use crate::main_point::MainPoint;
use crate::source::AlignmentSet;

/// Column labels of the Civil 3D main-point sheet.
pub const JAPANESE_HEADER: [&str; 9] = [
    "主要点名称",
    "測点",
    "X 座標",
    "Y 座標",
    "要素長",
    "接線角",
    "始点半径",
    "終点半径",
    "パラメータ A",
];

pub const ENGLISH_HEADER: [&str; 9] = [
    "Name",
    "Station",
    "X",
    "Y",
    "Length",
    "Direction",
    "Radius In",
    "Radius Out",
    "A",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderLanguage {
    #[default]
    Japanese,
    English,
}

impl HeaderLanguage {
    pub fn labels(self) -> [&'static str; 9] {
        match self {
            HeaderLanguage::Japanese => JAPANESE_HEADER,
            HeaderLanguage::English => ENGLISH_HEADER,
        }
    }
}

/// Report settings chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportOptions {
    pub header: HeaderLanguage,
    /// Overrides the alignment's own station-index increment.
    pub station_increment: Option<f64>,
}

/// Derives the main points of the alignment called `name`.
pub fn build_report(
    set: &AlignmentSet,
    name: &str,
    options: &ReportOptions,
) -> Result<Vec<MainPoint>> {
    let alignment = set.find(name)?;
    let increment = options
        .station_increment
        .unwrap_or(alignment.station_index_increment);
    crate::deriver::derive_main_points_with_increment(alignment, increment)
}

/// Value of a single report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn number(v: f64) -> Cell {
        if v.is_finite() {
            Cell::Number(v)
        } else if v.is_nan() {
            Cell::Text("NaN".to_string())
        } else if v > 0.0 {
            Cell::Text("∞".to_string())
        } else {
            Cell::Text("-∞".to_string())
        }
    }

    fn optional(v: Option<f64>) -> Cell {
        v.map_or(Cell::Empty, Cell::number)
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Text(t) => serde_json::Value::from(t.as_str()),
            Cell::Number(n) => serde_json::Value::from(*n),
            Cell::Empty => serde_json::Value::Null,
        }
    }
}

/// Cells of one record in column order: name, station, x, y, length,
/// direction, radius in, radius out, A.
pub fn row_cells(point: &MainPoint) -> [Cell; 9] {
    [
        Cell::Text(point.name.clone()),
        Cell::Text(point.station.clone()),
        Cell::number(point.x),
        Cell::number(point.y),
        Cell::optional(point.length),
        Cell::optional(point.direction),
        Cell::optional(point.radius_in),
        Cell::optional(point.radius_out),
        Cell::optional(point.a_value),
    ]
}

/// Destination accepting a header row and the ordered main points.
pub trait TableSink {
    fn write_table(&mut self, header: &[&str], rows: &[MainPoint]) -> Result<()>;
}

/// Comma separated output.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    fn write_table(&mut self, header: &[&str], rows: &[MainPoint]) -> Result<()> {
        let labels: Vec<String> = header.iter().map(|h| csv_field(h)).collect();
        writeln!(self.writer, "{}", labels.join(","))?;
        for point in rows {
            let fields: Vec<String> = row_cells(point)
                .iter()
                .map(|cell| match cell {
                    Cell::Text(t) => csv_field(t),
                    Cell::Number(n) => n.to_string(),
                    Cell::Empty => String::new(),
                })
                .collect();
            writeln!(self.writer, "{}", fields.join(","))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON array of objects keyed by the header labels.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TableSink for JsonSink<W> {
    fn write_table(&mut self, header: &[&str], rows: &[MainPoint]) -> Result<()> {
        let records: Vec<serde_json::Value> = rows
            .iter()
            .map(|point| {
                let object: serde_json::Map<String, serde_json::Value> = header
                    .iter()
                    .zip(row_cells(point).iter())
                    .map(|(label, cell)| (label.to_string(), cell.to_json()))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::to_writer_pretty(&mut self.writer, &records)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// XLSX workbook written to `path` on sheet `Sheet1`.
#[cfg(feature = "reporting")]
pub struct ExcelSink {
    path: String,
}

#[cfg(feature = "reporting")]
impl ExcelSink {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "reporting")]
impl TableSink for ExcelSink {
    fn write_table(&mut self, header: &[&str], rows: &[MainPoint]) -> Result<()> {
        let mut wb: Spreadsheet = umya_spreadsheet::new_file();
        let ws = wb
            .get_sheet_mut(&0)
            .ok_or_else(|| Error::InvalidConfiguration("workbook has no sheet".to_string()))?;
        for (c_idx, label) in header.iter().enumerate() {
            ws.get_cell_mut(((c_idx + 1) as u32, 1u32)).set_value(*label);
        }
        for (r_idx, point) in rows.iter().enumerate() {
            for (c_idx, cell) in row_cells(point).into_iter().enumerate() {
                let target = ws.get_cell_mut(((c_idx + 1) as u32, (r_idx + 2) as u32));
                match cell {
                    Cell::Text(t) => {
                        target.set_value(t);
                    }
                    Cell::Number(n) => {
                        target.set_value_number(n);
                    }
                    Cell::Empty => {}
                }
            }
        }
        xlsx::write(&wb, &self.path).map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(())
    }
}

/// Output format of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    /// Picks the format from a file extension; unknown extensions are rejected.
    pub fn from_path(path: &str) -> Result<Self> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".xlsx") {
            Ok(ReportFormat::Xlsx)
        } else if lower.ends_with(".csv") {
            Ok(ReportFormat::Csv)
        } else if lower.ends_with(".json") {
            Ok(ReportFormat::Json)
        } else {
            Err(Error::InvalidConfiguration(format!(
                "cannot infer report format from {path}"
            )))
        }
    }
}

/// Writes `rows` to `path` in the requested format.
pub fn write_report(
    path: &str,
    format: ReportFormat,
    header: &[&str],
    rows: &[MainPoint],
) -> Result<()> {
    match format {
        #[cfg(feature = "reporting")]
        ReportFormat::Xlsx => ExcelSink::new(path).write_table(header, rows),
        #[cfg(not(feature = "reporting"))]
        ReportFormat::Xlsx => Err(Error::InvalidConfiguration(
            "xlsx output requires the `reporting` feature".to_string(),
        )),
        ReportFormat::Csv => {
            let file = std::fs::File::create(path)?;
            CsvSink::new(std::io::BufWriter::new(file)).write_table(header, rows)
        }
        ReportFormat::Json => {
            let file = std::fs::File::create(path)?;
            JsonSink::new(std::io::BufWriter::new(file)).write_table(header, rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiral_point() -> MainPoint {
        MainPoint {
            name: "KA1-1".to_string(),
            station: "0+100".to_string(),
            x: 100.0,
            y: 0.5,
            length: Some(40.0),
            direction: Some(90.0),
            radius_in: Some(-f64::INFINITY),
            radius_out: Some(-300.0),
            a_value: Some(-120.0),
        }
    }

    fn end_point() -> MainPoint {
        MainPoint {
            name: "EP".to_string(),
            station: "0+240".to_string(),
            x: 1.0,
            y: 2.0,
            length: None,
            direction: None,
            radius_in: None,
            radius_out: None,
            a_value: None,
        }
    }

    #[test]
    fn csv_rows_follow_column_order() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_table(&ENGLISH_HEADER, &[spiral_point(), end_point()])
            .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name,Station,X,Y,Length,Direction,Radius In,Radius Out,A");
        assert_eq!(lines[1], "KA1-1,0+100,100,0.5,40,90,-∞,-300,-120");
        assert_eq!(lines[2], "EP,0+240,1,2,,,,,");
    }

    #[test]
    fn json_uses_header_labels() {
        let mut sink = JsonSink::new(Vec::new());
        sink.write_table(&JAPANESE_HEADER, &[end_point()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value[0]["主要点名称"], "EP");
        assert_eq!(value[0]["測点"], "0+240");
        assert!(value[0]["要素長"].is_null());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ReportFormat::from_path("Report.XLSX").unwrap(), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::from_path("out.csv").unwrap(), ReportFormat::Csv);
        assert!(ReportFormat::from_path("out.txt").is_err());
    }

    #[cfg(feature = "reporting")]
    #[test]
    fn excel_report_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Report.xlsx");
        let path = path.to_str().unwrap();
        write_report(path, ReportFormat::Xlsx, &JAPANESE_HEADER, &[spiral_point()]).unwrap();
        let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((1u32, 1u32)), "主要点名称");
        assert_eq!(sheet.get_value((1u32, 2u32)), "KA1-1");
        assert_eq!(sheet.get_value((7u32, 2u32)), "-∞");
    }
}
