//! Result table output.
//!
//! The output is whitespace-delimited text: one `#` header line naming the
//! columns separated by `|`, then one row per observation with `%10.5f`
//! style fields. Target filters whose predicted values have zero range
//! across all rows are dropped from both the header and the rows. RA/Dec
//! strings, when carried, are appended verbatim.
//!
//! The whole table is rendered in memory and written in one call, so a
//! failed write never leaves a half-written table behind.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::fit::{PredictedColumn, PredictedTable};

/// Write the predicted magnitude table.
pub fn write_predicted_table(path: &Path, table: &PredictedTable) -> Result<(), AppError> {
    let content = render(table);
    fs::write(path, content).map_err(|e| {
        AppError::data(format!(
            "Failed to write output '{}': {e}",
            path.display()
        ))
    })
}

fn retained(columns: &[PredictedColumn]) -> Vec<&PredictedColumn> {
    columns
        .iter()
        .filter(|col| {
            let lo = col.values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = col.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let keep = hi - lo > 0.0;
            if !keep {
                log::debug!("dropping constant output column '{}'", col.label.trim_end());
            }
            keep
        })
        .collect()
}

fn render(table: &PredictedTable) -> String {
    let keep = retained(&table.columns);

    let mut header = format!("# {} | {} ", table.x_label, table.y_label);
    for col in &keep {
        header.push_str(" | ");
        header.push_str(&col.label);
    }
    let mut out = header.trim_end_matches([' ', ',']).to_string();
    if table.positions.is_some() {
        out.push_str(" | RA | Dec ");
    }
    out.push('\n');

    for i in 0..table.x.len() {
        let mut line = format!("{:10.5} {:10.5} ", table.x[i], table.y[i]);
        for col in &keep {
            let _ = write!(line, "{:10.5} ", col.values[i]);
        }
        if let Some(positions) = &table.positions {
            let (ra, dec) = &positions[i];
            let _ = write!(line, "{ra} {dec}");
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(positions: Option<Vec<(String, String)>>) -> PredictedTable {
        PredictedTable {
            x: vec![0.85, 1.1],
            y: vec![12.0, 13.25],
            x_label: "Johnson J - Johnson K".to_string(),
            y_label: "Johnson J".to_string(),
            columns: vec![
                PredictedColumn {
                    label: "NIRCam F150W ".to_string(),
                    values: vec![10.12345, 11.5],
                },
                PredictedColumn {
                    label: "MIRI F560W ".to_string(),
                    values: vec![3.0, 3.0],
                },
            ],
            positions,
        }
    }

    #[test]
    fn constant_columns_are_pruned_from_header_and_rows() {
        let text = render(&table(None));
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert_eq!(
            header,
            "# Johnson J - Johnson K | Johnson J  | NIRCam F150W"
        );
        assert!(!text.contains("MIRI"));
        let row = lines.next().unwrap();
        assert_eq!(row, "   0.85000   12.00000   10.12345 ");
    }

    #[test]
    fn positions_append_header_and_row_fields() {
        let positions = vec![
            ("12:00:00.0".to_string(), "-30:00:00.0".to_string()),
            ("12:00:01.0".to_string(), "-30:00:01.0".to_string()),
        ];
        let text = render(&table(Some(positions)));
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "# Johnson J - Johnson K | Johnson J  | NIRCam F150W | RA | Dec "
        );
        assert_eq!(
            lines.next().unwrap(),
            "   0.85000   12.00000   10.12345 12:00:00.0 -30:00:00.0"
        );
        assert_eq!(
            lines.next().unwrap(),
            "   1.10000   13.25000   11.50000 12:00:01.0 -30:00:01.0"
        );
    }

    #[test]
    fn all_constant_columns_leave_only_the_axes() {
        let mut t = table(None);
        t.columns[0].values = vec![7.0, 7.0];
        let text = render(&t);
        assert_eq!(
            text.lines().next().unwrap(),
            "# Johnson J - Johnson K | Johnson J"
        );
    }

    #[test]
    fn write_creates_the_file() {
        let path = std::env::temp_dir().join(format!(
            "jwstmag-out-{}.txt",
            std::process::id()
        ));
        write_predicted_table(&path, &table(None)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();
        assert!(text.starts_with("# Johnson J - Johnson K"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn unwritable_path_reports_the_file() {
        let err =
            write_predicted_table(Path::new("/nonexistent/dir/out.txt"), &table(None)).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/out.txt"), "{err}");
    }
}
