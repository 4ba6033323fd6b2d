//! Batch-run configuration.
//!
//! A run is described by a TOML file with two tables,
//! `Input_Magnitude_Parameters` and `Output_Filter_Values`. All fifteen keys
//! are required. Parsing is strict: an unknown column type or model set, a
//! `yvalue` other than 1 or 2, or a fit order below 2 abort the run instead
//! of being coerced to a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{ColumnKind, ModelFamily, RunConfig, YAxis};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Input_Magnitude_Parameters")]
    input: InputSection,
    #[serde(rename = "Output_Filter_Values")]
    output: OutputSection,
}

#[derive(Debug, Deserialize)]
struct InputSection {
    filter1: String,
    filter2: String,
    column1: i64,
    column2: i64,
    column1type: ColumnKind,
    column2type: ColumnKind,
    yvalue: i64,
    datafile: PathBuf,
    racolumn: i64,
    deccolumn: i64,
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    modelset: ModelFamily,
    jwst1: String,
    jwst2: String,
    fitorder: i64,
    outfilename: PathBuf,
}

/// Read and validate a run configuration.
pub fn load_run_config(path: &Path) -> Result<RunConfig, AppError> {
    log::info!("reading configuration '{}'", path.display());
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::config(format!(
            "Failed to read configuration '{}': {e}",
            path.display()
        ))
    })?;
    parse_config(&text, path)
}

fn parse_config(text: &str, path: &Path) -> Result<RunConfig, AppError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| {
        AppError::config(format!(
            "Failed to parse configuration '{}': {e}",
            path.display()
        ))
    })?;
    validate(file)
}

fn validate(file: ConfigFile) -> Result<RunConfig, AppError> {
    let input = file.input;
    let output = file.output;

    if input.column1 < 1 || input.column2 < 1 || input.column1 == input.column2 {
        return Err(AppError::config(format!(
            "Bad magnitude column numbers {} and {}: both must be positive and distinct",
            input.column1, input.column2
        )));
    }
    if input.column1type == ColumnKind::Colour && input.column2type == ColumnKind::Colour {
        return Err(AppError::config(
            "Both input columns are marked 'colour'; two colours will not work",
        ));
    }
    let Some(y_axis) = YAxis::from_yvalue(input.yvalue) else {
        return Err(AppError::config(format!(
            "yvalue must be 1 or 2, got {}",
            input.yvalue
        )));
    };
    if output.fitorder < 2 {
        return Err(AppError::config(format!(
            "fitorder must be at least 2, got {}",
            output.fitorder
        )));
    }

    Ok(RunConfig {
        family: output.modelset,
        filter1: input.filter1.replace('_', " "),
        filter2: input.filter2.replace('_', " "),
        column1: (input.column1 - 1) as usize,
        column2: (input.column2 - 1) as usize,
        column1_kind: input.column1type,
        column2_kind: input.column2type,
        y_axis,
        datafile: input.datafile,
        ra_column: position_column(input.racolumn),
        dec_column: position_column(input.deccolumn),
        target1: output.jwst1.replace('_', " "),
        target2: output.jwst2.replace('_', " "),
        fit_order: output.fitorder as usize,
        out_path: output.outfilename,
    })
}

/// A zero or negative column number disables the RA/Dec passthrough.
fn position_column(value: i64) -> Option<usize> {
    if value > 0 {
        Some((value - 1) as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[Input_Magnitude_Parameters]
filter1 = "Johnson_J"
filter2 = "Johnson_K"
column1 = 2
column2 = 3
column1type = "magnitude"
column2type = "magnitude"
yvalue = 1
datafile = "stars.dat"
racolumn = 4
deccolumn = 5

[Output_Filter_Values]
modelset = "Kurucz"
jwst1 = "NIRCam_F150W"
jwst2 = "NIRCam_F200W"
fitorder = 4
outfilename = "out.txt"
"#;

    fn parse(text: &str) -> Result<RunConfig, AppError> {
        parse_config(text, Path::new("run.cfg"))
    }

    #[test]
    fn valid_file_maps_to_run_config() {
        let cfg = parse(VALID).unwrap();
        assert_eq!(cfg.family, ModelFamily::Kurucz);
        assert_eq!(cfg.filter1, "Johnson J");
        assert_eq!(cfg.target2, "NIRCam F200W");
        // 1-based keys become 0-based indices.
        assert_eq!(cfg.column1, 1);
        assert_eq!(cfg.column2, 2);
        assert_eq!(cfg.ra_column, Some(3));
        assert_eq!(cfg.dec_column, Some(4));
        assert_eq!(cfg.y_axis, YAxis::Mag1);
        assert_eq!(cfg.fit_order, 4);
        assert_eq!(cfg.datafile, PathBuf::from("stars.dat"));
    }

    #[test]
    fn zero_position_column_disables_passthrough() {
        let text = VALID.replace("racolumn = 4", "racolumn = 0");
        let cfg = parse(&text).unwrap();
        assert_eq!(cfg.ra_column, None);
        assert_eq!(cfg.dec_column, Some(4));
    }

    #[test]
    fn missing_key_is_config_error() {
        let text = VALID.replace("fitorder = 4\n", "");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_modelset_is_rejected() {
        let text = VALID.replace("\"Kurucz\"", "\"Castelli\"");
        assert!(parse(&text).is_err());
    }

    #[test]
    fn modelset_spelling_is_case_sensitive() {
        let text = VALID.replace("\"Kurucz\"", "\"BOSZ\"");
        assert_eq!(parse(&text).unwrap().family, ModelFamily::Bosz);
        let text = VALID.replace("\"Kurucz\"", "\"bosz\"");
        assert!(parse(&text).is_err());
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let text = VALID.replace("column2 = 3", "column2 = 2");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("distinct"), "{err}");
    }

    #[test]
    fn two_colour_inputs_are_rejected() {
        let text = VALID
            .replace("column1type = \"magnitude\"", "column1type = \"colour\"")
            .replace("column2type = \"magnitude\"", "column2type = \"colour\"");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("colour"), "{err}");
    }

    #[test]
    fn out_of_range_yvalue_is_rejected() {
        let text = VALID.replace("yvalue = 1", "yvalue = 3");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("yvalue"), "{err}");
    }

    #[test]
    fn low_fit_order_is_fatal_in_batch() {
        let text = VALID.replace("fitorder = 4", "fitorder = 1");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
