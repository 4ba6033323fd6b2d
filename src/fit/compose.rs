//! Colour/magnitude composition of the observed columns.
//!
//! The two configured data columns may each hold a magnitude or an already
//! formed colour. Composition turns them into the working pair:
//!
//! - x: the reference colour the fits are evaluated at
//! - y: the reference magnitude the predictions are anchored to
//!
//! The case table (including its axis labels) is part of the output
//! contract, so it is reproduced exactly rather than simplified.

use crate::domain::{ColumnKind, YAxis};
use crate::error::AppError;

/// The composed working pair, with the axis labels used in output headers.
#[derive(Debug, Clone)]
pub struct ComposedData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    /// Which source magnitude `y` holds.
    pub y_axis: YAxis,
}

/// Build (x, y) from the two observed columns.
///
/// With two magnitudes, x = m1 - m2 and y is the magnitude picked by
/// `axis`. With one colour input, x is the colour column itself and the
/// missing magnitude is reconstructed through colour + magnitude =
/// magnitude. Two colour inputs cannot anchor a magnitude prediction and
/// are rejected.
pub fn compose_xy(
    kind1: ColumnKind,
    kind2: ColumnKind,
    axis: YAxis,
    label1: &str,
    label2: &str,
    data1: &[f64],
    data2: &[f64],
) -> Result<ComposedData, AppError> {
    debug_assert_eq!(data1.len(), data2.len());

    let composed = match (kind1, kind2) {
        (ColumnKind::Magnitude, ColumnKind::Magnitude) => {
            let x = difference(data1, data2);
            let x_label = format!("{label1} - {label2}");
            match axis {
                YAxis::Mag1 => ComposedData {
                    x,
                    y: data1.to_vec(),
                    x_label,
                    y_label: label1.to_string(),
                    y_axis: YAxis::Mag1,
                },
                YAxis::Mag2 => ComposedData {
                    x,
                    y: data2.to_vec(),
                    x_label,
                    y_label: label2.to_string(),
                    y_axis: YAxis::Mag2,
                },
            }
        }
        (ColumnKind::Magnitude, ColumnKind::Colour) => match axis {
            YAxis::Mag1 => ComposedData {
                x: data2.to_vec(),
                y: data1.to_vec(),
                x_label: format!("{label1} - {label2}"),
                y_label: label1.to_string(),
                y_axis: YAxis::Mag1,
            },
            YAxis::Mag2 => ComposedData {
                x: data2.to_vec(),
                y: sum(data2, data1),
                x_label: format!("{label1} - {label2}"),
                y_label: label2.to_string(),
                y_axis: YAxis::Mag2,
            },
        },
        (ColumnKind::Colour, ColumnKind::Magnitude) => match axis {
            YAxis::Mag2 => ComposedData {
                x: data1.to_vec(),
                y: data2.to_vec(),
                x_label: format!("{label2} - {label1}"),
                y_label: label2.to_string(),
                y_axis: YAxis::Mag2,
            },
            YAxis::Mag1 => ComposedData {
                x: data1.to_vec(),
                y: sum(data1, data2),
                x_label: format!("{label2} - {label1}"),
                y_label: label1.to_string(),
                y_axis: YAxis::Mag1,
            },
        },
        (ColumnKind::Colour, ColumnKind::Colour) => {
            return Err(AppError::config(
                "Both inputs are colours; cannot anchor a magnitude prediction",
            ));
        }
    };
    Ok(composed)
}

fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

fn sum(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const M1: [f64; 3] = [12.0, 13.5, 11.25];
    const M2: [f64; 3] = [11.5, 12.25, 11.0];

    #[test]
    fn two_magnitudes_axis_one_is_the_canonical_case() {
        let c = compose_xy(
            ColumnKind::Magnitude,
            ColumnKind::Magnitude,
            YAxis::Mag1,
            "Johnson J",
            "Johnson K",
            &M1,
            &M2,
        )
        .unwrap();
        assert_eq!(c.x, vec![0.5, 1.25, 0.25]);
        assert_eq!(c.y, M1.to_vec());
        assert_eq!(c.x_label, "Johnson J - Johnson K");
        assert_eq!(c.y_label, "Johnson J");
        assert_eq!(c.y_axis, YAxis::Mag1);
    }

    #[test]
    fn two_magnitudes_axis_two_keeps_the_second_magnitude() {
        let c = compose_xy(
            ColumnKind::Magnitude,
            ColumnKind::Magnitude,
            YAxis::Mag2,
            "Johnson J",
            "Johnson K",
            &M1,
            &M2,
        )
        .unwrap();
        assert_eq!(c.x, vec![0.5, 1.25, 0.25]);
        assert_eq!(c.y, M2.to_vec());
        assert_eq!(c.y_label, "Johnson K");
    }

    #[test]
    fn colour_second_passes_the_colour_through_as_x() {
        let colour = [0.5, 1.25, 0.25];
        let c = compose_xy(
            ColumnKind::Magnitude,
            ColumnKind::Colour,
            YAxis::Mag2,
            "Johnson J",
            "Johnson K",
            &M1,
            &colour,
        )
        .unwrap();
        assert_eq!(c.x, colour.to_vec());
        // Reconstructed through colour + magnitude.
        assert_eq!(c.y, vec![12.5, 14.75, 11.5]);
        assert_eq!(c.y_label, "Johnson K");
        assert_eq!(c.y_axis, YAxis::Mag2);
    }

    #[test]
    fn colour_first_swaps_the_x_label() {
        let colour = [0.5, 1.25, 0.25];
        let c = compose_xy(
            ColumnKind::Colour,
            ColumnKind::Magnitude,
            YAxis::Mag2,
            "Johnson J",
            "Johnson K",
            &colour,
            &M2,
        )
        .unwrap();
        assert_eq!(c.x, colour.to_vec());
        assert_eq!(c.y, M2.to_vec());
        assert_eq!(c.x_label, "Johnson K - Johnson J");
    }

    #[test]
    fn two_colours_are_rejected() {
        let err = compose_xy(
            ColumnKind::Colour,
            ColumnKind::Colour,
            YAxis::Mag1,
            "a",
            "b",
            &M1,
            &M2,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
