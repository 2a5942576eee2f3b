//! Chi-squared critical values.
use super::params::Confidence;
use crate::error::Id3Error;

/// Upper critical values of the chi-squared distribution.
///
/// Row `i` is `i + 1` degrees of freedom; the columns are 95% and 99% confidence.
const CRITICAL_VALUES: [[f64; 2]; 30] = [
    [3.84, 6.64],
    [5.99, 9.21],
    [7.82, 11.34],
    [9.49, 13.28],
    [11.07, 15.09],
    [12.59, 16.81],
    [14.07, 18.48],
    [15.51, 20.09],
    [16.92, 21.67],
    [18.31, 23.21],
    [19.68, 24.72],
    [21.03, 26.22],
    [22.36, 27.69],
    [23.68, 29.14],
    [25.0, 30.58],
    [26.3, 32.0],
    [27.59, 33.41],
    [28.87, 34.8],
    [30.14, 36.19],
    [31.41, 37.57],
    [32.67, 38.93],
    [33.92, 40.29],
    [35.17, 41.64],
    [36.42, 42.98],
    [37.65, 44.31],
    [38.88, 45.64],
    [40.11, 46.96],
    [41.34, 48.28],
    [42.56, 49.59],
    [43.77, 50.89],
];

/// Source of the thresholds a split's chi-squared statistic must exceed.
pub trait CriticalValues: Send + Sync {
    fn critical_value(
        &self,
        degrees_of_freedom: usize,
        confidence: Confidence,
    ) -> Result<f64, Id3Error>;
}

/// The compiled-in table for 1 to 30 degrees of freedom.
#[derive(Clone, Copy, Debug, Default)]
pub struct CriticalValueTable;

impl CriticalValueTable {
    pub const MAX_DEGREES_OF_FREEDOM: usize = CRITICAL_VALUES.len();
}

impl CriticalValues for CriticalValueTable {
    fn critical_value(
        &self,
        degrees_of_freedom: usize,
        confidence: Confidence,
    ) -> Result<f64, Id3Error> {
        let column = match confidence {
            Confidence::P95 => 0,
            Confidence::P99 => 1,
            Confidence::Unpruned => {
                return Err(Id3Error::InvalidConfidenceLevel {
                    level: confidence.code(),
                })
            }
        };
        if !(1..=Self::MAX_DEGREES_OF_FREEDOM).contains(&degrees_of_freedom) {
            return Err(Id3Error::DegreesOfFreedomOutOfRange { degrees_of_freedom });
        }
        Ok(CRITICAL_VALUES[degrees_of_freedom - 1][column])
    }
}
