//! Induction parameters.
use crate::error::Id3Error;

/// Confidence of the chi-squared test that decides whether a split is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// 95% confidence, code 0.
    P95,
    /// 99% confidence, code 1.
    P99,
    /// No test at all, code 2. The tree grows until it is pure or out of attributes.
    Unpruned,
}

impl Confidence {
    pub fn code(self) -> u8 {
        match self {
            Confidence::P95 => 0,
            Confidence::P99 => 1,
            Confidence::Unpruned => 2,
        }
    }
}

impl TryFrom<u8> for Confidence {
    type Error = Id3Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Confidence::P95),
            1 => Ok(Confidence::P99),
            2 => Ok(Confidence::Unpruned),
            _ => Err(Id3Error::InvalidConfidenceLevel { level }),
        }
    }
}

/// What training does with a missing attribute value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingValues {
    /// Substitute the most frequent value seen for the record's class.
    #[default]
    Impute,
    /// Fail with [`Id3Error::MissingValue`].
    Reject,
}

#[derive(Clone, Debug)]
pub struct Id3Params {
    pub confidence: Confidence,
    pub missing_values: MissingValues,
}

impl Default for Id3Params {
    fn default() -> Self {
        Self::new()
    }
}

impl Id3Params {
    pub fn new() -> Self {
        Self {
            confidence: Confidence::P95,
            missing_values: MissingValues::Impute,
        }
    }

    pub fn set_confidence(&mut self, level: u8) -> Result<(), Id3Error> {
        self.confidence = Confidence::try_from(level)?;
        Ok(())
    }

    pub fn set_missing_values(&mut self, missing_values: MissingValues) {
        self.missing_values = missing_values;
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn missing_values(&self) -> MissingValues {
        self.missing_values
    }
}
