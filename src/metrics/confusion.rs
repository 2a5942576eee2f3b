//! Confusion matrix based classification metrics.
use crate::error::DataError;
use nalgebra::{DMatrix, DVector};

/// Rows are true classes, columns predicted classes.
pub type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// Labels are class indices; the matrix is square with one row per index
    /// up to the largest label seen in either vector.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::LengthMismatch`] when the vectors differ in length.
    fn confusion_matrix(
        &self,
        y_true: &DVector<usize>,
        y_pred: &DVector<usize>,
    ) -> Result<ConfusionMatrix, DataError> {
        if y_true.len() != y_pred.len() {
            return Err(DataError::LengthMismatch {
                labels: y_true.len(),
                predictions: y_pred.len(),
            });
        }

        let num_classes = y_true.iter().chain(y_pred.iter()).max().map_or(0, |&c| c + 1);
        let mut matrix = DMatrix::zeros(num_classes, num_classes);
        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(y_t, y_p)] += 1;
        }

        Ok(matrix)
    }

    /// Computes the fraction of predictions equal to their true label.
    fn accuracy(&self, y_true: &DVector<usize>, y_pred: &DVector<usize>) -> Result<f64, DataError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let correct: usize = matrix.diagonal().iter().sum();

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Recall of each class, `None` for classes absent from `y_true`.
    fn recall_per_class(
        &self,
        y_true: &DVector<usize>,
        y_pred: &DVector<usize>,
    ) -> Result<Vec<Option<f64>>, DataError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        Ok((0..matrix.nrows())
            .map(|class| {
                let support: usize = matrix.row(class).iter().sum();
                (support > 0).then(|| matrix[(class, class)] as f64 / support as f64)
            })
            .collect())
    }
}
