use ndarray::{Array1, Array2, Axis};

/// Min-max scaler mapping each feature column into [0, 1].
///
/// Fitted state is per-column min and max; a column with zero range divides
/// by 1.0 so constant inputs map to 0 instead of NaN.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    min: Option<Array1<f64>>,
    max: Option<Array1<f64>>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to data
    pub fn fit(&mut self, data: &Array2<f64>) {
        self.min = Some(data.fold_axis(Axis(0), f64::INFINITY, |&a, &b| a.min(b)));
        self.max = Some(data.fold_axis(Axis(0), f64::NEG_INFINITY, |&a, &b| a.max(b)));
    }

    /// Transform data using fitted parameters
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let min = self.min.as_ref().expect("Scaler not fitted");
        let max = self.max.as_ref().expect("Scaler not fitted");

        let mut result = data.clone();
        for (i, mut col) in result.columns_mut().into_iter().enumerate() {
            let range = max[i] - min[i];
            let r = if range > 1e-10 { range } else { 1.0 };
            col.mapv_inplace(|x| (x - min[i]) / r);
        }
        result
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Array2<f64> {
        self.fit(data);
        self.transform(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scales_own_fit_vector_onto_unit_interval() {
        let data = array![[10.0], [15.0], [30.0]];
        let mut scaler = MinMaxScaler::new();

        let scaled = scaler.fit_transform(&data);

        assert!((scaled[[0, 0]] - 0.0).abs() < 1e-10);
        assert!((scaled[[1, 0]] - 0.25).abs() < 1e-10);
        assert!((scaled[[2, 0]] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_transform_is_linear_interpolation() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&array![[0.0], [100.0]]);

        let scaled = scaler.transform(&array![[25.0], [50.0]]);

        assert!((scaled[[0, 0]] - 0.25).abs() < 1e-10);
        assert!((scaled[[1, 0]] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let data = array![[7.0], [7.0], [7.0]];
        let mut scaler = MinMaxScaler::new();

        let scaled = scaler.fit_transform(&data);

        for value in scaled.iter() {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_multiple_columns_scale_independently() {
        let data = array![[0.0, 50.0], [5.0, 100.0], [10.0, 150.0]];
        let mut scaler = MinMaxScaler::new();

        let scaled = scaler.fit_transform(&data);

        assert!((scaled[[1, 0]] - 0.5).abs() < 1e-10);
        assert!((scaled[[1, 1]] - 0.5).abs() < 1e-10);
        assert!((scaled[[2, 1]] - 1.0).abs() < 1e-10);
    }
}
