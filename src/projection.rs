use crate::boosting::{BoostedRegressor, ModelError};
use crate::market::MarketSnapshot;
use crate::scaler::MinMaxScaler;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;
use tracing::warn;

/// Fixed hypothetical investment, USD.
pub const INITIAL_INVESTMENT: f64 = 10_000.0;

/// Point projection for one selected asset.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub name: String,
    /// 24h change as reported by the API.
    pub change_percent_24h: f64,
    pub predicted_price: f64,
    /// Change implied by the model, predicted vs actual.
    pub percent_change: f64,
    pub projected_earnings: f64,
}

/// Fits the scaler/regressor pair on the full price vector and projects
/// earnings for each selected index.
///
/// The training target repeats the most recent listed price, so the fitted
/// model approximates a constant function of the scaled price. That matches
/// the upstream behavior this tool reproduces; it is not a forecast.
pub fn project_earnings(
    snapshot: &MarketSnapshot,
    top_indices: &[usize],
) -> Result<Vec<Projection>, ModelError> {
    if snapshot.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }

    let latest = snapshot.latest_price();
    let features = snapshot.prices.clone().insert_axis(Axis(1));
    let targets = Array1::from_elem(snapshot.len(), latest);

    warn!(
        "every training target equals the latest listed price ({:.2}); \
         the fitted model approximates a constant",
        latest
    );

    let mut scaler = MinMaxScaler::new();
    let scaled = scaler.fit_transform(&features);

    let mut model = BoostedRegressor::new();
    model.fit(&scaled, &targets)?;

    let mut projections = Vec::with_capacity(top_indices.len());
    for &index in top_indices {
        let actual = snapshot.prices[index];

        let scaled_price = scaler.transform(&Array2::from_elem((1, 1), actual));
        let predicted = model.predict(&scaled_price)?[0];

        let percent_change = (predicted - actual) / actual * 100.0;
        let projected_earnings = earnings_for_change(percent_change);

        projections.push(Projection {
            name: snapshot.names[index].clone(),
            change_percent_24h: snapshot.change_percents[index],
            predicted_price: predicted,
            percent_change,
            projected_earnings,
        });
    }

    Ok(projections)
}

/// Hypothetical investment value after applying a percent change.
pub fn earnings_for_change(percent_change: f64) -> f64 {
    INITIAL_INVESTMENT * (1.0 + percent_change / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(names: &[&str], prices: &[f64], changes: &[f64]) -> MarketSnapshot {
        MarketSnapshot {
            names: names.iter().map(|n| n.to_string()).collect(),
            prices: Array1::from(prices.to_vec()),
            change_percents: Array1::from(changes.to_vec()),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_earnings_for_ten_percent_change() {
        assert!((earnings_for_change(10.0) - 11_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_earnings_for_zero_change_is_the_investment() {
        assert_eq!(earnings_for_change(0.0), INITIAL_INVESTMENT);
    }

    #[test]
    fn test_projection_is_index_aligned() {
        let snap = snapshot(
            &["A", "B", "C", "D", "E"],
            &[10.0, 20.0, 30.0, 40.0, 50.0],
            &[1.0, 5.0, 2.0, 9.0, -3.0],
        );

        let projections = project_earnings(&snap, &[2, 1, 3]).unwrap();

        assert_eq!(projections.len(), 3);
        assert_eq!(projections[0].name, "C");
        assert_eq!(projections[1].name, "B");
        assert_eq!(projections[2].name, "D");
        assert_eq!(projections[0].change_percent_24h, 2.0);
        assert_eq!(projections[2].change_percent_24h, 9.0);
    }

    #[test]
    fn test_constant_model_projects_the_latest_price() {
        // With the repeated-latest-price target the model predicts the
        // latest price everywhere, so the last-listed asset projects
        // earnings equal to the investment.
        let snap = snapshot(
            &["A", "B", "C"],
            &[10.0, 20.0, 40.0],
            &[1.0, 2.0, 3.0],
        );

        let projections = project_earnings(&snap, &[2]).unwrap();

        assert!((projections[0].predicted_price - 40.0).abs() < 1e-9);
        assert!(projections[0].percent_change.abs() < 1e-9);
        assert!((projections[0].projected_earnings - INITIAL_INVESTMENT).abs() < 1e-6);
    }

    #[test]
    fn test_empty_snapshot_is_rejected() {
        let snap = snapshot(&[], &[], &[]);

        assert!(matches!(
            project_earnings(&snap, &[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_deterministic_projection() {
        let snap = snapshot(
            &["A", "B", "C", "D"],
            &[12.5, 80.0, 43.1, 7.9],
            &[0.1, 4.0, -2.0, 6.5],
        );

        let first = project_earnings(&snap, &[1, 3]).unwrap();
        let second = project_earnings(&snap, &[1, 3]).unwrap();

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.predicted_price, b.predicted_price);
            assert_eq!(a.projected_earnings, b.projected_earnings);
        }
    }

    #[test]
    fn test_duplicate_names_project_independently() {
        // Lookups go through positions, not names.
        let snap = snapshot(&["X", "X"], &[5.0, 10.0], &[2.0, 8.0]);

        let projections = project_earnings(&snap, &[0, 1]).unwrap();

        assert_eq!(projections[0].name, "X");
        assert_eq!(projections[1].name, "X");
        assert_ne!(
            projections[0].change_percent_24h,
            projections[1].change_percent_24h
        );
    }
}
