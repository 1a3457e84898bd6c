use crate::projection::Projection;
use chrono::{DateTime, Utc};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_BORDERS_ONLY,
};

/// Shown instead of any table or chart when acquisition fails.
pub const NO_DATA_MESSAGE: &str = "Data not as expected.";

fn get_visibility_ratio(current: f64, top: f64) -> f64 {
    let mut ratio = 0.4 + 0.6 * (current / top);
    if ratio < 0.4 {
        ratio = 0.4;
    }
    ratio
}

pub fn money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Prints one summary row per selected asset, in ascending order of 24h
/// change (the last row is the top mover).
pub fn print_summary(fetched_at: DateTime<Utc>, projections: &[Projection]) {
    if projections.is_empty() {
        println!("No assets to display.");
        return;
    }

    let time_str = fetched_at.format("%d-%m-%Y %H:%M:%S");
    let title = format!(
        "Top {} assets by 24h change percent (data taken at {} UTC)",
        projections.len(),
        time_str
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Asset").add_attribute(Attribute::Bold),
            Cell::new("Change (24h %)")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new("Projected Earnings")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        ]);

    let top_earnings = projections
        .iter()
        .map(|p| p.projected_earnings)
        .fold(f64::NEG_INFINITY, f64::max);
    let safe_top = if top_earnings == 0.0 { 1.0 } else { top_earnings };

    for projection in projections {
        let ratio = get_visibility_ratio(projection.projected_earnings, safe_top);

        let cyan_val = (255.0 * ratio) as u8;
        let green_val = (255.0 * ratio) as u8;

        let asset_cell = Cell::new(&projection.name).fg(Color::Rgb {
            r: 0,
            g: cyan_val,
            b: cyan_val,
        });

        let change_cell = Cell::new(format!("{:.2}%", projection.change_percent_24h))
            .fg(Color::Rgb {
                r: 0,
                g: green_val,
                b: 0,
            })
            .set_alignment(CellAlignment::Right);

        let earnings_cell = Cell::new(money(projection.projected_earnings))
            .fg(Color::Rgb {
                r: 0,
                g: green_val,
                b: 0,
            })
            .set_alignment(CellAlignment::Right);

        table.add_row(vec![asset_cell, change_cell, earnings_cell]);
    }

    println!("\n{}\n{}", title, table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message_literal() {
        assert_eq!(NO_DATA_MESSAGE, "Data not as expected.");
    }

    #[test]
    fn test_money_has_two_decimals() {
        assert_eq!(money(11_000.0), "$11000.00");
        assert_eq!(money(9_876.543), "$9876.54");
    }

    #[test]
    fn test_visibility_ratio_floors_at_point_four() {
        assert_eq!(get_visibility_ratio(-500.0, 10_000.0), 0.4);
        assert_eq!(get_visibility_ratio(10_000.0, 10_000.0), 1.0);
    }
}
