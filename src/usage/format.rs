//! Cost formatting, applied only when a report is rendered.

use rust_decimal::Decimal;

/// Fixed precision before trailing zeros are stripped
pub const COST_SCALE: u32 = 10;

/// Render a cost with ten decimal places, then strip trailing zeros and a
/// trailing decimal point: `12.5000000000` -> `12.5`, `10.0` -> `10`.
pub fn format_cost(cost: Decimal) -> String {
    let rounded = cost.round_dp(COST_SCALE);
    if rounded.is_zero() {
        return "0".to_string();
    }
    let text = format!("{:.*}", COST_SCALE as usize, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Cost cell of a report row, flagging unparsable contributions
pub fn render_cost(cost: Decimal, unparsable: usize) -> String {
    if unparsable == 0 {
        format_cost(cost)
    } else {
        format!("{} (unparsable: {})", format_cost(cost), unparsable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::record::parse_cost;
    use rust_decimal_macros::dec;

    /// Reformat cost text the way an exported CSV cell would be re-read
    fn format_cost_text(text: &str) -> String {
        match parse_cost(text) {
            Some(cost) => format_cost(cost),
            None => text.to_string(),
        }
    }

    #[test]
    fn test_format_cost_strips_trailing_zeros() {
        assert_eq!(format_cost(dec!(12.50)), "12.5");
        assert_eq!(format_cost(dec!(12.5000000000)), "12.5");
        assert_eq!(format_cost(dec!(10.0)), "10");
        assert_eq!(format_cost(dec!(0.0001)), "0.0001");
        assert_eq!(format_cost(dec!(0)), "0");
    }

    #[test]
    fn test_format_cost_rounds_to_ten_places() {
        assert_eq!(format_cost(dec!(0.123456789012)), "0.123456789");
        assert_eq!(format_cost(dec!(0.00000000004)), "0");
        assert_eq!(format_cost(dec!(-0.00000000004)), "0");
        assert_eq!(format_cost(dec!(-3.20)), "-3.2");
    }

    #[test]
    fn test_format_cost_text_is_idempotent() {
        for text in ["12.5", "10", "0.0001", "-3.2", "1500"] {
            assert_eq!(format_cost_text(text), text);
            assert_eq!(format_cost_text(&format_cost_text(text)), text);
        }
        assert_eq!(format_cost_text("12.50"), "12.5");
        assert_eq!(format_cost_text("n/a"), "n/a");
    }

    #[test]
    fn test_render_cost_flags_unparsable() {
        assert_eq!(render_cost(dec!(2.0), 0), "2");
        assert_eq!(render_cost(dec!(2.0), 1), "2 (unparsable: 1)");
    }
}
