//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::Season;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Compose a sell price from a land cost, a flight cost and a markup.
///
/// The markup percentage applies to the *sum*, never to the land and flight
/// parts separately, so a markup change is auditable as one multiplier. Sell
/// prices are display prices in whole currency units; no fractional pence are
/// persisted.
pub fn compose(land_cost: Decimal, flight_cost: Decimal, markup_percent: Decimal) -> Decimal {
    let multiplier = Decimal::ONE + markup_percent / Decimal::ONE_HUNDRED;
    round_money((land_cost + flight_cost) * multiplier, 0)
}

/// Sell price for a land-only entry
pub fn compose_land_only(land_cost: Decimal, markup_percent: Decimal) -> Decimal {
    compose(land_cost, Decimal::ZERO, markup_percent)
}

/// Find the season covering a travel date.
///
/// Seasons may overlap; the most recently created one wins. A date no season
/// covers returns `None` - callers skip the date rather than pricing it with
/// a fallback value.
pub fn find_season(seasons: &[Season], date: NaiveDate) -> Option<&Season> {
    seasons
        .iter()
        .filter(|season| season.covers(date))
        .max_by_key(|season| season.created_at)
}

/// Validate season fields shared by create and edit
pub fn validate_season(
    label: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    land_cost: Decimal,
) -> Result<(), String> {
    if label.trim().is_empty() {
        return Err("season label must not be blank".to_string());
    }
    if start_date > end_date {
        return Err("season start date is after its end date".to_string());
    }
    if land_cost <= Decimal::ZERO {
        return Err("land cost must be positive".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn season(start: NaiveDate, end: NaiveDate, land: Decimal, age_days: i64) -> Season {
        Season {
            id: Uuid::new_v4(),
            package_id: Uuid::new_v4(),
            label: "Test".to_string(),
            start_date: start,
            end_date: end,
            land_cost: land,
            hotel_cost: None,
            notes: String::new(),
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(4.5), 0), dec!(4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(879.6), 0), dec!(880));
        assert_eq!(round_money(dec!(879.4), 0), dec!(879));
    }

    // ==================== compose tests ====================

    #[test]
    fn test_compose_typical_fare() {
        // Season land 500, LGW -> DEL fare 300, 10% markup
        assert_eq!(compose(dec!(500), dec!(300), dec!(10)), dec!(880));
    }

    #[test]
    fn test_compose_land_only_defaults_flight_to_zero() {
        assert_eq!(compose_land_only(dec!(500), dec!(10)), dec!(550));
        assert_eq!(
            compose_land_only(dec!(500), dec!(10)),
            compose(dec!(500), Decimal::ZERO, dec!(10))
        );
    }

    #[test]
    fn test_compose_zero_markup() {
        assert_eq!(compose(dec!(500), dec!(300), Decimal::ZERO), dec!(800));
    }

    #[test]
    fn test_compose_markup_applies_to_sum() {
        // (500 + 300) * 1.15, not 500 * 1.15 + 300
        assert_eq!(compose(dec!(500), dec!(300), dec!(15)), dec!(920));
    }

    #[test]
    fn test_compose_rounds_to_whole_units() {
        // (333 + 0) * 1.1 = 366.3
        assert_eq!(compose(dec!(333), Decimal::ZERO, dec!(10)), dec!(366));
    }

    #[test]
    fn test_markup_monotonicity() {
        let markups = [dec!(0), dec!(2.5), dec!(10), dec!(12), dec!(25), dec!(40)];
        for pair in markups.windows(2) {
            let low = compose(dec!(499), dec!(301), pair[0]);
            let high = compose(dec!(499), dec!(301), pair[1]);
            assert!(low <= high, "markup {} vs {}", pair[0], pair[1]);
        }
    }

    // ==================== find_season tests ====================

    #[test]
    fn test_find_season_match() {
        let seasons = vec![
            season(date(2025, 6, 1), date(2025, 8, 31), dec!(500), 10),
            season(date(2025, 9, 1), date(2025, 10, 31), dec!(450), 10),
        ];
        let found = find_season(&seasons, date(2025, 7, 10)).unwrap();
        assert_eq!(found.land_cost, dec!(500));
    }

    #[test]
    fn test_find_season_gap_returns_none() {
        let seasons = vec![season(date(2025, 6, 1), date(2025, 8, 31), dec!(500), 10)];
        assert!(find_season(&seasons, date(2025, 12, 25)).is_none());
    }

    #[test]
    fn test_find_season_overlap_newest_created_wins() {
        let seasons = vec![
            season(date(2025, 6, 1), date(2025, 8, 31), dec!(500), 30),
            season(date(2025, 7, 1), date(2025, 7, 31), dec!(650), 1),
        ];
        let found = find_season(&seasons, date(2025, 7, 10)).unwrap();
        assert_eq!(found.land_cost, dec!(650));

        // Outside the override window the older season still applies
        let found = find_season(&seasons, date(2025, 8, 15)).unwrap();
        assert_eq!(found.land_cost, dec!(500));
    }

    // ==================== validate_season tests ====================

    #[test]
    fn test_validate_season_rejects_inverted_range() {
        let result = validate_season("Summer", date(2025, 9, 1), date(2025, 6, 1), dec!(500));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_season_rejects_non_positive_cost() {
        assert!(validate_season("Summer", date(2025, 6, 1), date(2025, 9, 1), dec!(0)).is_err());
        assert!(validate_season("Summer", date(2025, 6, 1), date(2025, 9, 1), dec!(-5)).is_err());
    }

    #[test]
    fn test_validate_season_rejects_blank_label() {
        assert!(validate_season("  ", date(2025, 6, 1), date(2025, 9, 1), dec!(500)).is_err());
    }
}
