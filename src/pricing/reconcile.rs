//! Departure catalog reconciliation.
//!
//! Pure merge of the upstream platform's departure/rate catalog into the
//! locally stored one. Departures match by the platform's external id; rates
//! match by their stable (title, room, hotel category) key. Matched rates
//! keep the flight augmentations attached by earlier fetches; rates that no
//! longer appear upstream are dropped along with their augmentations.
//! Running the merge twice against an unchanged catalog produces no net diff.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::inventory::UpstreamDeparture;

use super::models::{Departure, Rate};

/// Result of one reconciliation pass
#[derive(Debug)]
pub struct MergeOutcome {
    pub departures: Vec<Departure>,
    pub departures_count: usize,
    pub rates_count: usize,
}

/// Merge the upstream catalog into the local one.
///
/// The returned list is the full post-merge catalog for the package, in
/// upstream order; persistence replaces the stored set with it wholesale.
pub fn merge_departures(
    local: Vec<Departure>,
    upstream: &[UpstreamDeparture],
    package_id: Uuid,
    now: DateTime<Utc>,
) -> MergeOutcome {
    let mut merged = Vec::with_capacity(upstream.len());
    let mut rates_count = 0;

    for incoming in upstream {
        let existing = local
            .iter()
            .find(|departure| departure.external_id == incoming.id);

        let rates: Vec<Rate> = incoming
            .rates
            .iter()
            .map(|upstream_rate| {
                let key = (
                    upstream_rate.title.as_str(),
                    upstream_rate.room.as_str(),
                    upstream_rate.hotel_category.as_deref(),
                );
                let flights = existing
                    .and_then(|departure| {
                        departure.rates.iter().find(|rate| rate.key() == key)
                    })
                    .map(|rate| rate.flights.clone())
                    .unwrap_or_default();

                Rate {
                    title: upstream_rate.title.clone(),
                    room: upstream_rate.room.clone(),
                    hotel_category: upstream_rate.hotel_category.clone(),
                    land_price: upstream_rate.price,
                    flights,
                }
            })
            .collect();

        rates_count += rates.len();
        merged.push(Departure {
            id: existing.map(|departure| departure.id).unwrap_or_else(Uuid::new_v4),
            package_id,
            external_id: incoming.id.clone(),
            departure_date: incoming.date,
            nights: incoming.nights,
            synced_at: now,
            rates,
        });
    }

    MergeOutcome {
        departures_count: merged.len(),
        rates_count,
        departures: merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::UpstreamRate;
    use crate::pricing::models::FlightAugmentation;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn upstream(id: &str, day: u32, rates: Vec<UpstreamRate>) -> UpstreamDeparture {
        UpstreamDeparture {
            id: id.to_string(),
            date: date(day),
            nights: 7,
            rates,
        }
    }

    fn upstream_rate(title: &str, room: &str, price: rust_decimal::Decimal) -> UpstreamRate {
        UpstreamRate {
            title: title.to_string(),
            room: room.to_string(),
            hotel_category: None,
            price,
        }
    }

    fn augmentation(code: &str) -> FlightAugmentation {
        FlightAugmentation {
            airport_code: code.to_string(),
            flight_price: dec!(300),
            combined_price: dec!(880),
        }
    }

    #[test]
    fn test_merge_creates_departures_and_rates() {
        let catalog = vec![upstream(
            "dep-1",
            10,
            vec![
                upstream_rate("Standard", "double", dec!(500)),
                upstream_rate("Standard", "single", dec!(620)),
            ],
        )];
        let outcome = merge_departures(vec![], &catalog, Uuid::new_v4(), Utc::now());

        assert_eq!(outcome.departures_count, 1);
        assert_eq!(outcome.rates_count, 2);
        assert!(outcome.departures[0].rates.iter().all(|r| r.flights.is_empty()));
    }

    #[test]
    fn test_merge_preserves_augmentations_on_matched_rates() {
        let package_id = Uuid::new_v4();
        let catalog = vec![upstream(
            "dep-1",
            10,
            vec![upstream_rate("Standard", "double", dec!(500))],
        )];

        let first = merge_departures(vec![], &catalog, package_id, Utc::now());
        let mut local = first.departures;
        local[0].rates[0].flights.push(augmentation("LGW"));

        // Upstream bumps the land price but the rate key is unchanged
        let catalog = vec![upstream(
            "dep-1",
            10,
            vec![upstream_rate("Standard", "double", dec!(525))],
        )];
        let second = merge_departures(local.clone(), &catalog, package_id, Utc::now());

        let rate = &second.departures[0].rates[0];
        assert_eq!(rate.land_price, dec!(525));
        assert_eq!(rate.flights, vec![augmentation("LGW")]);
        assert_eq!(second.departures[0].id, local[0].id);
    }

    #[test]
    fn test_merge_drops_vanished_rates_with_their_augmentations() {
        let package_id = Uuid::new_v4();
        let catalog = vec![upstream(
            "dep-1",
            10,
            vec![
                upstream_rate("Standard", "double", dec!(500)),
                upstream_rate("Deluxe", "double", dec!(700)),
            ],
        )];
        let first = merge_departures(vec![], &catalog, package_id, Utc::now());
        let mut local = first.departures;
        local[0].rates[1].flights.push(augmentation("LGW"));

        // Deluxe disappears upstream; a new Premier rate appears
        let catalog = vec![upstream(
            "dep-1",
            10,
            vec![
                upstream_rate("Standard", "double", dec!(500)),
                upstream_rate("Premier", "double", dec!(800)),
            ],
        )];
        let second = merge_departures(local, &catalog, package_id, Utc::now());

        let rates = &second.departures[0].rates;
        assert_eq!(rates.len(), 2);
        assert!(rates.iter().all(|r| r.title != "Deluxe"));
        let premier = rates.iter().find(|r| r.title == "Premier").unwrap();
        assert!(premier.flights.is_empty());
    }

    #[test]
    fn test_merge_drops_departures_absent_upstream() {
        let package_id = Uuid::new_v4();
        let catalog = vec![
            upstream("dep-1", 10, vec![upstream_rate("Standard", "double", dec!(500))]),
            upstream("dep-2", 17, vec![upstream_rate("Standard", "double", dec!(520))]),
        ];
        let first = merge_departures(vec![], &catalog, package_id, Utc::now());

        let catalog = vec![upstream(
            "dep-2",
            17,
            vec![upstream_rate("Standard", "double", dec!(520))],
        )];
        let second = merge_departures(first.departures, &catalog, package_id, Utc::now());

        assert_eq!(second.departures_count, 1);
        assert_eq!(second.departures[0].external_id, "dep-2");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let package_id = Uuid::new_v4();
        let catalog = vec![
            upstream(
                "dep-1",
                10,
                vec![
                    upstream_rate("Standard", "double", dec!(500)),
                    upstream_rate("Standard", "single", dec!(620)),
                ],
            ),
            upstream("dep-2", 17, vec![upstream_rate("Standard", "double", dec!(520))]),
        ];

        let first = merge_departures(vec![], &catalog, package_id, Utc::now());
        let mut local = first.departures;
        local[0].rates[0].flights.push(augmentation("LGW"));

        let now = Utc::now();
        let second = merge_departures(local.clone(), &catalog, package_id, now);
        let third = merge_departures(second.departures.clone(), &catalog, package_id, now);

        assert_eq!(second.departures_count, third.departures_count);
        assert_eq!(second.rates_count, third.rates_count);
        assert_eq!(second.departures, third.departures);
        assert_eq!(
            third.departures[0].rates[0].flights,
            vec![augmentation("LGW")]
        );
    }
}
