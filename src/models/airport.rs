//! UK origin airport directory
//!
//! The known-airport list backs CSV validation and display names on ledger
//! entries. Origins are the UK departure airports the business sells from;
//! destination codes come from the operator and are not validated here.

/// Departure airports offered to customers, as `(IATA code, display name)`.
pub const UK_ORIGIN_AIRPORTS: &[(&str, &str)] = &[
    ("ABZ", "Aberdeen"),
    ("BFS", "Belfast International"),
    ("BHX", "Birmingham"),
    ("BRS", "Bristol"),
    ("CWL", "Cardiff"),
    ("EDI", "Edinburgh"),
    ("EMA", "East Midlands"),
    ("GLA", "Glasgow"),
    ("LBA", "Leeds Bradford"),
    ("LCY", "London City"),
    ("LGW", "London Gatwick"),
    ("LHR", "London Heathrow"),
    ("LPL", "Liverpool"),
    ("LTN", "London Luton"),
    ("MAN", "Manchester"),
    ("NCL", "Newcastle"),
    ("SOU", "Southampton"),
    ("STN", "London Stansted"),
];

/// Display name for a known origin airport code
pub fn airport_name(code: &str) -> Option<&'static str> {
    UK_ORIGIN_AIRPORTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Whether a code appears in the known-airport list
pub fn is_known_airport(code: &str) -> bool {
    airport_name(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_airports() {
        assert_eq!(airport_name("LGW"), Some("London Gatwick"));
        assert_eq!(airport_name("MAN"), Some("Manchester"));
        assert!(is_known_airport("LHR"));
    }

    #[test]
    fn test_unknown_airport() {
        assert_eq!(airport_name("XXX"), None);
        assert!(!is_known_airport("lgw")); // codes are upper-case
    }

    #[test]
    fn test_directory_sorted_by_code() {
        let codes: Vec<&str> = UK_ORIGIN_AIRPORTS.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
