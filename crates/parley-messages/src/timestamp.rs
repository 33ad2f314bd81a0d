use chrono::{DateTime, SecondsFormat, Utc};

/// Encode an instant for storage, e.g. `2026-10-16T09:30:00.000000Z`.
///
/// The width is fixed so that string order matches time order; `sent_at`
/// range filters compare the stored strings.
pub fn encode(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode any RFC 3339 instant into UTC.
pub fn decode(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_encode_format() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        assert_eq!(encode(instant), "2026-10-16T09:30:00.000000Z");
    }

    #[test]
    fn test_string_order_matches_time_order() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let instants = [
            base,
            base + Duration::microseconds(1),
            base + Duration::milliseconds(999),
            base + Duration::seconds(1),
            base + Duration::days(40),
        ];
        for pair in instants.windows(2) {
            assert!(encode(pair[0]) < encode(pair[1]));
        }
    }

    #[test]
    fn test_decode_accepts_other_precisions_and_offsets() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        assert_eq!(decode("2026-10-16T09:30:00Z").unwrap(), expected);
        assert_eq!(decode("2026-10-16T11:30:00+02:00").unwrap(), expected);
        assert_eq!(
            decode("2026-10-16T09:30:00.123Z").unwrap(),
            expected + Duration::milliseconds(123)
        );
        assert!(decode("yesterday").is_err());
    }

    #[test]
    fn test_round_trip_keeps_microseconds() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
            + Duration::microseconds(123_456);
        assert_eq!(decode(&encode(instant)).unwrap(), instant);
    }
}
