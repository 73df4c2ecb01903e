use chrono::NaiveDateTime;

/// The only textual timestamp format crossing the API boundary.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DAY_IN_SECONDS: i64 = 86_400;

/// Parse a boundary timestamp. `None` on anything that doesn't match the
/// fixed format exactly.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok()
}

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_boundary_format() {
        let t = parse_timestamp("2024-01-10 09:15:00").unwrap();
        assert_eq!(format_timestamp(t), "2024-01-10 09:15:00");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(parse_timestamp("2024-01-10T09:15:00").is_none());
        assert!(parse_timestamp("2024-01-10 09:15").is_none());
        assert!(parse_timestamp("2024-13-01 09:15:00").is_none());
        assert!(parse_timestamp("2024-01-10 25:00:00").is_none());
        assert!(parse_timestamp("not a timestamp").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
