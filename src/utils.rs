use chrono::NaiveDate;

pub fn numbers_to_csv(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_number_list(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Draw dates arrive from upstream as YYYY-MM-DD; anything else is
/// rejected before it reaches the table.
pub fn is_valid_draw_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_to_csv() {
        assert_eq!(numbers_to_csv(&[3, 9, 17, 24, 38, 41]), "3,9,17,24,38,41");
        assert_eq!(numbers_to_csv(&[]), "");
    }

    #[test]
    fn test_format_number_list() {
        assert_eq!(format_number_list(&[1, 2, 3]), "1, 2, 3");
    }

    #[test]
    fn test_is_valid_draw_date() {
        assert!(is_valid_draw_date("2025-01-04"));
        assert!(!is_valid_draw_date("04/01/2025"));
        assert!(!is_valid_draw_date("2025-13-40"));
    }
}
