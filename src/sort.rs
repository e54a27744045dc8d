//! Row ordering for click-to-sort headers.

use std::cmp::Ordering;

use crate::types::{Row, SortDirection};

/// Parse the leading number of a string the way a lenient float parser does:
/// `"12 kg"` is 12, `"-3.5e2x"` is -350, `"$5"` has no number.
pub fn leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Optional exponent, only taken if it has digits
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s.get(..end)?.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Normalized sort key text of a cell.
fn sort_text(row: &Row, column: usize) -> Option<String> {
    row.cell(column)
        .map(|cell| cell.text_content().trim().to_lowercase())
}

/// Compare two rows on `column` in ascending order.
///
/// Numeric when both cells start with a finite number, otherwise by
/// case-folded text. A missing cell on either side compares equal.
pub fn compare_rows(a: &Row, b: &Row, column: usize) -> Ordering {
    let (Some(text_a), Some(text_b)) = (sort_text(a, column), sort_text(b, column)) else {
        return Ordering::Equal;
    };
    match (leading_number(&text_a), leading_number(&text_b)) {
        (Some(num_a), Some(num_b)) => num_a.total_cmp(&num_b),
        _ => text_a.cmp(&text_b),
    }
}

/// Stable in-place sort of `rows` by `column`.
pub fn sort_rows(rows: &mut [Row], column: usize, direction: SortDirection) {
    rows.sort_by(|a, b| match direction {
        SortDirection::Asc => compare_rows(a, b, column),
        SortDirection::Desc => compare_rows(b, a, column),
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::TableCell;
    use test_case::test_case;

    fn texts(rows: &[Row], column: usize) -> Vec<String> {
        rows.iter()
            .map(|r| r.cell(column).map(|c| c.text_content()).unwrap_or_default())
            .collect()
    }

    #[test_case("12", Some(12.0); "integer")]
    #[test_case("  -3.5e2x", Some(-350.0); "exponent with trailing text")]
    #[test_case("12 kg", Some(12.0); "unit suffix")]
    #[test_case(".5", Some(0.5); "leading dot")]
    #[test_case("1e", Some(1.0); "dangling exponent")]
    #[test_case("$5", None; "currency prefix")]
    #[test_case("abc", None; "text")]
    #[test_case("-", None; "bare sign")]
    #[test_case("", None; "empty")]
    fn test_leading_number(input: &str, expected: Option<f64>) {
        assert_eq!(leading_number(input), expected);
    }

    #[test]
    fn test_numeric_beats_lexicographic() {
        let mut rows = vec![
            Row::from_texts(["10"]),
            Row::from_texts(["9"]),
            Row::from_texts(["100"]),
        ];
        sort_rows(&mut rows, 0, SortDirection::Asc);
        assert_eq!(texts(&rows, 0), ["9", "10", "100"]);
        sort_rows(&mut rows, 0, SortDirection::Desc);
        assert_eq!(texts(&rows, 0), ["100", "10", "9"]);
    }

    #[test]
    fn test_text_is_case_folded() {
        let mut rows = vec![
            Row::from_texts(["banana"]),
            Row::from_texts(["Apple"]),
            Row::from_texts(["cherry"]),
        ];
        sort_rows(&mut rows, 0, SortDirection::Asc);
        assert_eq!(texts(&rows, 0), ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_missing_cell_compares_equal() {
        let short = Row::new(vec![TableCell::text("x")]);
        let long = Row::from_texts(["y", "b"]);
        assert_eq!(compare_rows(&short, &long, 1), Ordering::Equal);
        assert_eq!(compare_rows(&long, &short, 1), Ordering::Equal);
    }

    #[test]
    fn test_stable_for_ties() {
        let mut rows = vec![
            Row::from_texts(["b", "1"]),
            Row::from_texts(["a", "2"]),
            Row::from_texts(["b", "3"]),
            Row::from_texts(["a", "4"]),
        ];
        sort_rows(&mut rows, 0, SortDirection::Asc);
        assert_eq!(texts(&rows, 1), ["2", "4", "1", "3"]);
    }
}
