//! Profile view-state derivation.
//!
//! The aggregate rows come back string-typed; everything numeric is parsed
//! here with leading-prefix semantics. Ratings sit on a 0-5 scale and are
//! shown as percentages; inputs outside that range produce out-of-range
//! percentages, nothing clamps.

mod gauge;

pub use gauge::{AnimationHandle, RatingGauge};

use crate::db::RatingRow;

/// The user's current course/term picks. Both empty on first render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub course: Option<String>,
    pub term: Option<String>,
}

/// One point of the ratings-over-semesters graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRating {
    pub term: String,
    pub rating: f64,
}

/// Per-row breakdown for a selected course and term.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetail {
    pub avg_response1: f64,
    pub avg_response2: f64,
    pub avg_response3: f64,
    pub rating: f64,
}

/// Everything derived from a course selection: the course's own term list,
/// the graph series, and the gauge value (0 when no row matches).
#[derive(Debug, Clone, PartialEq)]
pub struct CourseView {
    pub terms: Vec<String>,
    pub series: Vec<TermRating>,
    pub detail: Option<CourseDetail>,
    pub gauge: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub name: String,
    pub subject_name: String,
    pub terms: Vec<String>,
    pub courses: Vec<String>,
    pub entries: i64,
    pub professor_rating: f64,
    pub course: Option<CourseView>,
}

/// Derive the profile view state from raw aggregate rows and the current
/// selection. Returns None for an empty row set (no profile to show).
pub fn derive_view_state(rows: &[RatingRow], selection: &Selection) -> Option<ViewState> {
    if rows.is_empty() {
        return None;
    }

    let terms = distinct(rows.iter().map(|r| r.term.clone()));
    let courses = distinct(
        rows.iter()
            .filter_map(|r| parse_int_prefix(&r.course_num))
            .map(|n| n.to_string()),
    );
    let entries = rows
        .iter()
        .filter_map(|r| parse_int_prefix(&r.entries))
        .sum();

    let total: f64 = rows
        .iter()
        .map(|r| parse_float_prefix(&r.overall_rating))
        .sum();
    let professor_rating = to_percent(total / rows.len() as f64);

    let course = selection
        .course
        .as_deref()
        .map(|c| derive_course_view(rows, c, selection.term.as_deref()));

    Some(ViewState {
        name: rows[0].name.clone(),
        subject_name: rows[0].subject_name.clone(),
        terms,
        courses,
        entries,
        professor_rating,
        course,
    })
}

fn derive_course_view(rows: &[RatingRow], course: &str, term: Option<&str>) -> CourseView {
    let Some(wanted) = parse_int_prefix(course) else {
        // Unparsable selection matches nothing
        return CourseView {
            terms: Vec::new(),
            series: Vec::new(),
            detail: None,
            gauge: 0.0,
        };
    };

    let filtered: Vec<&RatingRow> = rows
        .iter()
        .filter(|r| parse_int_prefix(&r.course_num) == Some(wanted))
        .collect();

    let terms = distinct(filtered.iter().map(|r| r.term.clone()));
    let series: Vec<TermRating> = filtered
        .iter()
        .map(|r| TermRating {
            term: r.term.clone(),
            rating: to_percent(parse_float_prefix(&r.overall_rating)),
        })
        .collect();

    // No explicit term yet: the first of the course's terms is shown
    let effective_term = term.or(terms.first().map(String::as_str));
    let detail = effective_term
        .and_then(|t| filtered.iter().find(|r| r.term == t))
        .map(|r| CourseDetail {
            avg_response1: parse_float_prefix(&r.avg_response1),
            avg_response2: parse_float_prefix(&r.avg_response2),
            avg_response3: parse_float_prefix(&r.avg_response3),
            rating: to_percent(parse_float_prefix(&r.overall_rating)),
        });
    let gauge = detail.as_ref().map(|d| d.rating).unwrap_or(0.0);

    CourseView {
        terms,
        series,
        detail,
        gauge,
    }
}

/// Scale a 0-5 rating to a rounded percentage.
fn to_percent(rating: f64) -> f64 {
    (rating / 5.0 * 100.0).round()
}

/// Distinct values ordered by first occurrence.
fn distinct<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Leading-integer-prefix parse: "1301" -> 1301, "1301H" -> 1301,
/// "abc" -> None.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Leading-float-prefix parse: "4.35" -> 4.35, "4.5/5" -> 4.5. Anything
/// without a numeric prefix becomes NaN, which flows through the
/// percentage math unclamped.
fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();

    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;
    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = end - dot - 1;
        if int_digits == 0 && frac_digits == 0 {
            return f64::NAN;
        }
    } else if int_digits == 0 {
        return f64::NAN;
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(term: &str, course: &str, entries: &str, overall: &str) -> RatingRow {
        RatingRow {
            name: "Turing".to_string(),
            subject_name: "Computer Science".to_string(),
            term: term.to_string(),
            course_num: course.to_string(),
            entries: entries.to_string(),
            avg_response1: "4.1".to_string(),
            avg_response2: "4.3".to_string(),
            avg_response3: "4.0".to_string(),
            overall_rating: overall.to_string(),
        }
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("1301"), Some(1301));
        assert_eq!(parse_int_prefix("  1301H"), Some(1301));
        assert_eq!(parse_int_prefix("-42"), Some(-42));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("4.35"), 4.35);
        assert_eq!(parse_float_prefix("4.5/5"), 4.5);
        assert_eq!(parse_float_prefix(" 4"), 4.0);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("5."), 5.0);
        assert!(parse_float_prefix("N/A").is_nan());
        assert!(parse_float_prefix("").is_nan());
    }

    #[test]
    fn test_empty_rows_is_no_profile() {
        assert_eq!(derive_view_state(&[], &Selection::default()), None);
    }

    #[test]
    fn test_professor_rating_is_mean_percentage() {
        // round(((4.0 + 5.0) / 2) / 5 * 100) = 90
        let rows = vec![
            row("Fall 2022", "1301", "10", "4.0"),
            row("Spring 2023", "1301", "12", "5.0"),
        ];
        let state = derive_view_state(&rows, &Selection::default()).unwrap();

        assert_eq!(state.professor_rating, 90.0);
        assert_eq!(state.entries, 22);
        assert_eq!(state.terms, vec!["Fall 2022", "Spring 2023"]);
        assert_eq!(state.courses, vec!["1301"]);
        assert!(state.course.is_none());
    }

    #[test]
    fn test_distinct_preserves_first_occurrence_order() {
        let rows = vec![
            row("Spring 2023", "2350", "5", "4.0"),
            row("Fall 2022", "1301", "5", "4.0"),
            row("Spring 2023", "1301", "5", "4.0"),
        ];
        let state = derive_view_state(&rows, &Selection::default()).unwrap();

        assert_eq!(state.terms, vec!["Spring 2023", "Fall 2022"]);
        assert_eq!(state.courses, vec!["2350", "1301"]);
    }

    #[test]
    fn test_course_selection_filters_terms_and_series() {
        let rows = vec![
            row("Fall 2022", "1301", "10", "4.0"),
            row("Spring 2023", "1301", "12", "5.0"),
            row("Fall 2022", "2350", "8", "3.0"),
        ];
        let selection = Selection {
            course: Some("1301".to_string()),
            term: Some("Spring 2023".to_string()),
        };
        let state = derive_view_state(&rows, &selection).unwrap();
        let course = state.course.unwrap();

        assert_eq!(course.terms, vec!["Fall 2022", "Spring 2023"]);
        assert_eq!(
            course.series,
            vec![
                TermRating {
                    term: "Fall 2022".to_string(),
                    rating: 80.0
                },
                TermRating {
                    term: "Spring 2023".to_string(),
                    rating: 100.0
                },
            ]
        );
        assert_eq!(course.gauge, 100.0);
        assert_eq!(course.detail.unwrap().avg_response1, 4.1);
    }

    #[test]
    fn test_course_with_no_rows_resets_gauge() {
        let rows = vec![row("Fall 2022", "1301", "10", "4.0")];
        let selection = Selection {
            course: Some("9999".to_string()),
            term: None,
        };
        let state = derive_view_state(&rows, &selection).unwrap();
        let course = state.course.unwrap();

        assert!(course.terms.is_empty());
        assert!(course.series.is_empty());
        assert!(course.detail.is_none());
        assert_eq!(course.gauge, 0.0);
    }

    #[test]
    fn test_unparsable_course_selection_matches_nothing() {
        let rows = vec![row("Fall 2022", "1301", "10", "4.0")];
        let selection = Selection {
            course: Some("advanced".to_string()),
            term: None,
        };
        let state = derive_view_state(&rows, &selection).unwrap();
        assert_eq!(state.course.unwrap().gauge, 0.0);
    }

    #[test]
    fn test_first_term_is_auto_selected() {
        let rows = vec![
            row("Fall 2022", "1301", "10", "4.0"),
            row("Spring 2023", "1301", "12", "5.0"),
        ];
        let selection = Selection {
            course: Some("1301".to_string()),
            term: None,
        };
        let state = derive_view_state(&rows, &selection).unwrap();
        let course = state.course.unwrap();

        // "Fall 2022" comes first, so its row feeds the detail pane
        assert_eq!(course.gauge, 80.0);
    }

    #[test]
    fn test_out_of_range_rating_is_not_clamped() {
        let rows = vec![row("Fall 2022", "1301", "10", "7.5")];
        let state = derive_view_state(&rows, &Selection::default()).unwrap();
        assert_eq!(state.professor_rating, 150.0);
    }

    #[test]
    fn test_unparsable_rating_propagates_nan() {
        let rows = vec![
            row("Fall 2022", "1301", "10", "4.0"),
            row("Spring 2023", "1301", "12", "N/A"),
        ];
        let state = derive_view_state(&rows, &Selection::default()).unwrap();
        assert!(state.professor_rating.is_nan());
    }

    #[test]
    fn test_unparsable_course_numbers_are_omitted() {
        let rows = vec![
            row("Fall 2022", "1301", "10", "4.0"),
            row("Fall 2022", "TBD", "10", "4.0"),
        ];
        let state = derive_view_state(&rows, &Selection::default()).unwrap();
        assert_eq!(state.courses, vec!["1301"]);
    }
}
