//! Tabular layout of records: fixed header, fixed column order, and the exam
//! name/date reflow that lines up exam N's name with exam N's date.

use lazy_static::lazy_static;
use regex::Regex;

use crate::record::CollegeRecord;

pub const HEADER: [&str; 10] = [
    "Name",
    "Location",
    "Type",
    "Annual Fee",
    "Entrance Exam Required",
    "Entrance Exam Date",
    "Flagship Course",
    "Website",
    "Eligibility",
    "Approved By",
];

pub const SOURCE_URL_HEADER: &str = "Source URL";

lazy_static! {
    static ref NAME_SEPARATORS: Regex =
        Regex::new(r"(?i)\s*(?:[,/;&|]|\band\b)\s*").expect("valid name separator pattern");

    // Commas and bare slashes appear inside dates ("April 20, 2025", "20/04/2025"),
    // so dates only split on the unambiguous separators here; commas are
    // handled in `split_exam_dates`.
    static ref DATE_SEPARATORS: Regex =
        Regex::new(r"(?i)\s*(?:[;&|]|\band\b|\s/\s)\s*").expect("valid date separator pattern");

    static ref LEADING_YEAR: Regex = Regex::new(r"^\d{4}\b").expect("valid year pattern");

    static ref ANY_YEAR: Regex = Regex::new(r"\b\d{4}\b").expect("valid year pattern");
}

fn split_nonempty<'a>(re: &Regex, text: &'a str) -> Vec<&'a str> {
    re.split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Split a multi-exam name field.
pub fn split_exam_names(text: &str) -> Vec<String> {
    split_nonempty(&NAME_SEPARATORS, text)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Split a multi-exam date field without breaking "Month D, YYYY" dates.
///
/// A comma piece starting with a year only completes the previous piece when
/// that piece has no year of its own, so ISO dates still split on commas.
pub fn split_exam_dates(text: &str) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for chunk in split_nonempty(&DATE_SEPARATORS, text) {
        for piece in chunk.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match dates.last_mut() {
                Some(prev) if LEADING_YEAR.is_match(piece) && !ANY_YEAR.is_match(prev) => {
                    prev.push_str(", ");
                    prev.push_str(piece);
                }
                _ => dates.push(piece.to_string()),
            }
        }
    }
    dates
}

/// Reflow exam names and dates into aligned newline-joined lines.
///
/// Only applies when there is more than one exam name. Missing dates repeat
/// the last known date; missing names are left blank.
pub fn reflow_exams(names: Option<&str>, dates: Option<&str>) -> (String, String) {
    let names_text = names.unwrap_or_default();
    let dates_text = dates.unwrap_or_default();

    let exam_names = split_exam_names(names_text);
    if exam_names.len() <= 1 {
        return (names_text.to_string(), dates_text.to_string());
    }

    let exam_dates = split_exam_dates(dates_text);
    let lines = exam_names.len().max(exam_dates.len());

    let name_lines: Vec<&str> = (0..lines)
        .map(|i| exam_names.get(i).map(String::as_str).unwrap_or(""))
        .collect();

    let date_lines: Vec<&str> = match exam_dates.last() {
        None => Vec::new(),
        Some(last) => (0..lines)
            .map(|i| exam_dates.get(i).unwrap_or(last).as_str())
            .collect(),
    };

    (name_lines.join("\n"), date_lines.join("\n"))
}

/// Header plus one row per record.
///
/// The source URL column is only present when at least one record has one.
pub fn build_rows(records: &[CollegeRecord]) -> Vec<Vec<String>> {
    let with_source = records.iter().any(|r| r.source_url.is_some());

    let mut header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    if with_source {
        header.push(SOURCE_URL_HEADER.to_string());
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(header);

    for record in records {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        let (exams, dates) = reflow_exams(
            record.entrance_exam_required.as_deref(),
            record.entrance_exam_date.as_deref(),
        );

        let mut row = vec![
            record.name.clone(),
            text(&record.location),
            text(&record.institution_type),
            text(&record.annual_fee),
            exams,
            dates,
            text(&record.flagship_course),
            text(&record.website),
            text(&record.eligibility),
            text(&record.approved_by),
        ];
        if with_source {
            row.push(text(&record.source_url));
        }
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_exams_single_date_repeats_date() {
        let (names, dates) = reflow_exams(Some("JEE Main, JEE Advanced"), Some("20 April 2025"));
        assert_eq!(names, "JEE Main\nJEE Advanced");
        assert_eq!(dates, "20 April 2025\n20 April 2025");
    }

    #[test]
    fn test_single_exam_is_untouched() {
        let (names, dates) = reflow_exams(Some("NEET-UG"), Some("May 4, 2025"));
        assert_eq!(names, "NEET-UG");
        assert_eq!(dates, "May 4, 2025");
    }

    #[test]
    fn test_all_name_separators() {
        assert_eq!(
            split_exam_names("CAT / XAT; GMAT & MAT | CMAT and SNAP"),
            ["CAT", "XAT", "GMAT", "MAT", "CMAT", "SNAP"]
        );
    }

    #[test]
    fn test_and_inside_a_word_does_not_split() {
        assert_eq!(split_exam_names("Andhra EAPCET"), ["Andhra EAPCET"]);
    }

    #[test]
    fn test_dates_keep_month_day_year_commas() {
        assert_eq!(
            split_exam_dates("January 22, 2025, May 18, 2025"),
            ["January 22, 2025", "May 18, 2025"]
        );
        assert_eq!(split_exam_dates("20/04/2025; 18/05/2025"), ["20/04/2025", "18/05/2025"]);
    }

    #[test]
    fn test_dates_split_year_first_dates_on_commas() {
        assert_eq!(
            split_exam_dates("2025-04-20, 2025-05-18"),
            ["2025-04-20", "2025-05-18"]
        );

        let (names, dates) = reflow_exams(
            Some("JEE Main, JEE Advanced"),
            Some("2025-04-20, 2025-05-18"),
        );
        assert_eq!(names, "JEE Main\nJEE Advanced");
        assert_eq!(dates, "2025-04-20\n2025-05-18");
    }

    #[test]
    fn test_aligned_dates() {
        let (names, dates) = reflow_exams(
            Some("JEE Main and JEE Advanced"),
            Some("January 22, 2025 | May 18, 2025"),
        );
        assert_eq!(names, "JEE Main\nJEE Advanced");
        assert_eq!(dates, "January 22, 2025\nMay 18, 2025");
    }

    #[test]
    fn test_more_dates_than_names_pads_names() {
        let (names, dates) = reflow_exams(Some("CLAT, AILET"), Some("1 Dec 2024; 8 Dec 2024; 15 Dec 2024"));
        assert_eq!(names, "CLAT\nAILET\n");
        assert_eq!(dates, "1 Dec 2024\n8 Dec 2024\n15 Dec 2024");
    }

    #[test]
    fn test_multiple_exams_without_dates() {
        let (names, dates) = reflow_exams(Some("CAT, XAT"), None);
        assert_eq!(names, "CAT\nXAT");
        assert_eq!(dates, "");
    }

    #[test]
    fn test_rows_without_sources_have_ten_columns() {
        let mut record = CollegeRecord::named("IIT Delhi");
        record.location = Some("New Delhi".into());
        let rows = build_rows(&[record]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HEADER.to_vec());
        assert_eq!(rows[1].len(), 10);
        assert_eq!(rows[1][0], "IIT Delhi");
        assert_eq!(rows[1][1], "New Delhi");
        assert_eq!(rows[1][2], "");
    }

    #[test]
    fn test_any_source_adds_source_column_to_every_row() {
        let mut with = CollegeRecord::named("A");
        with.source_url = Some("https://nirfindia.org".into());
        let rows = build_rows(&[with, CollegeRecord::named("B")]);

        assert_eq!(rows[0].last().map(String::as_str), Some(SOURCE_URL_HEADER));
        assert_eq!(rows[1][10], "https://nirfindia.org");
        assert_eq!(rows[2][10], "");
    }

    #[test]
    fn test_empty_records_yield_header_only() {
        let rows = build_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), HEADER.len());
    }
}
