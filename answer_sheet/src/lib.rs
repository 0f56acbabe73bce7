//! Turns the answers of a survey respondent into a printable answer sheet.
//!
//! The questions are described by a schema (see [`Question`]). Each question reads one
//! column of the respondent's row, addressed by a letter (A, B, C, ...). The rendering
//! only produces positioned lines of text ([`AnswerSheet`]); writing them to a file is
//! left to the caller.
//!
//! ```
//! use answer_sheet::*;
//!
//! let questions = vec![
//!     Question::new("Favorite colors?", "B", QuestionKind::MultipleChoice)
//!         .with_choices(&["Red", "Blue"])
//!         .with_other(),
//! ];
//! let row = vec![
//!     Cell::String("2024-01-01 10:00:00".to_string()),
//!     Cell::String("Red, Green".to_string()),
//! ];
//!
//! let sheet = render_respondent(1, "2024-01-01 10:00:00", &row, 2, &questions, &PageSettings::A4);
//!
//! assert_eq!(
//!     sheet.texts(),
//!     vec![
//!         "Kişi: 1, Tarih: 2024-01-01 10:00:00",
//!         "1. Favorite colors?",
//!         "☑ Red",
//!         "☐ Blue",
//!         "☑ Diğer: Green",
//!     ]
//! );
//! ```

pub mod builder;
mod config;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;

pub use crate::builder::SheetBuilder;
pub use crate::config::*;

/// The label of the free-text entry offered next to the listed choices.
const OTHER_LABEL: &str = "Diğer";
/// Printed in place of an "other" entry that was not filled.
const OTHER_PLACEHOLDER: &str = "____________________";
const ANSWER_LABEL: &str = "Cevap";
const EMPTY_ANSWER: &str = "(Boş)";

const QUESTION_LINE_HEIGHT: f32 = 10.0;
const RATING_HEIGHT: f32 = 15.0;
const FREE_TEXT_HEIGHT: f32 = 20.0;

// ********* Columns **********

/// Maps a column letter to its position: A (or a) is 0, Z is 25.
///
/// Returns None for anything that is not a single ASCII letter. The result is not
/// checked against the size of any table.
pub fn column_index(designator: &str) -> Option<usize> {
    let mut chars = designator.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as usize) - ('A' as usize))
        }
        _ => None,
    }
}

/// True if the designator is a single uppercase letter, the only form accepted in a schema.
pub fn is_column_letter(designator: &str) -> bool {
    let mut chars = designator.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

/// Resolves a schema column against a table that has `column_count` columns.
fn resolve_column(designator: &str, column_count: usize) -> Option<usize> {
    if !is_column_letter(designator) {
        return None;
    }
    column_index(designator).filter(|idx| *idx < column_count)
}

// ********* Cells **********

/// Converts a spreadsheet serial date (days since 1899-12-30) to a date and time,
/// rounded to the second.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let seconds = (serial * 86_400.0).round();
    // Far outside of any date a spreadsheet can hold.
    if !seconds.is_finite() || seconds.abs() > 1e12 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(Duration::seconds(seconds as i64))
}

/// The text of a cell, as the answer formatters see it.
///
/// Empty and error cells give an empty string. Whole numbers stored as floats are
/// printed without decimals.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty | Cell::Error(_) => "".to_string(),
        Cell::String(s) => s.clone(),
        Cell::Int(i) => i.to_string(),
        Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Cell::Float(f) => f.to_string(),
        Cell::Bool(true) => "True".to_string(),
        Cell::Bool(false) => "False".to_string(),
        Cell::DateTime(serial) => match serial_to_datetime(*serial) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => serial.to_string(),
        },
    }
}

/// True for the cells that count as "no answer": empty cells, empty text, zero and false.
pub fn is_falsy(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::String(s) => s.is_empty(),
        Cell::Int(i) => *i == 0,
        Cell::Float(f) => *f == 0.0,
        Cell::Bool(b) => !b,
        Cell::DateTime(_) | Cell::Error(_) => false,
    }
}

/// The answer handed to the formatters. Falsy cells give an empty answer.
pub fn answer_text(cell: &Cell) -> String {
    if is_falsy(cell) {
        "".to_string()
    } else {
        cell_text(cell)
    }
}

/// The rating given in a cell.
///
/// Numbers are truncated toward zero, text is parsed as an integer. Anything else
/// counts as 0.
pub fn cell_rating(cell: &Cell) -> i64 {
    match cell {
        Cell::Int(i) => *i,
        Cell::Float(f) if f.is_finite() => f.trunc() as i64,
        Cell::Bool(b) => *b as i64,
        Cell::String(s) => parse_rating(s),
        _ => 0,
    }
}

/// Strict equality between a cell and a value from the schema.
///
/// Numbers compare by value regardless of how the spreadsheet stored them. Empty
/// cells never match.
pub fn cell_matches(cell: &Cell, value: &RequiredValue) -> bool {
    match (cell, value) {
        (Cell::String(s), RequiredValue::Text(t)) => s == t,
        (Cell::Int(i), RequiredValue::Number(n)) => (*i as f64) == *n,
        (Cell::Float(f), RequiredValue::Number(n)) => f == n,
        (Cell::Bool(b), RequiredValue::Bool(v)) => b == v,
        _ => false,
    }
}

// ********* Conditions **********

/// Checks the prerequisite of a question against the row of a respondent.
///
/// There is a single level of condition: one column compared to one value.
pub fn requirement_met(
    requirement: Option<&Requirement>,
    row: &[Cell],
    column_count: usize,
) -> bool {
    let req = match requirement {
        None => return true,
        Some(req) => req,
    };
    let idx = match resolve_column(&req.column, column_count) {
        Some(idx) => idx,
        None => {
            debug!("requirement_met: invalid column {:?}", req.column);
            return false;
        }
    };
    match row.get(idx) {
        Some(cell) => cell_matches(cell, &req.value),
        None => false,
    }
}

// ********* Answers **********

/// Splits a multiple choice answer into its trimmed labels.
fn selected_labels(answer: &str) -> Vec<String> {
    if answer.is_empty() {
        return Vec::new();
    }
    answer.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn render_multiple_choice(
    builder: &mut SheetBuilder,
    glyphs: &Glyphs,
    question: &Question,
    answer: &str,
) {
    let content_height = QUESTION_LINE_HEIGHT * (1 + question.choices.len()) as f32;
    builder.add_question(&question.text, content_height);

    let selected = selected_labels(answer);
    for choice in question.choices.iter() {
        let mark = if selected.contains(choice) {
            glyphs.box_checked
        } else {
            glyphs.box_empty
        };
        builder.line(&format!("{} {}", mark, choice));
    }
    if question.other {
        let others: Vec<&String> = selected
            .iter()
            .filter(|s| !question.choices.contains(*s))
            .collect();
        if others.is_empty() {
            builder.line(&format!(
                "{} {}: {}",
                glyphs.box_empty, OTHER_LABEL, OTHER_PLACEHOLDER
            ));
        }
        for other in others {
            builder.line(&format!("{} {}: {}", glyphs.box_checked, OTHER_LABEL, other));
        }
    }
}

pub fn render_one_choice(
    builder: &mut SheetBuilder,
    glyphs: &Glyphs,
    question: &Question,
    answer: &str,
) {
    let content_height = QUESTION_LINE_HEIGHT * (1 + question.choices.len()) as f32;
    builder.add_question(&question.text, content_height);

    let mut checked_choice = false;
    for choice in question.choices.iter() {
        let mark = if choice == answer {
            checked_choice = true;
            glyphs.radio_checked
        } else {
            glyphs.radio_empty
        };
        builder.line(&format!("{} {}", mark, choice));
    }
    if question.other {
        let free_answer =
            !checked_choice && !answer.is_empty() && !question.choices.iter().any(|c| c == answer);
        if free_answer {
            builder.line(&format!(
                "{} {}: {}",
                glyphs.radio_checked, OTHER_LABEL, answer
            ));
        } else {
            builder.line(&format!(
                "{} {}: {}",
                glyphs.radio_empty, OTHER_LABEL, OTHER_PLACEHOLDER
            ));
        }
    }
}

/// Draws `value` filled stars followed by `max_value - value` empty ones.
///
/// Both counts stop at zero: a value above the maximum draws only filled stars, a
/// negative value only empty ones.
pub fn star_rating(glyphs: &Glyphs, value: i64, max_value: i64) -> String {
    let filled = value.max(0) as usize;
    let empty = (max_value - value).max(0) as usize;
    format!(
        "{}{}",
        glyphs.star_filled.repeat(filled),
        glyphs.star_empty.repeat(empty)
    )
}

/// The rating written as text. Empty or unreadable answers count as 0.
pub fn parse_rating(answer: &str) -> i64 {
    answer.trim().parse::<i64>().unwrap_or(0)
}

pub fn render_integer_range(
    builder: &mut SheetBuilder,
    glyphs: &Glyphs,
    question: &Question,
    value: i64,
) {
    let max_value = question.range.map(|(_, max)| max).unwrap_or(0);
    builder.add_question(&question.text, RATING_HEIGHT);
    builder.line(&star_rating(glyphs, value, max_value));
}

pub fn render_free_text(builder: &mut SheetBuilder, question: &Question, answer: &str) {
    builder.add_question(&question.text, FREE_TEXT_HEIGHT);
    let shown = if answer.is_empty() {
        EMPTY_ANSWER
    } else {
        answer
    };
    builder.line(&format!("{}: {}", ANSWER_LABEL, shown));
}

/// Renders a single question if the row allows it.
///
/// Returns true if something was written.
pub fn render_question(
    builder: &mut SheetBuilder,
    glyphs: &Glyphs,
    question: &Question,
    row: &[Cell],
    column_count: usize,
) -> bool {
    let col_idx = match resolve_column(&question.column, column_count) {
        Some(idx) => idx,
        None => {
            debug!(
                "render_question: skipping {:?}: column {:?} not in the table",
                question.text, question.column
            );
            return false;
        }
    };
    if !requirement_met(question.requiring.as_ref(), row, column_count) {
        debug!(
            "render_question: skipping {:?}: requirement not met",
            question.text
        );
        return false;
    }

    // Short rows are padded with empty answers.
    let empty = Cell::Empty;
    let cell = row.get(col_idx).unwrap_or(&empty);
    let answer = answer_text(cell);

    match question.kind {
        QuestionKind::MultipleChoice => {
            render_multiple_choice(builder, glyphs, question, &answer)
        }
        QuestionKind::OneChoice => render_one_choice(builder, glyphs, question, &answer),
        QuestionKind::IntegerRange => {
            render_integer_range(builder, glyphs, question, cell_rating(cell))
        }
        QuestionKind::FreeText => render_free_text(builder, question, &answer),
    }
    builder.gap();
    true
}

/// The first line of every answer sheet.
pub fn header_line(person_number: usize, timestamp: &str) -> String {
    format!("Kişi: {}, Tarih: {}", person_number, timestamp)
}

/// Renders all the questions of the schema for one respondent.
///
/// person_number: the position of the respondent, starting at 1.
/// column_count: the number of columns of the table the row comes from.
pub fn render_respondent(
    person_number: usize,
    timestamp: &str,
    row: &[Cell],
    column_count: usize,
    questions: &[Question],
    settings: &PageSettings,
) -> AnswerSheet {
    let glyphs = Glyphs::UNICODE;
    let mut builder = SheetBuilder::new(settings);
    builder.line(&header_line(person_number, timestamp));

    let mut rendered = 0;
    for q in questions {
        if render_question(&mut builder, &glyphs, q, row, column_count) {
            rendered += 1;
        }
    }
    debug!(
        "render_respondent: person {}: {} of {} questions rendered on {} pages",
        person_number,
        rendered,
        questions.len(),
        builder.page_count()
    );
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn s(x: &str) -> Cell {
        Cell::String(x.to_string())
    }

    fn render(questions: &[Question], row: &[Cell]) -> Vec<String> {
        init();
        let sheet = render_respondent(1, "T", row, row.len(), questions, &PageSettings::A4);
        // Drop the header line.
        sheet.texts().into_iter().skip(1).collect()
    }

    #[test]
    fn column_letters() {
        for (i, c) in ('A'..='Z').enumerate() {
            assert_eq!(column_index(&c.to_string()), Some(i));
            assert_eq!(column_index(&c.to_ascii_lowercase().to_string()), Some(i));
        }
        assert_eq!(column_index("b"), Some(1));
        assert_eq!(column_index("B"), Some(1));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("AB"), None);
        assert_eq!(column_index("1"), None);
        assert_eq!(column_index("Ç"), None);
    }

    #[test]
    fn only_uppercase_letters_in_schema() {
        assert!(is_column_letter("C"));
        assert!(!is_column_letter("c"));
        assert!(!is_column_letter("CC"));
        assert!(!is_column_letter(""));
    }

    #[test]
    fn multiple_choice_with_other() {
        let q = Question::new("Colors", "A", QuestionKind::MultipleChoice)
            .with_choices(&["Red", "Blue"])
            .with_other();
        assert_eq!(
            render(&[q], &[s("Red, Green")]),
            vec!["1. Colors", "☑ Red", "☐ Blue", "☑ Diğer: Green"]
        );
    }

    #[test]
    fn multiple_choice_empty_other() {
        let q = Question::new("Colors", "A", QuestionKind::MultipleChoice)
            .with_choices(&["Red", "Blue"])
            .with_other();
        assert_eq!(
            render(&[q.clone()], &[s("Blue,Red")]),
            vec!["1. Colors", "☑ Red", "☑ Blue", "☐ Diğer: ____________________"]
        );
        assert_eq!(
            render(&[q], &[Cell::Empty]),
            vec!["1. Colors", "☐ Red", "☐ Blue", "☐ Diğer: ____________________"]
        );
    }

    #[test]
    fn multiple_choice_without_other_ignores_unknown_labels() {
        let q = Question::new("Colors", "A", QuestionKind::MultipleChoice)
            .with_choices(&["Red", "Blue"]);
        assert_eq!(
            render(&[q], &[s("Green, Pink")]),
            vec!["1. Colors", "☐ Red", "☐ Blue"]
        );
    }

    #[test]
    fn one_choice() {
        let q = Question::new("Agree?", "A", QuestionKind::OneChoice).with_choices(&["Yes", "No"]);
        assert_eq!(render(&[q], &[s("Yes")]), vec!["1. Agree?", "● Yes", "○ No"]);
    }

    #[test]
    fn one_choice_other() {
        let q = Question::new("Agree?", "A", QuestionKind::OneChoice)
            .with_choices(&["Yes", "No"])
            .with_other();
        assert_eq!(
            render(&[q.clone()], &[s("Maybe")]),
            vec!["1. Agree?", "○ Yes", "○ No", "● Diğer: Maybe"]
        );
        assert_eq!(
            render(&[q.clone()], &[s("No")]),
            vec!["1. Agree?", "○ Yes", "● No", "○ Diğer: ____________________"]
        );
        assert_eq!(
            render(&[q], &[Cell::Empty]),
            vec!["1. Agree?", "○ Yes", "○ No", "○ Diğer: ____________________"]
        );
    }

    #[test]
    fn one_choice_is_exact() {
        let q = Question::new("Agree?", "A", QuestionKind::OneChoice).with_choices(&["Yes", "No"]);
        assert_eq!(render(&[q], &[s("yes ")]), vec!["1. Agree?", "○ Yes", "○ No"]);
    }

    #[test]
    fn ratings() {
        let q = Question::new("Rate", "A", QuestionKind::IntegerRange).with_range(0, 5);
        assert_eq!(render(&[q.clone()], &[s("3")]), vec!["1. Rate", "★★★☆☆"]);
        assert_eq!(render(&[q.clone()], &[Cell::Int(4)]), vec!["1. Rate", "★★★★☆"]);
        assert_eq!(render(&[q.clone()], &[Cell::Float(2.0)]), vec!["1. Rate", "★★☆☆☆"]);
        assert_eq!(render(&[q.clone()], &[s("")]), vec!["1. Rate", "☆☆☆☆☆"]);
        assert_eq!(render(&[q], &[s("abc")]), vec!["1. Rate", "☆☆☆☆☆"]);
    }

    #[test]
    fn numeric_ratings_are_truncated() {
        let q = Question::new("Rate", "A", QuestionKind::IntegerRange).with_range(0, 5);
        assert_eq!(render(&[q.clone()], &[Cell::Float(4.5)]), vec!["1. Rate", "★★★★☆"]);
        assert_eq!(render(&[q.clone()], &[Cell::Float(-0.5)]), vec!["1. Rate", "☆☆☆☆☆"]);
        assert_eq!(render(&[q.clone()], &[Cell::Bool(true)]), vec!["1. Rate", "★☆☆☆☆"]);
        // Text is not truncated.
        assert_eq!(render(&[q], &[s("4.5")]), vec!["1. Rate", "☆☆☆☆☆"]);
        assert_eq!(cell_rating(&Cell::Float(f64::NAN)), 0);
        assert_eq!(cell_rating(&Cell::DateTime(45306.0)), 0);
    }

    #[test]
    fn falsy_cells_are_no_answer() {
        let text = Question::new("C", "A", QuestionKind::FreeText);
        for cell in [Cell::Int(0), Cell::Float(0.0), Cell::Bool(false), s("")] {
            assert_eq!(render(&[text.clone()], &[cell]), vec!["1. C", "Cevap: (Boş)"]);
        }

        let multiple = Question::new("M", "A", QuestionKind::MultipleChoice)
            .with_choices(&["1", "2"])
            .with_other();
        assert_eq!(
            render(&[multiple], &[Cell::Int(0)]),
            vec!["1. M", "☐ 1", "☐ 2", "☐ Diğer: ____________________"]
        );

        let one = Question::new("O", "A", QuestionKind::OneChoice)
            .with_choices(&["Yes", "No"])
            .with_other();
        assert_eq!(
            render(&[one.clone()], &[Cell::Bool(false)]),
            vec!["1. O", "○ Yes", "○ No", "○ Diğer: ____________________"]
        );
        assert_eq!(
            render(&[one], &[Cell::Int(7)]),
            vec!["1. O", "○ Yes", "○ No", "● Diğer: 7"]
        );
        assert!(!is_falsy(&Cell::Float(0.5)));
        assert!(!is_falsy(&s("0")));
    }

    #[test]
    fn ratings_out_of_range() {
        let g = Glyphs::UNICODE;
        assert_eq!(star_rating(&g, 7, 5), "★★★★★★★");
        assert_eq!(star_rating(&g, -2, 5), "☆☆☆☆☆☆☆");
        assert_eq!(star_rating(&g, 0, 0), "");
        assert_eq!(parse_rating(" 4 "), 4);
        assert_eq!(parse_rating("4.5"), 0);
    }

    #[test]
    fn free_text() {
        let q = Question::new("Comments", "A", QuestionKind::FreeText);
        assert_eq!(
            render(&[q.clone()], &[s("All good")]),
            vec!["1. Comments", "Cevap: All good"]
        );
        assert_eq!(render(&[q], &[Cell::Empty]), vec!["1. Comments", "Cevap: (Boş)"]);
    }

    #[test]
    fn requirement_gate() {
        let q = Question::new("Why?", "B", QuestionKind::FreeText)
            .requiring("A", RequiredValue::Text("Yes".to_string()));
        assert_eq!(
            render(&[q.clone()], &[s("Yes"), s("Because")]),
            vec!["1. Why?", "Cevap: Because"]
        );
        assert!(render(&[q], &[s("No"), s("Because")]).is_empty());
    }

    #[test]
    fn requirement_on_invalid_columns() {
        let row = vec![s("Yes"), s("x")];
        let lower = Requirement {
            column: "a".to_string(),
            value: RequiredValue::Text("Yes".to_string()),
        };
        let outside = Requirement {
            column: "E".to_string(),
            value: RequiredValue::Text("Yes".to_string()),
        };
        assert!(requirement_met(None, &row, 2));
        assert!(!requirement_met(Some(&lower), &row, 2));
        assert!(!requirement_met(Some(&outside), &row, 2));
    }

    #[test]
    fn requirement_values() {
        assert!(cell_matches(&Cell::Int(2), &RequiredValue::Number(2.0)));
        assert!(cell_matches(&Cell::Float(2.0), &RequiredValue::Number(2.0)));
        assert!(cell_matches(&Cell::Bool(true), &RequiredValue::Bool(true)));
        assert!(!cell_matches(&s("2"), &RequiredValue::Number(2.0)));
        assert!(!cell_matches(&Cell::Empty, &RequiredValue::Text("".to_string())));
        assert!(!cell_matches(&Cell::Empty, &RequiredValue::Unmatchable));
    }

    #[test]
    fn skipped_questions_do_not_take_a_number() {
        let questions = vec![
            Question::new("Outside", "F", QuestionKind::FreeText),
            Question::new("Lowercase", "a", QuestionKind::FreeText),
            Question::new("Two letters", "AB", QuestionKind::FreeText),
            Question::new("Kept", "B", QuestionKind::FreeText),
        ];
        assert_eq!(
            render(&questions, &[s("x"), s("y")]),
            vec!["1. Kept", "Cevap: y"]
        );
    }

    #[test]
    fn short_rows_give_empty_answers() {
        init();
        let q = Question::new("Comments", "C", QuestionKind::FreeText);
        let sheet = render_respondent(3, "T", &[s("x")], 3, &[q], &PageSettings::A4);
        assert_eq!(
            sheet.texts(),
            vec!["Kişi: 3, Tarih: T", "1. Comments", "Cevap: (Boş)"]
        );
    }

    #[test]
    fn questions_are_spaced_and_paginated() {
        init();
        let questions: Vec<Question> = (0..12)
            .map(|i| {
                Question::new(&format!("Q{}", i), "A", QuestionKind::OneChoice)
                    .with_choices(&["Yes", "No"])
            })
            .collect();
        let sheet = render_respondent(1, "T", &[s("Yes")], 1, &questions, &PageSettings::A4);
        // Header at 10, then every question takes 3 lines and a gap: 40mm.
        let first = &sheet.pages[0].lines;
        assert_eq!(first[1].text, "1. Q0");
        assert_eq!(first[1].y, 20.0);
        assert_eq!(first[4].text, "2. Q1");
        assert_eq!(first[4].y, 60.0);
        // Questions start at 20, 60, ..., 220, 260: the seventh (260 + 30 > 277) moves.
        assert_eq!(sheet.pages.len(), 2);
        assert_eq!(first.len(), 1 + 6 * 3);
        assert_eq!(sheet.pages[1].lines[0].text, "7. Q6");
        assert_eq!(sheet.pages[1].lines[0].y, 10.0);
    }

    #[test]
    fn cell_texts() {
        assert_eq!(cell_text(&Cell::Float(3.0)), "3");
        assert_eq!(cell_text(&Cell::Float(3.5)), "3.5");
        assert_eq!(cell_text(&Cell::Bool(true)), "True");
        assert_eq!(cell_text(&Cell::Error("#N/A".to_string())), "");
        // 2024-01-15 14:30:00
        assert_eq!(
            cell_text(&Cell::DateTime(45306.0 + 14.5 / 24.0)),
            "2024-01-15 14:30:00"
        );
    }
}
