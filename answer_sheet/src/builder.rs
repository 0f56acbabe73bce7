use log::debug;

use crate::config::{AnswerSheet, Line, Page, PageSettings};

/// Lays out the lines of one answer sheet over as many pages as needed.
///
/// The builder keeps a vertical cursor and the number of the next question.
/// A fresh builder is used for every respondent.
///
/// ```
/// use answer_sheet::builder::SheetBuilder;
/// use answer_sheet::PageSettings;
///
/// let mut builder = SheetBuilder::new(&PageSettings::A4);
/// builder.add_question("Favorite color?", 30.0);
/// builder.line("☑ Red");
/// let sheet = builder.finish();
///
/// assert_eq!(sheet.texts(), vec!["1. Favorite color?", "☑ Red"]);
/// ```
pub struct SheetBuilder {
    pub(crate) _settings: PageSettings,
    pub(crate) _pages: Vec<Page>,
    pub(crate) _cursor: f32,
    pub(crate) _question_number: u32,
}

impl SheetBuilder {
    pub fn new(settings: &PageSettings) -> SheetBuilder {
        SheetBuilder {
            _settings: settings.clone(),
            _pages: vec![Page::default()],
            _cursor: settings.top_margin,
            _question_number: 1,
        }
    }

    /// The position of the next line, from the top of the current page.
    pub fn cursor(&self) -> f32 {
        self._cursor
    }

    /// The number that the next question will receive.
    pub fn question_number(&self) -> u32 {
        self._question_number
    }

    pub fn page_count(&self) -> usize {
        self._pages.len()
    }

    /// Starts a new page and moves the cursor back to the top.
    pub fn new_page(&mut self) {
        debug!(
            "new_page: page {} full at {}",
            self._pages.len(),
            self._cursor
        );
        self._pages.push(Page::default());
        self._cursor = self._settings.top_margin;
    }

    /// Appends a line at the cursor.
    ///
    /// A line that would cross the bottom margin goes to the next page.
    pub fn line(&mut self, text: &str) {
        if self._cursor + self._settings.line_height > self._settings.page_break_trigger() {
            self.new_page();
        }
        let y = self._cursor;
        // There is always at least one page.
        if let Some(page) = self._pages.last_mut() {
            page.lines.push(Line {
                text: text.to_string(),
                y,
            });
        }
        self._cursor += self._settings.line_height;
    }

    /// Leaves one empty line.
    pub fn gap(&mut self) {
        self._cursor += self._settings.line_height;
    }

    /// Writes the numbered title of a question.
    ///
    /// content_height: the estimated height of the question and all its answer lines.
    /// If it does not fit in the rest of the page, the question starts on a new page
    /// so that it is not split.
    pub fn add_question(&mut self, text: &str, content_height: f32) {
        if self._cursor + content_height > self._settings.page_break_trigger() {
            self.new_page();
        }
        let title = format!("{}. {}", self._question_number, text);
        self.line(&title);
        self._question_number += 1;
    }

    pub fn finish(self) -> AnswerSheet {
        AnswerSheet {
            settings: self._settings,
            pages: self._pages,
        }
    }
}
