// ********* Input data structures ***********

/// The kinds of questions an answer sheet knows how to render.
///
/// Anything the schema does not recognize is rendered as free text.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum QuestionKind {
    /// Several boxes may be ticked. The answer is a comma-separated list of labels.
    MultipleChoice,
    /// A single marker is filled, the one that equals the answer exactly.
    OneChoice,
    /// A star rating between the bounds of the range.
    IntegerRange,
    /// The answer is printed as-is.
    FreeText,
}

/// The value a prerequisite column must hold for a question to be shown.
#[derive(PartialEq, Debug, Clone)]
pub enum RequiredValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Null, arrays and objects. These never match a cell.
    Unmatchable,
}

/// Restricts a question to the respondents whose `column` holds `value`.
#[derive(PartialEq, Debug, Clone)]
pub struct Requirement {
    pub column: String,
    pub value: RequiredValue,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Question {
    pub text: String,
    /// The column designator, normally a single letter (A, B, ...).
    pub column: String,
    pub kind: QuestionKind,
    pub choices: Vec<String>,
    /// Allows a free-text "other" entry next to the listed choices.
    pub other: bool,
    /// (min, max) of a rating. Only the max is used for rendering.
    pub range: Option<(i64, i64)>,
    pub requiring: Option<Requirement>,
}

impl Question {
    /// A free-text question with no prerequisite, mostly useful for building schemas in code.
    pub fn new(text: &str, column: &str, kind: QuestionKind) -> Question {
        Question {
            text: text.to_string(),
            column: column.to_string(),
            kind,
            choices: Vec::new(),
            other: false,
            range: None,
            requiring: None,
        }
    }

    pub fn with_choices(self, choices: &[&str]) -> Question {
        Question {
            choices: choices.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    pub fn with_other(self) -> Question {
        Question {
            other: true,
            ..self
        }
    }

    pub fn with_range(self, min: i64, max: i64) -> Question {
        Question {
            range: Some((min, max)),
            ..self
        }
    }

    pub fn requiring(self, column: &str, value: RequiredValue) -> Question {
        Question {
            requiring: Some(Requirement {
                column: column.to_string(),
                value,
            }),
            ..self
        }
    }
}

/// The content of one cell of the response table.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Days since the spreadsheet epoch, as stored by the spreadsheet.
    DateTime(f64),
    Error(String),
}

/// The responses: a header row and one row per respondent.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// The number of addressable columns.
    ///
    /// This is the width of the header, or of the widest row if some row is longer.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Finds a column by its header label.
    pub fn column_by_label(&self, label: &str) -> Option<usize> {
        self.header.iter().position(|h| h == label)
    }
}

// ******** Output data structures *********

/// The glyphs used to draw the answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Glyphs {
    pub box_checked: &'static str,
    pub box_empty: &'static str,
    pub radio_checked: &'static str,
    pub radio_empty: &'static str,
    pub star_filled: &'static str,
    pub star_empty: &'static str,
}

impl Glyphs {
    pub const UNICODE: Glyphs = Glyphs {
        box_checked: "☑",
        box_empty: "☐",
        radio_checked: "●",
        radio_empty: "○",
        star_filled: "★",
        star_empty: "☆",
    };
}

/// Geometry of the pages, in millimetres.
#[derive(PartialEq, Debug, Clone)]
pub struct PageSettings {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub line_height: f32,
    pub font_size: f32,
}

impl PageSettings {
    /// A4 portrait, 1 cm margins and a 2 cm bottom margin, 10 mm lines in 12 pt.
    pub const A4: PageSettings = PageSettings {
        width: 210.0,
        height: 297.0,
        top_margin: 10.0,
        bottom_margin: 20.0,
        left_margin: 10.0,
        line_height: 10.0,
        font_size: 12.0,
    };

    /// Content reaching below this position goes on the next page.
    pub fn page_break_trigger(&self) -> f32 {
        self.height - self.bottom_margin
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings::A4
    }
}

/// A line of text. `y` is the top of the line, measured from the top of the page.
#[derive(PartialEq, Debug, Clone)]
pub struct Line {
    pub text: String,
    pub y: f32,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct Page {
    pub lines: Vec<Line>,
}

/// The rendered answers of one respondent, ready to be written out.
#[derive(PartialEq, Debug, Clone)]
pub struct AnswerSheet {
    pub settings: PageSettings,
    pub pages: Vec<Page>,
}

impl AnswerSheet {
    /// All the lines, in reading order.
    pub fn texts(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.clone()))
            .collect()
    }
}
