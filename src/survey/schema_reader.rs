use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::fs;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RequiringJs {
    pub column: Option<String>,
    pub value: Option<JSValue>,
}

/// One question, as written in the questions file.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct QuestionJs {
    pub text: String,
    pub column: String,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub choices: Option<Vec<String>>,
    pub other: Option<bool>,
    pub range: Option<Vec<i64>>,
    pub requiring: Option<RequiringJs>,
}

/// Reads the list of questions. The order of the file is the order of the answer sheets.
pub fn read_questions(path: &str) -> SurveyResult<Vec<Question>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let questions: Vec<QuestionJs> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_questions: {:?}", questions);
    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| validate_question(idx + 1, q))
        .collect()
}

fn validate_question(number: usize, q: &QuestionJs) -> SurveyResult<Question> {
    let kind = match q.question_type.as_deref() {
        Some("multiple_choice") => QuestionKind::MultipleChoice,
        Some("one_choice") => QuestionKind::OneChoice,
        Some("integer_range") => QuestionKind::IntegerRange,
        x => {
            if x.is_some() && x != Some("other") {
                debug!(
                    "validate_question: {}: unknown type {:?}, rendered as text",
                    number, x
                );
            }
            QuestionKind::FreeText
        }
    };

    let range = match (kind, q.range.as_deref()) {
        (QuestionKind::IntegerRange, Some([min, max, ..])) => Some((*min, *max)),
        (QuestionKind::IntegerRange, _) => {
            return MissingRangeSnafu {
                number,
                text: q.text.clone(),
            }
            .fail();
        }
        (_, Some([min, max, ..])) => Some((*min, *max)),
        (_, _) => None,
    };

    Ok(Question {
        text: q.text.clone(),
        column: q.column.clone(),
        kind,
        choices: q.choices.clone().unwrap_or_default(),
        other: q.other.unwrap_or(false),
        range,
        requiring: q.requiring.as_ref().and_then(read_requirement),
    })
}

/// An empty requirement object is the same as no requirement.
fn read_requirement(req: &RequiringJs) -> Option<Requirement> {
    if req.column.is_none() && req.value.is_none() {
        return None;
    }
    let value = match &req.value {
        Some(JSValue::String(s)) => RequiredValue::Text(s.clone()),
        Some(JSValue::Number(n)) => match n.as_f64() {
            Some(f) => RequiredValue::Number(f),
            None => RequiredValue::Unmatchable,
        },
        Some(JSValue::Bool(b)) => RequiredValue::Bool(*b),
        _ => RequiredValue::Unmatchable,
    };
    Some(Requirement {
        column: req.column.clone().unwrap_or_default(),
        value,
    })
}
