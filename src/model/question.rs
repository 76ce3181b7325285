use serde::{Deserialize, Serialize};

/// Authored questions always carry exactly this many options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct choice.
    pub answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
}

impl Question {
    pub fn marks(&self) -> u32 {
        self.marks.unwrap_or(1)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum QuestionFormError {
    EmptyField,
    WrongOptionCount,
    AnswerOutOfRange,
    ZeroMarks,
}

impl std::fmt::Display for QuestionFormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionFormError::EmptyField => write!(f, "Please fill all fields correctly!"),
            QuestionFormError::WrongOptionCount => {
                write!(f, "A question must have exactly {OPTION_COUNT} options.")
            }
            QuestionFormError::AnswerOutOfRange => {
                write!(f, "Correct answer must be one of the listed options.")
            }
            QuestionFormError::ZeroMarks => write!(f, "Marks must be a positive number."),
        }
    }
}

impl Question {
    /// Builds a question from authoring-form input. Fields are trimmed; an
    /// empty question text or any empty option rejects the whole form, so a
    /// partially filled question is never persisted.
    pub fn from_form(
        question: &str,
        options: &[String],
        answer: usize,
        marks: u32,
    ) -> Result<Self, QuestionFormError> {
        let question = question.trim();
        if options.len() != OPTION_COUNT {
            return Err(QuestionFormError::WrongOptionCount);
        }
        if question.is_empty() || options.iter().any(|o| o.trim().is_empty()) {
            return Err(QuestionFormError::EmptyField);
        }
        if answer >= OPTION_COUNT {
            return Err(QuestionFormError::AnswerOutOfRange);
        }
        if marks == 0 {
            return Err(QuestionFormError::ZeroMarks);
        }
        Ok(Question {
            question: question.to_string(),
            options: options.iter().map(|o| o.trim().to_string()).collect(),
            answer,
            marks: Some(marks),
        })
    }
}

/// The question set served when no bank has been authored yet.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question {
            question: "HTML નું full form શું છે?".into(),
            options: vec![
                "Hyper Trainer Marking Language".into(),
                "Hyper Text Markup Language".into(),
                "High Text Marking Language".into(),
                "Hyper Tool Multi Language".into(),
            ],
            answer: 1,
            marks: None,
        },
        Question {
            question: "CSS નો ઉપયોગ શું માટે થાય છે?".into(),
            options: vec![
                "Web page નું style design કરવા".into(),
                "Database manage કરવા".into(),
                "Server configure કરવા".into(),
                "Programming logic બનાવા".into(),
            ],
            answer: 0,
            marks: None,
        },
        Question {
            question: "JavaScript શું છે?".into(),
            options: vec![
                "Programming Language".into(),
                "Database".into(),
                "Operating System".into(),
                "Compiler".into(),
            ],
            answer: 0,
            marks: None,
        },
    ]
}
