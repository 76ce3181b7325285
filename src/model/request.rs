use serde::{Deserialize, Serialize};

/// Catch-all request body shared by every form-style endpoint. Each endpoint
/// reads only the fields it needs through the getter helpers below.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRequest {
    // Student registration
    pub name: Option<String>,
    pub enroll: Option<String>,
    pub email: Option<String>,

    // Teacher gate
    pub password: Option<String>,

    // Question authoring
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub marks: Option<u32>,

    // Question authoring (correct index) and answer selection
    pub answer: Option<usize>,
}

impl ClientRequest {
    /// Returns (name, enroll, email)
    pub fn get_registration(&self) -> Option<(String, String, String)> {
        if let (Some(name), Some(enroll), Some(email)) =
            (self.name.clone(), self.enroll.clone(), self.email.clone())
        {
            Some((name, enroll, email))
        } else {
            None
        }
    }

    /// Returns (question, options, answer, marks); marks default to 1
    pub fn get_new_question(&self) -> Option<(String, Vec<String>, usize, u32)> {
        if let (Some(question), Some(options), Some(answer)) =
            (self.question.clone(), self.options.clone(), self.answer)
        {
            Some((question, options, answer, self.marks.unwrap_or(1)))
        } else {
            None
        }
    }
}
