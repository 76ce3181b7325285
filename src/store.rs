//! Flat key-value persistence. One JSON document per key, read in full and
//! rewritten in full on each mutation; there are no partial updates and no
//! transactions across keys. Every mutation is a read-modify-write held
//! under a single lock so concurrent handlers cannot tear a document.

use std::fs::{create_dir_all, read_to_string, write};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::question::Question;
use crate::model::quiz_result::QuizResult;
use crate::model::student::Student;

pub const KEY_QUIZ_DATA: &str = "quizData";
pub const KEY_STUDENTS: &str = "students";
pub const KEY_QUIZ_RESULTS: &str = "quizResults";
pub const KEY_CURRENT_STUDENT: &str = "currentStudent";

#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, String> {
        let dir = dir.into();
        if let Err(e) = create_dir_all(&dir) {
            return Err(format!("Could not create data directory {}: {e}", dir.display()));
        }
        Ok(Store {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads the full document under `key`. A missing file is an absent key,
    /// not an error.
    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        let text = match read_to_string(self.key_path(key)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("Could not read key {key}: {e}")),
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(format!("Corrupt document under key {key}: {e}")),
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
        let text = serde_json::to_string(value)
            .map_err(|e| format!("Could not encode key {key}: {e}"))?;
        write(self.key_path(key), text).map_err(|e| format!("Could not write key {key}: {e}"))
    }

    pub fn questions(&self) -> Result<Vec<Question>, String> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_key(KEY_QUIZ_DATA)?.unwrap_or_default())
    }

    pub fn append_question(&self, question: Question) -> Result<(), String> {
        let _guard = self.lock.lock().unwrap();
        let mut questions: Vec<Question> = self.read_key(KEY_QUIZ_DATA)?.unwrap_or_default();
        questions.push(question);
        self.write_key(KEY_QUIZ_DATA, &questions)
    }

    pub fn students(&self) -> Result<Vec<Student>, String> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_key(KEY_STUDENTS)?.unwrap_or_default())
    }

    pub fn append_student(&self, student: &Student) -> Result<(), String> {
        let _guard = self.lock.lock().unwrap();
        let mut students: Vec<Student> = self.read_key(KEY_STUDENTS)?.unwrap_or_default();
        students.push(student.clone());
        self.write_key(KEY_STUDENTS, &students)
    }

    pub fn results(&self) -> Result<Vec<QuizResult>, String> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_key(KEY_QUIZ_RESULTS)?.unwrap_or_default())
    }

    pub fn append_result(&self, result: QuizResult) -> Result<(), String> {
        let _guard = self.lock.lock().unwrap();
        let mut results: Vec<QuizResult> = self.read_key(KEY_QUIZ_RESULTS)?.unwrap_or_default();
        results.push(result);
        self.write_key(KEY_QUIZ_RESULTS, &results)
    }

    /// Last student to register. Informational only; session state lives in
    /// the attempt map.
    pub fn current_student(&self) -> Result<Option<Student>, String> {
        let _guard = self.lock.lock().unwrap();
        self.read_key(KEY_CURRENT_STUDENT)
    }

    pub fn set_current_student(&self, student: &Student) -> Result<(), String> {
        let _guard = self.lock.lock().unwrap();
        self.write_key(KEY_CURRENT_STUDENT, student)
    }
}
