pub mod question;
pub mod quiz_result;
pub mod request;
pub mod student;
