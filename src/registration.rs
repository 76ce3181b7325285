//! Student registration. Validation runs in a fixed order and the first
//! failure wins; nothing is written to the store unless every check passes.

use crate::model::student::Student;
use crate::store::Store;

/// Maximum number of students accepted into one session.
pub const CLASS_CAPACITY: usize = 70;

/// Institutional mail domain required of every registrant.
pub const EMAIL_DOMAIN: &str = "upluniversity.ac.in";

#[derive(Debug, PartialEq, Eq)]
pub enum RegistrationError {
    MissingFields,
    InvalidEmail,
    Duplicate,
    CapacityFull,
    Store(String),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::MissingFields => write!(f, "Please fill in all fields."),
            RegistrationError::InvalidEmail => write!(
                f,
                "Invalid email format. Use your college email (e.g., 230102103005.name@upluniversity.ac.in)"
            ),
            RegistrationError::Duplicate => write!(
                f,
                "You have already registered or email/enrollment number is duplicate."
            ),
            RegistrationError::CapacityFull => {
                write!(f, "Class strength full. You cannot participate.")
            }
            RegistrationError::Store(e) => write!(f, "{e}"),
        }
    }
}

/// Accepts addresses of the shape `<12 digits>.<lowercase letters>@<domain>`,
/// e.g. `230102103005.name@upluniversity.ac.in`.
pub fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain != EMAIL_DOMAIN {
        return false;
    }
    let Some((digits, letters)) = local.split_once('.') else {
        return false;
    };
    digits.len() == 12
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !letters.is_empty()
        && letters.bytes().all(|b| b.is_ascii_lowercase())
}

/// Validates and persists a registration. On success the student is appended
/// to the roster and recorded as the current session student.
pub fn register(
    store: &Store,
    name: &str,
    enroll: &str,
    email: &str,
) -> Result<Student, RegistrationError> {
    let name = name.trim();
    let enroll = enroll.trim();
    let email = email.trim();

    if name.is_empty() || enroll.is_empty() || email.is_empty() {
        return Err(RegistrationError::MissingFields);
    }
    if !email_is_valid(email) {
        return Err(RegistrationError::InvalidEmail);
    }

    let roster = store.students().map_err(RegistrationError::Store)?;
    if roster.iter().any(|s| s.enroll == enroll || s.email == email) {
        return Err(RegistrationError::Duplicate);
    }
    if roster.len() >= CLASS_CAPACITY {
        return Err(RegistrationError::CapacityFull);
    }

    let student = Student {
        name: name.to_string(),
        enroll: enroll.to_string(),
        email: email.to_string(),
    };
    store
        .append_student(&student)
        .map_err(RegistrationError::Store)?;
    store
        .set_current_student(&student)
        .map_err(RegistrationError::Store)?;

    tracing::info!("Registered student {}", student.enroll);
    Ok(student)
}
