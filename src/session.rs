//! Signed-in role context and the pluggable backend it talks to.

use crate::error::TrackerError;
use crate::models::{AbsenceBatch, Credentials, LostFoundItem, Role, StudentIdentity, SyllabusEntry};

/// One-time code accepted by the demo student login.
pub const DEMO_STUDENT_OTP: &str = "1234";
pub const DEMO_FACULTY_ID: &str = "admin";
pub const DEMO_FACULTY_PASSWORD: &str = "admin";

const STUDENT_LOGIN_HINT: &str = "Please fill all fields (Dept, Roll No, Email) and use OTP 1234.";
const FACULTY_LOGIN_HINT: &str = "Invalid credentials. Try demo accounts.";

/// Verifies credentials against an external identity provider.
pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<bool>;
}

/// Persists faculty writes to an external store.
pub trait RecordSink {
    fn record_absences(&self, batch: &AbsenceBatch) -> anyhow::Result<()>;
    fn add_syllabus_entry(&self, entry: &SyllabusEntry) -> anyhow::Result<()>;
    fn post_lost_found(&self, item: &LostFoundItem) -> anyhow::Result<()>;
}

/// Capabilities wired in at startup. A missing capability falls back to
/// demo authentication or simulated writes.
#[derive(Default)]
pub struct Backend {
    authenticator: Option<Box<dyn Authenticator>>,
    sink: Option<Box<dyn RecordSink>>,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Box::new(authenticator));
        self
    }

    pub fn with_sink(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn sink(&self) -> Option<&dyn RecordSink> {
        self.sink.as_deref()
    }

    fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<bool> {
        match &self.authenticator {
            Some(authenticator) => authenticator.authenticate(credentials),
            None => Ok(demo_authenticate(credentials)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    student: Option<StudentIdentity>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn student(&self) -> Option<&StudentIdentity> {
        self.student.as_ref()
    }

    pub fn role_label(&self) -> &'static str {
        match self.role {
            Role::Student => "Student",
            Role::Faculty => "Faculty / Admin",
        }
    }

    pub fn require_faculty(&self, action: &'static str) -> Result<(), TrackerError> {
        if self.role == Role::Faculty {
            Ok(())
        } else {
            Err(TrackerError::Forbidden(action))
        }
    }
}

pub fn login(backend: &Backend, credentials: Credentials) -> anyhow::Result<Session> {
    let role = credentials.role();
    if !backend.authenticate(&credentials)? {
        tracing::warn!(?role, "login rejected");
        let hint = match role {
            Role::Student => STUDENT_LOGIN_HINT,
            Role::Faculty => FACULTY_LOGIN_HINT,
        };
        return Err(TrackerError::AuthRejected(hint.to_string()).into());
    }

    let student = match credentials {
        Credentials::Student {
            dept, roll, email, ..
        } => Some(StudentIdentity { dept, roll, email }),
        Credentials::Faculty { .. } => None,
    };
    tracing::info!(?role, "login succeeded");
    Ok(Session { role, student })
}

fn demo_authenticate(credentials: &Credentials) -> bool {
    match credentials {
        Credentials::Student {
            dept,
            roll,
            email,
            otp,
        } => {
            !dept.trim().is_empty()
                && !roll.trim().is_empty()
                && !email.trim().is_empty()
                && otp == DEMO_STUDENT_OTP
        }
        Credentials::Faculty { id, password } => {
            id == DEMO_FACULTY_ID && password == DEMO_FACULTY_PASSWORD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(otp: &str) -> Credentials {
        Credentials::Student {
            dept: "CSE".to_string(),
            roll: "21CS042".to_string(),
            email: "priya@campus.edu".to_string(),
            otp: otp.to_string(),
        }
    }

    fn faculty(id: &str, password: &str) -> Credentials {
        Credentials::Faculty {
            id: id.to_string(),
            password: password.to_string(),
        }
    }

    struct DenyAll;

    impl Authenticator for DenyAll {
        fn authenticate(&self, _credentials: &Credentials) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn demo_student_login_keeps_identity() {
        let session = login(&Backend::new(), student("1234")).expect("student login");
        assert_eq!(session.role(), Role::Student);
        assert_eq!(session.student().map(|s| s.roll.as_str()), Some("21CS042"));
        assert!(session.require_faculty("marking attendance").is_err());
    }

    #[test]
    fn wrong_otp_is_rejected_with_hint() {
        let err = login(&Backend::new(), student("0000")).expect_err("bad otp");
        assert_eq!(
            err.downcast_ref::<TrackerError>(),
            Some(&TrackerError::AuthRejected(STUDENT_LOGIN_HINT.to_string()))
        );
    }

    #[test]
    fn blank_student_fields_are_rejected() {
        let credentials = Credentials::Student {
            dept: "CSE".to_string(),
            roll: "  ".to_string(),
            email: "priya@campus.edu".to_string(),
            otp: "1234".to_string(),
        };
        assert!(login(&Backend::new(), credentials).is_err());
    }

    #[test]
    fn demo_faculty_login() {
        let session = login(&Backend::new(), faculty("admin", "admin")).expect("faculty login");
        assert_eq!(session.role_label(), "Faculty / Admin");
        assert!(session.student().is_none());
        assert!(session.require_faculty("marking attendance").is_ok());

        let err = login(&Backend::new(), faculty("admin", "nope")).expect_err("bad password");
        assert_eq!(
            err.downcast_ref::<TrackerError>(),
            Some(&TrackerError::AuthRejected(FACULTY_LOGIN_HINT.to_string()))
        );
    }

    #[test]
    fn injected_authenticator_replaces_demo_rules() {
        let backend = Backend::new().with_authenticator(DenyAll);
        assert!(login(&backend, faculty("admin", "admin")).is_err());
    }
}
