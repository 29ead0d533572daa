use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub id: String,
    pub name: String,
    pub total_classes: u32,
    pub attended_classes: u32,
    pub marks_obtained: f64,
    pub marks_total: f64,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusEntry {
    pub date: NaiveDate,
    pub subject: String,
    pub topic: String,
    pub video_url: String,
    pub notes_url: String,
}

/// Subjects and recorded absences for one learner, as handed over by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub subjects: Vec<SubjectRecord>,
    #[serde(default)]
    pub missed_dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceSummary {
    pub total_hosted: u64,
    pub total_attended: u64,
    pub total_marks_earned: f64,
    pub total_max_marks: f64,
    pub overall_attendance_percent: f64,
    pub overall_marks_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Safe,
    AtRisk,
}

impl Standing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::AtRisk => "at risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectStanding<'a> {
    pub subject: &'a SubjectRecord,
    pub attendance_percent: f64,
    pub marks_percent: f64,
    pub status: Standing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaveProjection {
    pub planned_absences: u64,
    pub new_total: u64,
    pub new_percent: f64,
    pub safe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    pub dept: String,
    pub roll: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Student {
        dept: String,
        roll: String,
        email: String,
        otp: String,
    },
    Faculty {
        id: String,
        password: String,
    },
}

impl Credentials {
    pub fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Faculty { .. } => Role::Faculty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceBatch {
    pub date: NaiveDate,
    pub rolls: Vec<String>,
}

/// One row of the absence ledger written by faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub date: NaiveDate,
    pub roll: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LostFoundKind {
    Lost,
    Found,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFoundItem {
    pub id: Uuid,
    pub kind: LostFoundKind,
    pub item: String,
    pub posted_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCallEntry {
    pub roll: String,
    pub name: String,
    pub status: Option<Mark>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollCallTally {
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
}
