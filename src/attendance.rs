use crate::error::TrackerError;
use crate::models::{AttendanceSummary, LeaveProjection, Standing, SubjectRecord, SubjectStanding};

/// Minimum attendance percentage a learner must hold.
pub const SAFE_ATTENDANCE_THRESHOLD: f64 = 75.0;

pub fn summarize(subjects: &[SubjectRecord]) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        total_hosted: 0,
        total_attended: 0,
        total_marks_earned: 0.0,
        total_max_marks: 0.0,
        overall_attendance_percent: 0.0,
        overall_marks_percent: 0.0,
    };

    for subject in subjects {
        summary.total_hosted += u64::from(subject.total_classes);
        summary.total_attended += u64::from(subject.attended_classes);
        summary.total_marks_earned += subject.marks_obtained;
        summary.total_max_marks += subject.marks_total;
    }

    summary.overall_attendance_percent = percent(
        summary.total_attended as f64,
        summary.total_hosted as f64,
    );
    summary.overall_marks_percent =
        percent(summary.total_marks_earned, summary.total_max_marks);
    summary
}

pub fn subject_attendance_percent(subject: &SubjectRecord) -> f64 {
    percent(subject.attended_classes as f64, subject.total_classes as f64)
}

pub fn subject_marks_percent(subject: &SubjectRecord) -> f64 {
    percent(subject.marks_obtained, subject.marks_total)
}

pub fn subject_standings(subjects: &[SubjectRecord]) -> Vec<SubjectStanding<'_>> {
    subjects
        .iter()
        .map(|subject| {
            let attendance_percent = subject_attendance_percent(subject);
            SubjectStanding {
                subject,
                attendance_percent,
                marks_percent: subject_marks_percent(subject),
                status: classify(attendance_percent),
            }
        })
        .collect()
}

pub fn classify(percent: f64) -> Standing {
    if percent >= SAFE_ATTENDANCE_THRESHOLD {
        Standing::Safe
    } else {
        Standing::AtRisk
    }
}

/// Parses a planned-leave day count typed by the learner.
pub fn parse_planned_absences(raw: &str) -> Result<i64, TrackerError> {
    let trimmed = raw.trim();
    let days: i64 = trimmed.parse().map_err(|_| {
        TrackerError::InvalidInput(format!("'{trimmed}' is not a whole number of days"))
    })?;
    if days <= 0 {
        return Err(TrackerError::InvalidInput(
            "planned absences must be at least one day".to_string(),
        ));
    }
    Ok(days)
}

pub fn project_leave(
    current_attended: u64,
    current_total: u64,
    planned_absences: i64,
) -> Result<LeaveProjection, TrackerError> {
    if planned_absences <= 0 {
        return Err(TrackerError::InvalidInput(
            "planned absences must be at least one day".to_string(),
        ));
    }
    let planned = u64::try_from(planned_absences).map_err(|_| {
        TrackerError::InvalidInput(format!("{planned_absences} days is out of range"))
    })?;
    let new_total = current_total.checked_add(planned).ok_or_else(|| {
        TrackerError::InvalidInput(format!("{planned_absences} days is out of range"))
    })?;

    let new_percent = percent(current_attended as f64, new_total as f64);
    Ok(LeaveProjection {
        planned_absences: planned,
        new_total,
        new_percent,
        safe: classify(new_percent) == Standing::Safe,
    })
}

/// Projects leave against the live per-subject totals.
pub fn project_leave_for(
    subjects: &[SubjectRecord],
    planned_absences: i64,
) -> Result<LeaveProjection, TrackerError> {
    let summary = summarize(subjects);
    project_leave(
        summary.total_attended,
        summary.total_hosted,
        planned_absences,
    )
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round_one_decimal(part / whole * 100.0)
}
