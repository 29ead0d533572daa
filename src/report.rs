use std::fmt::Write;

use chrono::NaiveDate;

use crate::attendance;
use crate::models::{LeaveProjection, StudentProfile, SyllabusEntry};

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn build_report(
    student_label: &str,
    profile: &StudentProfile,
    missed_topics: &[&SyllabusEntry],
    leave: Option<&LeaveProjection>,
) -> String {
    let summary = attendance::summarize(&profile.subjects);
    let standings = attendance::subject_standings(&profile.subjects);

    let mut output = String::new();

    let _ = writeln!(output, "# Academic Tracker Report");
    let _ = writeln!(output, "Generated for {}", student_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall");
    let _ = writeln!(
        output,
        "- Attendance: {}/{} classes ({:.1}%, {})",
        summary.total_attended,
        summary.total_hosted,
        summary.overall_attendance_percent,
        attendance::classify(summary.overall_attendance_percent).label()
    );
    let _ = writeln!(
        output,
        "- Marks: {}/{} ({:.1}%)",
        summary.total_marks_earned, summary.total_max_marks, summary.overall_marks_percent
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subjects");

    if standings.is_empty() {
        let _ = writeln!(output, "No subjects on record.");
    } else {
        let _ = writeln!(output, "| Subject | Classes | Attendance | Marks | Grade |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for standing in standings.iter() {
            let subject = standing.subject;
            let _ = writeln!(
                output,
                "| {} | {}/{} | {:.1}% ({}) | {}/{} | {} |",
                subject.name,
                subject.attended_classes,
                subject.total_classes,
                standing.attendance_percent,
                standing.status.label(),
                subject.marks_obtained,
                subject.marks_total,
                subject.grade
            );
        }
    }

    if let Some(projection) = leave {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Leave Outlook");
        let _ = writeln!(output, "{}", leave_message(projection));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Catch-Up Plan");

    if missed_topics.is_empty() {
        let _ = writeln!(output, "You are all caught up! No missed classes found.");
    } else {
        for topic in missed_topics.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({}) [video]({}) [notes]({})",
                format_date(topic.date),
                topic.topic,
                topic.subject,
                topic.video_url,
                topic.notes_url
            );
        }
    }

    output
}

pub fn leave_message(projection: &LeaveProjection) -> String {
    let verdict = if projection.safe {
        format!(
            "Safe to take leave. You stay at or above {:.0}%.",
            attendance::SAFE_ATTENDANCE_THRESHOLD
        )
    } else {
        format!(
            "RISK ALERT: attendance falls below the {:.0}% requirement.",
            attendance::SAFE_ATTENDANCE_THRESHOLD
        )
    };
    format!(
        "If you miss {} more classes, your attendance will be {:.1}%. {}",
        projection.planned_absences, projection.new_percent, verdict
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::catchup;
    use crate::models::SubjectRecord;

    fn profile() -> StudentProfile {
        StudentProfile {
            subjects: vec![
                SubjectRecord {
                    id: "CS202".to_string(),
                    name: "Web Development (CS202)".to_string(),
                    total_classes: 30,
                    attended_classes: 22,
                    marks_obtained: 42.0,
                    marks_total: 50.0,
                    grade: "A".to_string(),
                },
                SubjectRecord {
                    id: "CS201".to_string(),
                    name: "Data Structures (CS201)".to_string(),
                    total_classes: 20,
                    attended_classes: 16,
                    marks_obtained: 38.0,
                    marks_total: 50.0,
                    grade: "B+".to_string(),
                },
            ],
            missed_dates: BTreeSet::new(),
        }
    }

    fn syllabus() -> Vec<SyllabusEntry> {
        vec![SyllabusEntry {
            date: NaiveDate::from_ymd_opt(2026, 9, 3).expect("valid date"),
            subject: "Web Development (CS202)".to_string(),
            topic: "React State & Props".to_string(),
            video_url: "https://videos.example.com/state".to_string(),
            notes_url: "https://notes.example.com/state".to_string(),
        }]
    }

    #[test]
    fn formats_dates_like_the_dashboard() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 3).expect("valid date");
        assert_eq!(format_date(date), "Sep 3, 2026");
    }

    #[test]
    fn report_lists_overall_and_subjects() {
        let report = build_report("CSE / 21CS042", &profile(), &[], None);

        assert!(report.contains("Generated for CSE / 21CS042"));
        assert!(report.contains("- Attendance: 38/50 classes (76.0%, safe)"));
        assert!(report.contains("- Marks: 80/100 (80.0%)"));
        assert!(report.contains("| Web Development (CS202) | 22/30 | 73.3% (at risk) | 42/50 | A |"));
        assert!(report.contains("You are all caught up!"));
        assert!(!report.contains("## Leave Outlook"));
    }

    #[test]
    fn report_includes_leave_and_missed_topics() {
        let profile = profile();
        let syllabus = syllabus();
        let missed = BTreeSet::from([syllabus[0].date]);
        let topics = catchup::resolve_missed_topics(&syllabus, &missed);
        let leave = attendance::project_leave_for(&profile.subjects, 5).expect("projection");

        let report = build_report("CSE / 21CS042", &profile, &topics, Some(&leave));

        assert!(report.contains("your attendance will be 69.1%. RISK ALERT"));
        assert!(report.contains("- Sep 3, 2026: React State & Props (Web Development (CS202))"));
        assert!(!report.contains("all caught up"));
    }
}
