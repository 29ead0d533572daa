use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{AbsenceRecord, StudentProfile, SyllabusEntry};

/// Syllabus entries held on the given dates, in syllabus order.
pub fn resolve_missed_topics<'a>(
    syllabus: &'a [SyllabusEntry],
    missed_dates: &BTreeSet<NaiveDate>,
) -> Vec<&'a SyllabusEntry> {
    if missed_dates.is_empty() {
        return Vec::new();
    }

    syllabus
        .iter()
        .filter(|entry| missed_dates.contains(&entry.date))
        .collect()
}

/// Profile absences plus every ledger date this roll was marked absent.
pub fn missed_dates_for(
    profile: &StudentProfile,
    ledger: &[AbsenceRecord],
    roll: &str,
) -> BTreeSet<NaiveDate> {
    let mut dates = profile.missed_dates.clone();
    dates.extend(
        ledger
            .iter()
            .filter(|record| record.roll == roll)
            .map(|record| record.date),
    );
    dates
}
