use crate::models::{Mark, RollCallEntry, RollCallTally};

pub fn tally(entries: &[RollCallEntry]) -> RollCallTally {
    entries
        .iter()
        .fold(RollCallTally::default(), |mut tally, entry| {
            match entry.status {
                Some(Mark::Present) => tally.present += 1,
                Some(Mark::Absent) => tally.absent += 1,
                None => tally.unmarked += 1,
            }
            tally
        })
}
