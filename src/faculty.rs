use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::TrackerError;
use crate::models::{AbsenceBatch, LostFoundItem, LostFoundKind, SyllabusEntry};
use crate::session::{Backend, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
    pub count: usize,
    pub simulated: bool,
}

pub fn parse_absence_batch(date: NaiveDate, raw_rolls: &str) -> Result<AbsenceBatch, TrackerError> {
    let rolls: Vec<String> = raw_rolls
        .split(',')
        .map(str::trim)
        .filter(|roll| !roll.is_empty())
        .map(str::to_string)
        .collect();

    if rolls.is_empty() {
        return Err(TrackerError::InvalidInput(
            "at least one absent roll number is required".to_string(),
        ));
    }
    Ok(AbsenceBatch { date, rolls })
}

pub fn mark_absent(
    session: &Session,
    backend: &Backend,
    batch: &AbsenceBatch,
) -> anyhow::Result<WriteReceipt> {
    session.require_faculty("marking attendance")?;
    let simulated = match backend.sink() {
        Some(sink) => {
            sink.record_absences(batch)?;
            false
        }
        None => true,
    };
    tracing::info!(date = %batch.date, count = batch.rolls.len(), simulated, "absences recorded");
    Ok(WriteReceipt {
        count: batch.rolls.len(),
        simulated,
    })
}

pub fn upload_syllabus(
    session: &Session,
    backend: &Backend,
    entry: &SyllabusEntry,
) -> anyhow::Result<WriteReceipt> {
    session.require_faculty("updating the syllabus")?;
    if entry.subject.trim().is_empty() || entry.topic.trim().is_empty() {
        return Err(TrackerError::InvalidInput(
            "syllabus entries need both a subject and a topic".to_string(),
        )
        .into());
    }

    let simulated = match backend.sink() {
        Some(sink) => {
            sink.add_syllabus_entry(entry)?;
            false
        }
        None => true,
    };
    tracing::info!(date = %entry.date, subject = %entry.subject, simulated, "syllabus topic added");
    Ok(WriteReceipt {
        count: 1,
        simulated,
    })
}

/// Posts a lost or found notice. Any signed-in role may post.
pub fn post_lost_found(
    session: &Session,
    backend: &Backend,
    kind: LostFoundKind,
    item: &str,
) -> anyhow::Result<(LostFoundItem, WriteReceipt)> {
    let item = item.trim();
    if item.is_empty() {
        return Err(TrackerError::InvalidInput("item description is required".to_string()).into());
    }

    let posted = LostFoundItem {
        id: Uuid::new_v4(),
        kind,
        item: item.to_string(),
        posted_on: Utc::now().date_naive(),
    };
    let simulated = match backend.sink() {
        Some(sink) => {
            sink.post_lost_found(&posted)?;
            false
        }
        None => true,
    };
    tracing::info!(
        id = %posted.id,
        ?kind,
        role = ?session.role(),
        simulated,
        "lost and found item posted"
    );
    Ok((
        posted,
        WriteReceipt {
            count: 1,
            simulated,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::models::Credentials;
    use crate::session::{login, RecordSink};

    #[derive(Default, Clone)]
    struct MemorySink {
        absences: Rc<RefCell<Vec<AbsenceBatch>>>,
        topics: Rc<RefCell<Vec<SyllabusEntry>>>,
        posts: Rc<RefCell<Vec<LostFoundItem>>>,
    }

    impl RecordSink for MemorySink {
        fn record_absences(&self, batch: &AbsenceBatch) -> anyhow::Result<()> {
            self.absences.borrow_mut().push(batch.clone());
            Ok(())
        }

        fn add_syllabus_entry(&self, entry: &SyllabusEntry) -> anyhow::Result<()> {
            self.topics.borrow_mut().push(entry.clone());
            Ok(())
        }

        fn post_lost_found(&self, item: &LostFoundItem) -> anyhow::Result<()> {
            self.posts.borrow_mut().push(item.clone());
            Ok(())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 3).expect("valid date")
    }

    fn faculty_session() -> Session {
        login(
            &Backend::new(),
            Credentials::Faculty {
                id: "admin".to_string(),
                password: "admin".to_string(),
            },
        )
        .expect("faculty login")
    }

    fn student_session() -> Session {
        login(
            &Backend::new(),
            Credentials::Student {
                dept: "CSE".to_string(),
                roll: "21CS042".to_string(),
                email: "priya@campus.edu".to_string(),
                otp: "1234".to_string(),
            },
        )
        .expect("student login")
    }

    #[test]
    fn absence_batch_trims_and_drops_blanks() {
        let batch = parse_absence_batch(date(), " 12, 15 ,,21CS042 ").expect("batch");
        assert_eq!(batch.rolls, vec!["12", "15", "21CS042"]);
    }

    #[test]
    fn empty_absence_batch_is_rejected() {
        assert!(matches!(
            parse_absence_batch(date(), " , "),
            Err(TrackerError::InvalidInput(_))
        ));
    }

    #[test]
    fn absences_are_simulated_without_sink() {
        let batch = parse_absence_batch(date(), "1,2,3").expect("batch");
        let receipt = mark_absent(&faculty_session(), &Backend::new(), &batch).expect("marked");
        assert_eq!(
            receipt,
            WriteReceipt {
                count: 3,
                simulated: true
            }
        );
    }

    #[test]
    fn absences_reach_injected_sink() {
        let sink = MemorySink::default();
        let backend = Backend::new().with_sink(sink.clone());
        let batch = parse_absence_batch(date(), "7").expect("batch");

        let receipt = mark_absent(&faculty_session(), &backend, &batch).expect("marked");
        assert!(!receipt.simulated);
        assert_eq!(sink.absences.borrow().as_slice(), &[batch]);
    }

    #[test]
    fn students_cannot_mark_absences() {
        let batch = parse_absence_batch(date(), "7").expect("batch");
        let err = mark_absent(&student_session(), &Backend::new(), &batch).expect_err("forbidden");
        assert_eq!(
            err.downcast_ref::<TrackerError>(),
            Some(&TrackerError::Forbidden("marking attendance"))
        );
    }

    #[test]
    fn syllabus_upload_requires_topic() {
        let sink = MemorySink::default();
        let backend = Backend::new().with_sink(sink.clone());
        let mut entry = SyllabusEntry {
            date: date(),
            subject: "Data Structures (CS201)".to_string(),
            topic: " ".to_string(),
            video_url: String::new(),
            notes_url: String::new(),
        };

        assert!(upload_syllabus(&faculty_session(), &backend, &entry).is_err());
        entry.topic = "Binary Heaps".to_string();
        upload_syllabus(&faculty_session(), &backend, &entry).expect("uploaded");
        assert_eq!(sink.topics.borrow().len(), 1);
    }

    #[test]
    fn lost_found_post_needs_description() {
        let session = student_session();
        assert!(post_lost_found(&session, &Backend::new(), LostFoundKind::Lost, "  ").is_err());

        let (item, receipt) = post_lost_found(
            &session,
            &Backend::new(),
            LostFoundKind::Found,
            "Blue water bottle",
        )
        .expect("posted");
        assert_eq!(item.item, "Blue water bottle");
        assert_eq!(item.kind, LostFoundKind::Found);
        assert!(receipt.simulated);
    }

    #[test]
    fn either_role_can_post_lost_found() {
        let sink = MemorySink::default();
        let backend = Backend::new().with_sink(sink.clone());

        for session in [student_session(), faculty_session()] {
            let (_, receipt) =
                post_lost_found(&session, &backend, LostFoundKind::Lost, "Umbrella")
                    .expect("posted");
            assert!(!receipt.simulated);
        }
        assert_eq!(sink.posts.borrow().len(), 2);
    }
}
