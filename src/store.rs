use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::models::{
    AbsenceBatch, AbsenceRecord, Credentials, LostFoundItem, Role, RollCallEntry,
    StudentProfile, SyllabusEntry,
};
use crate::session::{Authenticator, RecordSink};

const PROFILE_FILE: &str = "profile.json";
const SYLLABUS_FILE: &str = "syllabus.csv";
const ABSENCES_FILE: &str = "absences.csv";
const LOST_FOUND_FILE: &str = "lost_found.csv";
const ROSTER_FILE: &str = "roster.csv";
const ACCOUNTS_FILE: &str = "accounts.csv";

/// Directory of JSON and CSV files standing in for the remote data store.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load_profile(&self) -> anyhow::Result<StudentProfile> {
        let path = self.root.join(PROFILE_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("malformed {}", path.display()))
    }

    pub fn load_syllabus(&self) -> anyhow::Result<Vec<SyllabusEntry>> {
        read_rows(&self.root.join(SYLLABUS_FILE))
    }

    pub fn load_absences(&self) -> anyhow::Result<Vec<AbsenceRecord>> {
        read_rows(&self.root.join(ABSENCES_FILE))
    }

    pub fn load_lost_found(&self) -> anyhow::Result<Vec<LostFoundItem>> {
        read_rows(&self.root.join(LOST_FOUND_FILE))
    }

    pub fn load_roster(&self) -> anyhow::Result<Vec<RollCallEntry>> {
        let path = self.root.join(ROSTER_FILE);
        if !path.exists() {
            anyhow::bail!("roster not found at {}", path.display());
        }
        read_rows(&path)
    }

    /// Login accounts, if the directory carries an `accounts.csv`.
    pub fn load_accounts(&self) -> anyhow::Result<Option<AccountBook>> {
        let path = self.root.join(ACCOUNTS_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let accounts = read_rows(&path)?;
        Ok(Some(AccountBook { accounts }))
    }
}

/// One row of `accounts.csv`: a student roll with its one-time code, or a
/// faculty id with its password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub role: Role,
    pub id: String,
    pub secret: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: Vec<Account>,
}

impl Authenticator for AccountBook {
    fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<bool> {
        let (role, id, secret) = match credentials {
            Credentials::Student {
                dept,
                roll,
                email,
                otp,
            } => {
                if dept.trim().is_empty() || email.trim().is_empty() {
                    return Ok(false);
                }
                (Role::Student, roll, otp)
            }
            Credentials::Faculty { id, password } => (Role::Faculty, id, password),
        };

        Ok(self
            .accounts
            .iter()
            .any(|account| account.role == role && &account.id == id && &account.secret == secret))
    }
}

impl RecordSink for DataDir {
    fn record_absences(&self, batch: &AbsenceBatch) -> anyhow::Result<()> {
        let path = self.root.join(ABSENCES_FILE);
        // An empty file still needs the header row.
        let needs_header = std::fs::metadata(&path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        for roll in &batch.rolls {
            writer.serialize(AbsenceRecord {
                date: batch.date,
                roll: roll.clone(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn add_syllabus_entry(&self, entry: &SyllabusEntry) -> anyhow::Result<()> {
        let path = self.root.join(SYLLABUS_FILE);
        let mut syllabus: Vec<SyllabusEntry> = read_rows(&path)?;
        syllabus.push(entry.clone());
        syllabus.sort_by_key(|existing| existing.date);
        write_rows(&path, &syllabus)
    }

    fn post_lost_found(&self, item: &LostFoundItem) -> anyhow::Result<()> {
        let path = self.root.join(LOST_FOUND_FILE);
        let mut feed: Vec<LostFoundItem> = read_rows(&path)?;
        feed.insert(0, item.clone());
        write_rows(&path, &feed)
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no file yet, treating as empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        rows.push(result.with_context(|| format!("malformed row in {}", path.display()))?);
    }
    Ok(rows)
}

/// Rewrites the file through a sibling temp file so a failed write leaves
/// the previous contents in place.
fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage a write in {}", dir.display()))?;
    {
        let mut writer = csv::Writer::from_writer(&mut staged);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    staged
        .persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
