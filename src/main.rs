use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

mod attendance;
mod catchup;
mod error;
mod faculty;
mod logging;
mod models;
mod report;
mod roll_call;
mod session;
mod store;

use models::{Credentials, LostFoundKind, StudentIdentity, SyllabusEntry};
use session::{Backend, Session};
use store::DataDir;

#[derive(Parser)]
#[command(name = "academic-tracker")]
#[command(about = "Attendance, marks and catch-up tracker for students and faculty", long_about = None)]
struct Cli {
    /// Directory holding profile.json and the CSV feeds. An accounts.csv
    /// there replaces the demo logins.
    #[arg(long, global = true, env = "TRACKER_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Simulate writes instead of touching the data directory
    #[arg(long, global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Student,
    Faculty,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, value_enum, default_value_t = RoleArg::Student)]
    role: RoleArg,
    #[arg(long, default_value = "")]
    dept: String,
    #[arg(long, default_value = "")]
    roll: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    otp: String,
    #[arg(long, default_value = "")]
    faculty_id: String,
    #[arg(long, default_value = "")]
    password: String,
}

impl LoginArgs {
    fn into_credentials(self) -> Credentials {
        match self.role {
            RoleArg::Student => Credentials::Student {
                dept: self.dept,
                roll: self.roll,
                email: self.email,
                otp: self.otp,
            },
            RoleArg::Faculty => Credentials::Faculty {
                id: self.faculty_id,
                password: self.password,
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Lost,
    Found,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall and per-subject attendance and marks
    Summary {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Project attendance after taking leave
    Leave {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        days: String,
    },
    /// List syllabus topics held on missed dates
    CatchUp {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        leave_days: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Mark a batch of roll numbers absent for a date
    MarkAbsent {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        date: NaiveDate,
        /// Comma-separated roll numbers
        #[arg(long)]
        rolls: String,
    },
    /// Add a topic to the syllabus timeline
    AddTopic {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "")]
        video_url: String,
        #[arg(long, default_value = "")]
        notes_url: String,
    },
    /// Post to or read the lost and found feed
    LostFound {
        #[command(subcommand)]
        action: LostFoundAction,
    },
    /// Tally the roster's present and absent marks
    RollCall {
        #[command(flatten)]
        login: LoginArgs,
    },
}

#[derive(Subcommand)]
enum LostFoundAction {
    Post {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        item: String,
    },
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let store = DataDir::new(&cli.data_dir);
    let mut backend = if cli.dry_run {
        Backend::new()
    } else {
        Backend::new().with_sink(store.clone())
    };
    if let Some(accounts) = store.load_accounts()? {
        backend = backend.with_authenticator(accounts);
    }
    tracing::debug!(data_dir = %cli.data_dir.display(), dry_run = cli.dry_run, "backend ready");

    match cli.command {
        Commands::Summary { login } => {
            let session = session::login(&backend, login.into_credentials())?;
            let identity = require_student(&session)?;
            let profile = store.load_profile()?;
            let summary = attendance::summarize(&profile.subjects);

            println!("{} dashboard for {}", session.role_label(), student_label(identity));
            println!(
                "Overall attendance {}/{} ({:.1}%, {})",
                summary.total_attended,
                summary.total_hosted,
                summary.overall_attendance_percent,
                attendance::classify(summary.overall_attendance_percent).label()
            );
            println!("Overall marks {:.1}%", summary.overall_marks_percent);
            for standing in attendance::subject_standings(&profile.subjects) {
                println!(
                    "- {}: {}/{} classes ({:.1}%, {}), marks {}/{}",
                    standing.subject.name,
                    standing.subject.attended_classes,
                    standing.subject.total_classes,
                    standing.attendance_percent,
                    standing.status.label(),
                    standing.subject.marks_obtained,
                    standing.subject.marks_total
                );
            }
        }
        Commands::Leave { login, days } => {
            let session = session::login(&backend, login.into_credentials())?;
            require_student(&session)?;
            let planned = attendance::parse_planned_absences(&days)?;
            let profile = store.load_profile()?;
            let projection = attendance::project_leave_for(&profile.subjects, planned)?;
            println!("{}", report::leave_message(&projection));
        }
        Commands::CatchUp { login } => {
            let session = session::login(&backend, login.into_credentials())?;
            let identity = require_student(&session)?;
            let profile = store.load_profile()?;
            let syllabus = store.load_syllabus()?;
            let ledger = store.load_absences()?;
            let missed = catchup::missed_dates_for(&profile, &ledger, &identity.roll);
            let topics = catchup::resolve_missed_topics(&syllabus, &missed);

            if topics.is_empty() {
                println!("You are all caught up! No missed classes found.");
                return Ok(());
            }

            println!("Topics to catch up on:");
            for topic in topics {
                println!(
                    "- {}: {} ({})\n  video: {}\n  notes: {}",
                    report::format_date(topic.date),
                    topic.topic,
                    topic.subject,
                    topic.video_url,
                    topic.notes_url
                );
            }
        }
        Commands::Report {
            login,
            leave_days,
            out,
        } => {
            let session = session::login(&backend, login.into_credentials())?;
            let identity = require_student(&session)?;
            let profile = store.load_profile()?;
            let syllabus = store.load_syllabus()?;
            let ledger = store.load_absences()?;
            let missed = catchup::missed_dates_for(&profile, &ledger, &identity.roll);
            let topics = catchup::resolve_missed_topics(&syllabus, &missed);
            let leave = match leave_days {
                Some(raw) => {
                    let planned = attendance::parse_planned_absences(&raw)?;
                    Some(attendance::project_leave_for(&profile.subjects, planned)?)
                }
                None => None,
            };

            let report =
                report::build_report(&student_label(identity), &profile, &topics, leave.as_ref());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::MarkAbsent { login, date, rolls } => {
            let session = session::login(&backend, login.into_credentials())?;
            let batch = faculty::parse_absence_batch(date, &rolls)?;
            let receipt = faculty::mark_absent(&session, &backend, &batch)?;
            println!(
                "Marked {} students as absent for {}.{}",
                receipt.count,
                report::format_date(date),
                simulated_note(receipt.simulated)
            );
        }
        Commands::AddTopic {
            login,
            date,
            subject,
            topic,
            video_url,
            notes_url,
        } => {
            let session = session::login(&backend, login.into_credentials())?;
            let entry = SyllabusEntry {
                date,
                subject,
                topic,
                video_url,
                notes_url,
            };
            let receipt = faculty::upload_syllabus(&session, &backend, &entry)?;
            println!(
                "Syllabus updated: {} added for {} in {}.{}",
                entry.topic,
                report::format_date(entry.date),
                entry.subject,
                simulated_note(receipt.simulated)
            );
        }
        Commands::LostFound { action } => match action {
            LostFoundAction::Post { login, kind, item } => {
                let session = session::login(&backend, login.into_credentials())?;
                let kind = match kind {
                    KindArg::Lost => LostFoundKind::Lost,
                    KindArg::Found => LostFoundKind::Found,
                };
                let (posted, receipt) = faculty::post_lost_found(&session, &backend, kind, &item)?;
                println!(
                    "Posted {:?}: {} ({}).{}",
                    posted.kind,
                    posted.item,
                    posted.id,
                    simulated_note(receipt.simulated)
                );
            }
            LostFoundAction::List { limit } => {
                let feed = store.load_lost_found()?;
                if feed.is_empty() {
                    println!("No lost or found items posted.");
                    return Ok(());
                }
                for item in feed.iter().take(limit) {
                    println!(
                        "- [{:?}] {} (posted {})",
                        item.kind,
                        item.item,
                        report::format_date(item.posted_on)
                    );
                }
            }
        },
        Commands::RollCall { login } => {
            let session = session::login(&backend, login.into_credentials())?;
            session.require_faculty("taking roll call")?;
            let roster = store.load_roster()?;
            let tally = roll_call::tally(&roster);
            println!(
                "Present: {} | Absent: {} | Unmarked: {}",
                tally.present, tally.absent, tally.unmarked
            );
        }
    }

    Ok(())
}

fn require_student(session: &Session) -> anyhow::Result<&StudentIdentity> {
    session
        .student()
        .context("this command needs a student login (--role student)")
}

fn student_label(identity: &StudentIdentity) -> String {
    format!("{} / {} ({})", identity.dept, identity.roll, identity.email)
}

fn simulated_note(simulated: bool) -> &'static str {
    if simulated {
        " (write simulated)"
    } else {
        ""
    }
}
