//! Query router: QUESTION text → lookup template → answer text.
//!
//! Routing is a deterministic keyword match. Whatever tokens remain after
//! removing cue words, leave-type words and filler is taken as the employee
//! name. Answering resolves that name through the record store.

use std::sync::Arc;

use thiserror::Error;

use hr_capabilities::format::long_date;
use hr_protocol::{Employee, LeaveType, QueryKind, QueryTemplate, RoutingFailure};
use hr_records::{HONORIFICS, NameLookup, RecordError, RecordStore};

use crate::classifier::{QUESTION_CUES, tokenize};

const MANAGER_CUES: &[&str] = &["manajer", "manager", "atasan"];
const BALANCE_CUES: &[&str] = &["sisa", "berapa", "balance", "remaining", "much", "many", "left"];
const LEAVE_CUES: &[&str] = &["cuti", "leave"];
const STATUS_CUES: &[&str] = &["status"];
const TITLE_CUES: &[&str] = &["jabatan", "title", "position", "posisi"];
const EMAIL_CUES: &[&str] = &["email", "surel", "e-mail"];

const SICK_WORDS: &[&str] = &["sakit", "sick"];
const MATERNITY_WORDS: &[&str] = &["melahirkan", "maternity"];
const ANNUAL_WORDS: &[&str] = &["tahunan", "annual"];

/// Filler that never belongs to a name. Question cues and honorifics are
/// dropped as well.
const STOP_WORDS: &[&str] = &[
    "yang", "dari", "si", "untuk", "buat", "punya", "milik", "adalah", "ada", "masih", "lagi",
    "hari", "days", "day", "of", "is", "are", "the", "whose", "does", "do", "have", "has", "for",
    "kah", "dong", "ya", "sih", "nih", "ke", "di", "terakhir", "last", "latest", "current", "saat",
    "ini", "sekarang", "karyawan", "employee", "tolong", "info", "kasih", "tahu", "tau", "please",
    "now", "still",
];

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no employee named '{0}'")]
    NotFound(String),

    #[error("'{name}' matches several employees")]
    Ambiguous { name: String, candidates: Vec<String> },

    #[error("record lookup failed: {0}")]
    Records(#[from] RecordError),
}

/// Drop a possessive `'s` or an Indonesian `-nya` suffix when what remains is
/// a cue word ("manajernya", "leo's").
fn normalize(token: &str) -> String {
    if let Some(stem) = token.strip_suffix("'s") {
        return stem.to_string();
    }
    if let Some(stem) = token.strip_suffix("nya")
        && is_vocabulary(stem)
    {
        return stem.to_string();
    }
    token.trim_end_matches('\'').to_string()
}

fn is_vocabulary(token: &str) -> bool {
    [
        MANAGER_CUES,
        BALANCE_CUES,
        LEAVE_CUES,
        STATUS_CUES,
        TITLE_CUES,
        EMAIL_CUES,
        SICK_WORDS,
        MATERNITY_WORDS,
        ANNUAL_WORDS,
        STOP_WORDS,
        HONORIFICS,
    ]
    .iter()
    .any(|list| list.contains(&token))
        || QUESTION_CUES
            .iter()
            .any(|cue| cue.split_whitespace().any(|word| word == token))
}

fn has_any(tokens: &[String], cues: &[&str]) -> bool {
    tokens.iter().any(|t| cues.contains(&t.as_str()))
}

fn leave_type_of(tokens: &[String]) -> LeaveType {
    if has_any(tokens, SICK_WORDS) {
        LeaveType::Sick
    } else if has_any(tokens, MATERNITY_WORDS) {
        LeaveType::Maternity
    } else {
        LeaveType::Annual
    }
}

fn leave_phrase(leave_type: LeaveType) -> &'static str {
    match leave_type {
        LeaveType::Annual => "cuti tahunan",
        LeaveType::Sick => "cuti sakit",
        LeaveType::Maternity => "cuti melahirkan",
    }
}

/// Maps questions onto lookup templates and answers them.
pub struct QueryRouter {
    records: Arc<dyn RecordStore>,
}

impl QueryRouter {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Map QUESTION text to a lookup template. Pure; touches no records.
    pub fn route(&self, text: &str) -> Result<QueryTemplate, RoutingFailure> {
        let tokens: Vec<String> = tokenize(text).iter().map(|t| normalize(t)).collect();

        let kind = if has_any(&tokens, MANAGER_CUES) {
            QueryKind::ManagerOf
        } else if has_any(&tokens, BALANCE_CUES) && has_any(&tokens, LEAVE_CUES) {
            QueryKind::LeaveBalanceOf
        } else if has_any(&tokens, STATUS_CUES) && has_any(&tokens, LEAVE_CUES) {
            QueryKind::LeaveStatusOf
        } else if has_any(&tokens, TITLE_CUES) {
            QueryKind::TitleOf
        } else if has_any(&tokens, EMAIL_CUES) {
            QueryKind::EmailOf
        } else {
            return Err(RoutingFailure::UnrecognizedQueryShape);
        };

        let subject = tokens
            .iter()
            .filter(|t| !is_vocabulary(t))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if subject.is_empty() {
            return Err(RoutingFailure::MissingSubject(kind));
        }

        Ok(match kind {
            QueryKind::ManagerOf => QueryTemplate::ManagerOf { subject },
            QueryKind::LeaveBalanceOf => QueryTemplate::LeaveBalanceOf {
                subject,
                leave_type: leave_type_of(&tokens),
            },
            QueryKind::LeaveStatusOf => QueryTemplate::LeaveStatusOf { subject },
            QueryKind::TitleOf => QueryTemplate::TitleOf { subject },
            QueryKind::EmailOf => QueryTemplate::EmailOf { subject },
        })
    }

    /// Run the lookup behind `template` and format the answer.
    pub async fn answer(&self, template: &QueryTemplate) -> Result<String, QueryError> {
        let employee = self.resolve(template.subject()).await?;

        let text = match template {
            QueryTemplate::ManagerOf { .. } => match self.records.manager_of(&employee).await? {
                Some(manager) => format!(
                    "Manajer {} adalah {} ({}).",
                    employee.name, manager.name, manager.title
                ),
                None => format!("{} tidak memiliki manajer langsung.", employee.name),
            },
            QueryTemplate::LeaveBalanceOf { leave_type, .. } => {
                match self.records.leave_balance(employee.id, *leave_type).await? {
                    Some(balance) => format!(
                        "Sisa {} {} adalah {} hari.",
                        leave_phrase(*leave_type),
                        employee.name,
                        balance.remaining_days
                    ),
                    None => format!(
                        "{} tidak memiliki jatah {}.",
                        employee.name,
                        leave_phrase(*leave_type)
                    ),
                }
            }
            QueryTemplate::TitleOf { .. } => format!(
                "Jabatan {} adalah {} di departemen {}.",
                employee.name, employee.title, employee.department
            ),
            QueryTemplate::EmailOf { .. } => {
                format!("Email {} adalah {}.", employee.name, employee.email)
            }
            QueryTemplate::LeaveStatusOf { .. } => {
                match self.records.latest_leave_request(employee.id).await? {
                    Some(request) => format!(
                        "Status cuti terakhir {} ({}, cuti {} {} s.d. {}): {}.",
                        employee.name,
                        request.id,
                        request.leave_type.label().to_lowercase(),
                        long_date(request.start),
                        long_date(request.end),
                        request.status.label()
                    ),
                    None => format!("Belum ada pengajuan cuti untuk {}.", employee.name),
                }
            }
        };
        Ok(text)
    }

    async fn resolve(&self, subject: &str) -> Result<Employee, QueryError> {
        match self.records.find_by_name(subject).await? {
            NameLookup::Found(employee) => Ok(employee),
            NameLookup::NotFound => Err(QueryError::NotFound(subject.to_string())),
            lookup @ NameLookup::Ambiguous(_) => Err(QueryError::Ambiguous {
                name: subject.to_string(),
                candidates: lookup.candidate_names(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hr_protocol::{EmployeeId, EmploymentStatus};
    use hr_records::MemoryRecordStore;

    fn router() -> QueryRouter {
        QueryRouter::new(Arc::new(MemoryRecordStore::with_sample_data()))
    }

    fn route(text: &str) -> Result<QueryTemplate, RoutingFailure> {
        router().route(text)
    }

    #[test]
    fn balance_question() {
        assert_eq!(
            route("sisa cuti rina berapa?"),
            Ok(QueryTemplate::LeaveBalanceOf {
                subject: "rina".into(),
                leave_type: LeaveType::Annual,
            })
        );
    }

    #[test]
    fn balance_question_with_leave_type() {
        assert_eq!(
            route("berapa sisa cuti sakit Dewi Lestari"),
            Ok(QueryTemplate::LeaveBalanceOf {
                subject: "dewi lestari".into(),
                leave_type: LeaveType::Sick,
            })
        );
        assert_eq!(
            route("how much maternity leave does dewi have left?"),
            Ok(QueryTemplate::LeaveBalanceOf {
                subject: "dewi".into(),
                leave_type: LeaveType::Maternity,
            })
        );
    }

    #[test]
    fn manager_question_variants() {
        let expected = Ok(QueryTemplate::ManagerOf {
            subject: "budi".into(),
        });
        assert_eq!(route("siapa manajer budi?"), expected);
        assert_eq!(route("Who is Budi's manager?"), expected);
        assert_eq!(route("atasannya budi siapa ya"), expected);
    }

    #[test]
    fn manager_wins_over_other_templates() {
        assert!(matches!(
            route("email manajer leo apa"),
            Ok(QueryTemplate::ManagerOf { .. })
        ));
    }

    #[test]
    fn status_title_and_email_questions() {
        assert_eq!(
            route("status cuti leo?"),
            Ok(QueryTemplate::LeaveStatusOf {
                subject: "leo".into()
            })
        );
        assert_eq!(
            route("jabatan santi apa?"),
            Ok(QueryTemplate::TitleOf {
                subject: "santi".into()
            })
        );
        assert_eq!(
            route("What is Leo's email?"),
            Ok(QueryTemplate::EmailOf {
                subject: "leo".into()
            })
        );
    }

    #[test]
    fn question_words_and_filler_never_reach_the_subject() {
        let leo_status = Ok(QueryTemplate::LeaveStatusOf {
            subject: "leo".into(),
        });
        assert_eq!(route("bagaimana status cuti leo?"), leo_status);
        assert_eq!(route("kapan status cuti leo?"), leo_status);
        assert_eq!(
            route("sisa cuti rina berapa hari lagi?"),
            Ok(QueryTemplate::LeaveBalanceOf {
                subject: "rina".into(),
                leave_type: LeaveType::Annual,
            })
        );
        assert_eq!(
            route("where is leo's email?"),
            Ok(QueryTemplate::EmailOf {
                subject: "leo".into()
            })
        );
        assert_eq!(
            route("dimana email bu santi sekarang?"),
            Ok(QueryTemplate::EmailOf {
                subject: "santi".into()
            })
        );
    }

    #[tokio::test]
    async fn answers_question_led_by_interrogative() {
        let router = router();
        let template = router.route("bagaimana status cuti leo?").unwrap();
        let answer = router.answer(&template).await.unwrap();
        assert!(answer.starts_with("Status cuti terakhir Leo Pratama (LR002"));
    }

    #[test]
    fn unknown_shape_and_missing_subject() {
        assert_eq!(
            route("kapan libur nasional?"),
            Err(RoutingFailure::UnrecognizedQueryShape)
        );
        assert_eq!(
            route("siapa manajernya?"),
            Err(RoutingFailure::MissingSubject(QueryKind::ManagerOf))
        );
        assert_eq!(
            route("berapa sisa cuti tahunan?"),
            Err(RoutingFailure::MissingSubject(QueryKind::LeaveBalanceOf))
        );
    }

    #[tokio::test]
    async fn answers_balance() {
        let router = router();
        let template = router.route("sisa cuti rina berapa?").unwrap();
        assert_eq!(
            router.answer(&template).await.unwrap(),
            "Sisa cuti tahunan Rina Wijaya adalah 8 hari."
        );
    }

    #[tokio::test]
    async fn answers_missing_entitlement() {
        let router = router();
        let template = QueryTemplate::LeaveBalanceOf {
            subject: "leo".into(),
            leave_type: LeaveType::Maternity,
        };
        assert_eq!(
            router.answer(&template).await.unwrap(),
            "Leo Pratama tidak memiliki jatah cuti melahirkan."
        );
    }

    #[tokio::test]
    async fn answers_manager_and_top_of_chain() {
        let router = router();
        let budi = QueryTemplate::ManagerOf {
            subject: "budi".into(),
        };
        assert_eq!(
            router.answer(&budi).await.unwrap(),
            "Manajer Budi Santoso adalah Agus Hidayat (Head of Engineering)."
        );
        let agus = QueryTemplate::ManagerOf {
            subject: "agus".into(),
        };
        assert_eq!(
            router.answer(&agus).await.unwrap(),
            "Agus Hidayat tidak memiliki manajer langsung."
        );
    }

    #[tokio::test]
    async fn answers_title_email_and_status() {
        let router = router();
        let title = router
            .answer(&QueryTemplate::TitleOf {
                subject: "santi".into(),
            })
            .await
            .unwrap();
        assert_eq!(title, "Jabatan Santi Putri adalah HR Manager di departemen Human Resources.");

        let email = router
            .answer(&QueryTemplate::EmailOf {
                subject: "leo".into(),
            })
            .await
            .unwrap();
        assert_eq!(email, "Email Leo Pratama adalah leo.pratama@smarthr.co.id.");

        let status = router
            .answer(&QueryTemplate::LeaveStatusOf {
                subject: "leo".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            status,
            "Status cuti terakhir Leo Pratama (LR002, cuti sakit 22 September 2025 s.d. 23 September 2025): Menunggu Persetujuan."
        );

        let none = router
            .answer(&QueryTemplate::LeaveStatusOf {
                subject: "rina".into(),
            })
            .await
            .unwrap();
        assert_eq!(none, "Belum ada pengajuan cuti untuk Rina Wijaya.");
    }

    #[tokio::test]
    async fn unknown_subject_is_not_found() {
        let result = router()
            .answer(&QueryTemplate::EmailOf {
                subject: "joko".into(),
            })
            .await;
        assert!(matches!(result, Err(QueryError::NotFound(name)) if name == "joko"));
    }

    #[tokio::test]
    async fn shared_name_is_ambiguous() {
        let mut store = MemoryRecordStore::with_sample_data();
        store
            .insert_employee(Employee {
                id: EmployeeId(7),
                name: "Budi Hartono".into(),
                email: "budi.hartono@smarthr.co.id".into(),
                title: "QA Engineer".into(),
                department: "Engineering".into(),
                manager_id: Some(EmployeeId(1)),
                joined_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                status: EmploymentStatus::Active,
            })
            .unwrap();
        let router = QueryRouter::new(Arc::new(store));

        let template = router.route("siapa manajer budi?").unwrap();
        match router.answer(&template).await {
            Err(QueryError::Ambiguous { name, candidates }) => {
                assert_eq!(name, "budi");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }
}
