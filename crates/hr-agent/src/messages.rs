//! User-facing Indonesian texts.
//!
//! Every typed failure the dispatcher can see maps to one of these strings;
//! none of them expose raw error details.

use hr_protocol::{ExtractionFailure, QueryKind, RoutingFailure};

use crate::gateway::ModelError;
use crate::router::QueryError;

pub const UNDETERMINED: &str =
    "Maaf, saya tidak yakin maksud Anda. Ketik 'help' untuk melihat contoh pertanyaan dan perintah.";

pub const FAREWELL: &str = "👋 Terima kasih! Sampai jumpa lagi.";

pub const PROMPT: &str = "You: ";

pub const BANNER: &str = "\
╔════════════════════════════════════════════════════════════╗
║          🤖 HR AGENT - Asisten HR Cerdas                   ║
╚════════════════════════════════════════════════════════════╝
Ketik 'help' untuk panduan, 'exit' untuk keluar.
";

pub const HELP: &str = "\
📖 PANDUAN PENGGUNAAN

PERTANYAAN (Query Data):
  • siapa manajer budi?
  • sisa cuti rina berapa?
  • sisa cuti sakit dewi berapa?
  • jabatan dewi apa?
  • email santi?
  • status cuti leo?

PERINTAH (Execute Action):
  • tolong apply cuti tahunan buat budi dari tgl 3 okt sampai 5 okt
  • jadwalkan review performa utk rina dgn bu santi jumat depan
  • ajukan cuti sakit untuk leo besok
  • cek status cuti terakhir dewi
  • submit expense transport 150000 untuk leo
  • batalkan cuti LR001
  • setujui cuti LR002

Ketik 'exit' atau 'quit' untuk keluar.
";

const RECORDS_UNAVAILABLE: &str =
    "⚠️ Data karyawan sedang tidak dapat diakses. Silakan coba lagi.";

fn field_label(field: &str) -> &str {
    match field {
        "employee_name" => "nama karyawan",
        "leave_type" => "jenis cuti (tahunan, sakit, atau melahirkan)",
        "start_date" => "tanggal mulai",
        "end_date" => "tanggal selesai",
        "reviewer_name" => "nama reviewer",
        "date" => "tanggal review",
        "category" => "kategori biaya",
        "amount" => "nominal biaya",
        "leave_id" => "ID pengajuan cuti (misalnya LR002)",
        "status" => "keputusan (setujui atau tolak)",
        other => other,
    }
}

fn topic(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::ManagerOf => "manajer",
        QueryKind::LeaveBalanceOf => "sisa cuti",
        QueryKind::TitleOf => "jabatan",
        QueryKind::EmailOf => "email",
        QueryKind::LeaveStatusOf => "status cuti",
    }
}

fn ambiguous(name: &str, candidates: &[String]) -> String {
    if candidates.is_empty() {
        format!("Karyawan bernama '{name}' tidak ditemukan. Mohon periksa kembali namanya.")
    } else {
        format!(
            "Nama '{name}' cocok dengan beberapa karyawan: {}. Mohon sebutkan nama lengkapnya.",
            candidates.join(", ")
        )
    }
}

/// One actionable message per extraction reason code.
pub fn extraction_failure(failure: &ExtractionFailure) -> String {
    match failure {
        ExtractionFailure::AmbiguousEmployee { name, candidates } => ambiguous(name, candidates),
        ExtractionFailure::MissingField { field } => format!(
            "Informasi {} belum disebutkan. Mohon ulangi perintah dengan melengkapinya.",
            field_label(field)
        ),
        ExtractionFailure::UnparseableDate { field, value } => format!(
            "Tanggal '{value}' untuk {} tidak dapat dipahami. Coba tulis seperti '3 okt', 'besok', atau '2025-10-03'.",
            field_label(field)
        ),
        ExtractionFailure::InvalidDateRange { start, end } => format!(
            "Tanggal selesai ({end}) tidak boleh sebelum tanggal mulai ({start})."
        ),
        ExtractionFailure::ModelFormatError { .. } => {
            "Maaf, saya tidak bisa memahami perintah tersebut. Coba ulangi dengan kalimat yang lebih jelas."
                .to_string()
        }
    }
}

/// Generic retry message for backend failures.
pub fn backend_failure(error: &ModelError) -> String {
    match error {
        ModelError::Timeout { .. } => {
            "⏱️ Layanan AI terlalu lama merespons. Silakan coba lagi.".to_string()
        }
        ModelError::Unavailable(_) | ModelError::Client(_) => {
            "⚠️ Layanan AI sedang tidak tersedia. Silakan coba lagi sebentar lagi.".to_string()
        }
    }
}

pub fn records_failure() -> String {
    RECORDS_UNAVAILABLE.to_string()
}

pub fn routing_failure(failure: RoutingFailure) -> String {
    match failure {
        RoutingFailure::UnrecognizedQueryShape => {
            "Maaf, saya tidak tahu bagaimana menjawab pertanyaan ini. Ketik 'help' untuk contoh pertanyaan."
                .to_string()
        }
        RoutingFailure::MissingSubject(kind) => format!(
            "Pertanyaan tentang {} siapa? Mohon sebutkan nama karyawannya.",
            topic(kind)
        ),
    }
}

pub fn query_failure(error: &QueryError) -> String {
    match error {
        QueryError::NotFound(name) => ambiguous(name, &[]),
        QueryError::Ambiguous { name, candidates } => ambiguous(name, candidates),
        QueryError::Records(_) => records_failure(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reason_code_has_a_distinct_message() {
        let failures = [
            ExtractionFailure::AmbiguousEmployee {
                name: "budi".into(),
                candidates: vec!["Budi Hartono".into(), "Budi Santoso".into()],
            },
            ExtractionFailure::missing("start_date"),
            ExtractionFailure::UnparseableDate {
                field: "date".into(),
                value: "kapan-kapan".into(),
            },
            ExtractionFailure::InvalidDateRange {
                start: "2025-10-05".into(),
                end: "2025-10-03".into(),
            },
            ExtractionFailure::format_error("x"),
        ];
        let messages: Vec<String> = failures.iter().map(extraction_failure).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn ambiguity_lists_candidates() {
        let msg = extraction_failure(&ExtractionFailure::AmbiguousEmployee {
            name: "budi".into(),
            candidates: vec!["Budi Hartono".into(), "Budi Santoso".into()],
        });
        assert!(msg.contains("Budi Hartono, Budi Santoso"));
    }

    #[test]
    fn missing_field_uses_readable_label() {
        let msg = extraction_failure(&ExtractionFailure::missing("reviewer_name"));
        assert!(msg.contains("nama reviewer"));
        assert!(!msg.contains("reviewer_name"));
    }

    #[test]
    fn format_error_hides_detail() {
        let msg = extraction_failure(&ExtractionFailure::format_error("serde: trailing comma"));
        assert!(!msg.contains("serde"));
    }

    #[test]
    fn backend_failures_ask_to_retry() {
        for error in [
            ModelError::Timeout { timeout_secs: 5 },
            ModelError::Unavailable("connection refused".into()),
        ] {
            let msg = backend_failure(&error);
            assert!(msg.contains("coba lagi"));
            assert!(!msg.contains("connection refused"));
        }
    }

    #[test]
    fn missing_subject_names_topic() {
        let msg = routing_failure(RoutingFailure::MissingSubject(QueryKind::ManagerOf));
        assert!(msg.contains("manajer"));
    }

    #[test]
    fn help_lists_reserved_words() {
        assert!(HELP.contains("exit"));
        assert!(HELP.contains("sisa cuti rina berapa?"));
    }
}
