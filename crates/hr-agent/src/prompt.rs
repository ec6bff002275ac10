//! Prompt/response contract with the language model.
//!
//! The prompt enumerates the allowed actions and their fields and demands a
//! single flat JSON object. This text is the only wire contract with the
//! backend and must stay stable when the backend is swapped.

use chrono::{Days, NaiveDate, Weekday};

use hr_protocol::ActionKind;

use crate::dates::next_weekday;

/// Flat response keys, in the order the prompt documents them.
pub const RESPONSE_KEYS: &[&str] = &[
    "action",
    "employee_name",
    "leave_type",
    "start_date",
    "end_date",
    "reviewer_name",
    "date",
    "category",
    "amount",
    "leave_id",
    "status",
];

/// Required fields per action, in validation order.
pub fn required_fields(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::ApplyLeave => &["employee_name", "leave_type", "start_date"],
        ActionKind::ScheduleReview => &["employee_name", "reviewer_name", "date"],
        ActionKind::CheckStatus => &["employee_name"],
        ActionKind::SubmitExpense => &["employee_name", "category", "amount"],
        ActionKind::CancelLeave => &["leave_id"],
        ActionKind::DecideLeave => &["leave_id", "status"],
    }
}

fn action_description(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::ApplyLeave => {
            "pengajuan cuti. Wajib: employee_name, leave_type (Tahunan | Sakit | Cuti Melahirkan), start_date. Opsional: end_date (default = start_date)"
        }
        ActionKind::ScheduleReview => {
            "jadwal review performa. Wajib: employee_name, reviewer_name, date"
        }
        ActionKind::CheckStatus => "cek status cuti terakhir. Wajib: employee_name",
        ActionKind::SubmitExpense => {
            "klaim biaya. Wajib: employee_name, category, amount (angka rupiah tanpa titik)"
        }
        ActionKind::CancelLeave => "pembatalan pengajuan cuti. Wajib: leave_id",
        ActionKind::DecideLeave => {
            "persetujuan atau penolakan pengajuan cuti. Wajib: leave_id, status (Disetujui | Ditolak)"
        }
    }
}

/// Build the extraction prompt for `command`, anchored to `today`.
pub fn build_prompt(command: &str, today: NaiveDate) -> String {
    let tomorrow = today + Days::new(1);
    let day_after = today + Days::new(2);
    let next_friday = next_weekday(today, Weekday::Fri);

    let mut prompt = String::with_capacity(2048);
    prompt.push_str(
        "Kamu adalah asisten HR yang mengekstrak informasi terstruktur dari perintah bahasa Indonesia atau Inggris.\n\n",
    );
    prompt.push_str(&format!("HARI INI: {today}\n\n"));
    prompt.push_str(&format!("PERINTAH USER: \"{}\"\n\n", command.trim()));

    prompt.push_str("AKSI YANG DIDUKUNG:\n");
    for kind in ActionKind::ALL {
        prompt.push_str(&format!(
            "- {}: {}\n",
            kind.wire_name(),
            action_description(kind)
        ));
    }

    prompt.push_str("\nFORMAT JAWABAN (satu objek JSON datar):\n{");
    let fields: Vec<String> = RESPONSE_KEYS
        .iter()
        .map(|k| format!("\"{k}\": ..."))
        .collect();
    prompt.push_str(&fields.join(", "));
    prompt.push_str("}\nKosongkan atau hilangkan field yang tidak disebutkan user. Jangan mengarang.\n\n");

    prompt.push_str("PANDUAN TANGGAL (format YYYY-MM-DD):\n");
    prompt.push_str(&format!("- \"besok\" = {tomorrow}\n"));
    prompt.push_str(&format!("- \"lusa\" = {day_after}\n"));
    prompt.push_str(&format!("- \"jumat depan\" = {next_friday}\n"));
    prompt.push_str("- \"Senin depan\", \"Jumat depan\" = hari tersebut pada minggu berikutnya\n");
    prompt.push_str("- Jika hanya 1 tanggal disebutkan, end_date = start_date\n\n");

    prompt.push_str("CONTOH:\n");
    prompt.push_str(
        "User: \"tolong apply cuti tahunan buat budi dari tgl 3 oktober sampai 5 oktober\"\n",
    );
    prompt.push_str(
        "JSON: {\"action\":\"apply_leave\",\"employee_name\":\"budi\",\"leave_type\":\"Tahunan\",\"start_date\":\"tgl 3 oktober\",\"end_date\":\"5 oktober\"}\n",
    );
    prompt.push_str("User: \"jadwalkan review performa utk rina dgn bu santi jumat depan\"\n");
    prompt.push_str(&format!(
        "JSON: {{\"action\":\"schedule_review\",\"employee_name\":\"rina\",\"reviewer_name\":\"santi\",\"date\":\"{next_friday}\"}}\n"
    ));
    prompt.push_str("User: \"submit expense transport 150000 untuk leo\"\n");
    prompt.push_str(
        "JSON: {\"action\":\"submit_expense\",\"employee_name\":\"leo\",\"category\":\"transport\",\"amount\":150000}\n",
    );
    prompt.push_str("User: \"batalkan cuti LR006\"\n");
    prompt.push_str("JSON: {\"action\":\"cancel_leave\",\"leave_id\":\"LR006\"}\n");
    prompt.push_str("User: \"tolak cuti LR003\"\n");
    prompt.push_str(
        "JSON: {\"action\":\"decide_leave\",\"leave_id\":\"LR003\",\"status\":\"Ditolak\"}\n\n",
    );

    prompt.push_str("RESPONS: Berikan HANYA JSON, tanpa penjelasan atau teks lain.");
    prompt
}

/// Prompt for the single retry after a malformed response.
pub fn build_reprompt(command: &str, today: NaiveDate, problem: &str) -> String {
    format!(
        "{}\n\nJawaban sebelumnya tidak valid ({problem}). Ulangi dengan SATU objek JSON yang valid.",
        build_prompt(command, today)
    )
}

/// Cut the JSON object out of a model response.
///
/// Tolerates markdown code fences and chatter around the outermost braces.
pub fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}
