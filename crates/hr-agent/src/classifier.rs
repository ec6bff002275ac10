//! Rule-based intent classifier.
//!
//! Decides from raw text alone whether a line is a QUESTION, a COMMAND or
//! UNDETERMINED. Cues are matched against whole lowercase tokens so that
//! short words like "mana" never fire inside "manajer". Multi-word cues
//! match consecutive tokens.
//!
//! Policy: any command cue wins over question cues ("tolong cek sisa cuti
//! budi?" must act); no cue at all is UNDETERMINED.

use hr_protocol::IntentType;

/// Interrogative words and question-pattern keywords (id/en).
pub const QUESTION_CUES: &[&str] = &[
    "siapa",
    "apa",
    "apakah",
    "berapa",
    "kapan",
    "dimana",
    "mana",
    "bagaimana",
    "kenapa",
    "sisa",
    "status",
    "email",
    "jabatan",
    "who",
    "what",
    "which",
    "when",
    "where",
    "how much",
    "how many",
    "is it",
];

/// Imperative and request verbs (id/en).
const COMMAND_CUES: &[&str] = &[
    "ajukan",
    "apply",
    "tolong",
    "jadwalkan",
    "schedule",
    "buat",
    "bikinin",
    "atur",
    "submit",
    "request",
    "cek",
    "check",
    "batalkan",
    "cancel",
    "daftarkan",
    "setujui",
    "approve",
    "tolak",
    "reject",
];

const QUESTION_MARK: &str = "?";

/// Cues found in one line of input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueMatch {
    pub question: Vec<&'static str>,
    pub command: Vec<&'static str>,
}

impl CueMatch {
    pub fn intent(&self) -> IntentType {
        if !self.command.is_empty() {
            IntentType::Command
        } else if !self.question.is_empty() {
            IntentType::Question
        } else {
            IntentType::Undetermined
        }
    }
}

/// Split text into lowercase word tokens. Apostrophes stay inside words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    tokens
        .windows(words.len())
        .any(|w| w.iter().zip(&words).all(|(t, p)| t == p))
}

fn matched(tokens: &[String], cues: &[&'static str]) -> Vec<&'static str> {
    cues.iter()
        .copied()
        .filter(|cue| contains_phrase(tokens, cue))
        .collect()
}

/// Lexical intent classifier. Pure and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Report which cues fire for `text`.
    pub fn explain(&self, text: &str) -> CueMatch {
        let tokens = tokenize(text);
        let mut question = matched(&tokens, QUESTION_CUES);
        if text.contains(QUESTION_MARK) {
            question.push(QUESTION_MARK);
        }
        CueMatch {
            question,
            command: matched(&tokens, COMMAND_CUES),
        }
    }

    /// Classify trimmed, non-empty text.
    pub fn detect(&self, text: &str) -> IntentType {
        self.explain(text).intent()
    }
}
