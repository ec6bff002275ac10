//! Action extraction: language model output → validated `Action`.
//!
//! The model only proposes field values. Every field is re-checked here in a
//! fixed order (shape, presence, enumerations, dates, names) so that a
//! malformed response always fails the same way, and no `Action` leaves this
//! module with an empty or unresolved field.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use hr_protocol::{
    Action, ActionKind, EmployeeRef, ExtractionFailure, LeaveDecision, LeaveType, ReasonCode,
};
use hr_records::{NameLookup, RecordError, RecordStore};

use crate::dates::resolve_date;
use crate::gateway::{CompletionOptions, LanguageModel, ModelError};
use crate::prompt::{build_prompt, build_reprompt, extract_json, required_fields};

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The model answered but the answer cannot become an `Action`.
    #[error("extraction rejected: {0}")]
    Rejected(#[from] ExtractionFailure),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("record lookup failed: {0}")]
    Records(#[from] RecordError),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Turns COMMAND text into a validated `Action`.
pub struct ActionExtractor {
    model: Arc<dyn LanguageModel>,
    records: Arc<dyn RecordStore>,
    options: CompletionOptions,
    reprompt_on_format_error: bool,
}

/// Field values read from the response, still as text.
struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    /// Read a field as trimmed text. Absent, null and blank all read as `None`.
    fn text(&self, key: &str) -> Result<Option<String>, ExtractionFailure> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            Some(Value::Number(n)) if key == "amount" => whole_number(n)
                .map(|v| Some(v.to_string()))
                .ok_or_else(|| {
                    ExtractionFailure::format_error(format!("amount {n} is not a whole number"))
                }),
            Some(other) => Err(ExtractionFailure::format_error(format!(
                "field '{key}' has unexpected type: {other}"
            ))),
        }
    }

    fn required(&self, key: &str) -> Result<String, ExtractionFailure> {
        self.text(key)?.ok_or_else(|| ExtractionFailure::missing(key))
    }
}

fn whole_number(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn action_kind(map: &Map<String, Value>) -> Result<ActionKind, ExtractionFailure> {
    let raw = map
        .get("action")
        .or_else(|| map.get("intent"))
        .ok_or_else(|| ExtractionFailure::format_error("response has no 'action'"))?;
    let name = raw
        .as_str()
        .ok_or_else(|| ExtractionFailure::format_error(format!("'action' is not text: {raw}")))?;
    ActionKind::from_wire(name)
        .ok_or_else(|| ExtractionFailure::format_error(format!("unknown action '{name}'")))
}

/// Accepts `150000`, `"150000"`, `"Rp150.000"`, `"1,500,000"`, `"Rp150.000,-"`.
///
/// `.` and `,` are read as thousands separators only when every group after
/// the first has exactly three digits, so `"150000.50"` and `"1.5"` are
/// rejected rather than inflated.
fn parse_amount(text: &str) -> Result<u64, ExtractionFailure> {
    let invalid =
        || ExtractionFailure::format_error(format!("amount '{text}' is not a whole rupiah number"));

    let trimmed = text.trim();
    let body = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("rp") => &trimmed[2..],
        _ => trimmed,
    };
    let body = body.trim_start_matches(['.', ' ']).trim_end_matches(",-").trim();

    let separator = body.chars().find(|c| matches!(c, '.' | ','));
    let groups: Vec<&str> = match separator {
        Some(sep) => body.split(sep).collect(),
        None => vec![body],
    };
    let digits_only = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    if !groups.iter().copied().all(digits_only) {
        return Err(invalid());
    }
    if let [first, rest @ ..] = groups.as_slice()
        && !rest.is_empty()
        && (first.len() > 3 || first.starts_with('0') || rest.iter().any(|g| g.len() != 3))
    {
        return Err(invalid());
    }
    groups.concat().parse().map_err(|_| invalid())
}

/// Normalize a leave request id ("lr002" → "LR002").
fn parse_request_id(text: &str) -> Result<String, ExtractionFailure> {
    let id = text.trim().to_uppercase();
    if id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(id)
    } else {
        Err(ExtractionFailure::format_error(format!(
            "leave_id '{text}' is not a request id"
        )))
    }
}

fn parse_decision(text: &str) -> Result<LeaveDecision, ExtractionFailure> {
    LeaveDecision::parse(text)
        .ok_or_else(|| ExtractionFailure::format_error(format!("unknown decision '{text}'")))
}

fn parse_leave_type(text: &str) -> Result<LeaveType, ExtractionFailure> {
    LeaveType::parse(text)
        .ok_or_else(|| ExtractionFailure::format_error(format!("unknown leave type '{text}'")))
}

fn parse_date(field: &str, value: &str, today: NaiveDate) -> Result<NaiveDate, ExtractionFailure> {
    resolve_date(value, today).map_err(|_| ExtractionFailure::UnparseableDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

impl ActionExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            model,
            records,
            options: CompletionOptions::default(),
            reprompt_on_format_error: false,
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Allow one extra model call when the first response is malformed.
    pub fn with_reprompt(mut self, enabled: bool) -> Self {
        self.reprompt_on_format_error = enabled;
        self
    }

    /// Extract a validated action from `text`, resolving dates against `today`.
    ///
    /// Makes one model call, or two when re-prompting is enabled and the first
    /// response has the wrong shape.
    pub async fn extract(&self, text: &str, today: NaiveDate) -> ExtractResult<Action> {
        let prompt = build_prompt(text, today);
        let response = self.model.complete(&prompt, &self.options).await?;
        let first = self.interpret(&response, today).await;

        match first {
            Err(ExtractError::Rejected(ref failure))
                if self.reprompt_on_format_error
                    && failure.reason_code() == ReasonCode::ModelFormatError =>
            {
                tracing::info!(
                    model = self.model.model_name(),
                    problem = %failure,
                    "malformed model response, re-prompting once"
                );
                let prompt = build_reprompt(text, today, &failure.to_string());
                let response = self.model.complete(&prompt, &self.options).await?;
                self.interpret(&response, today).await
            }
            other => other,
        }
    }

    /// Validate one raw model response.
    pub async fn interpret(&self, response: &str, today: NaiveDate) -> ExtractResult<Action> {
        tracing::debug!(response, "model response");

        // 1. Shape and action type.
        let json = extract_json(response)
            .ok_or_else(|| ExtractionFailure::format_error("no JSON object in response"))?;
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ExtractionFailure::format_error(format!("invalid JSON: {e}")))?;
        let map = value
            .as_object()
            .ok_or_else(|| ExtractionFailure::format_error("response is not a JSON object"))?;
        let kind = action_kind(map)?;
        let fields = Fields { map };

        // 2. Presence of every required field, in declaration order.
        let mut values = Vec::with_capacity(3);
        for key in required_fields(kind) {
            values.push(fields.required(key)?);
        }

        let action = match kind {
            ActionKind::ApplyLeave => {
                let end_text = fields.text("end_date")?;
                // 3. Enumerations.
                let leave_type = parse_leave_type(&values[1])?;
                // 4. Dates.
                let start = parse_date("start_date", &values[2], today)?;
                let end = match end_text {
                    Some(ref text) => parse_date("end_date", text, today)?,
                    None => start,
                };
                if end < start {
                    return Err(ExtractionFailure::InvalidDateRange {
                        start: start.to_string(),
                        end: end.to_string(),
                    }
                    .into());
                }
                // 5. Names.
                let employee = self.resolve(&values[0]).await?;
                Action::ApplyLeave {
                    employee,
                    leave_type,
                    start,
                    end,
                }
            }
            ActionKind::ScheduleReview => {
                let when = parse_date("date", &values[2], today)?;
                let employee = self.resolve(&values[0]).await?;
                let reviewer = self.resolve(&values[1]).await?;
                Action::ScheduleReview {
                    employee,
                    reviewer,
                    when,
                }
            }
            ActionKind::CheckStatus => Action::CheckLeaveStatus {
                employee: self.resolve(&values[0]).await?,
            },
            ActionKind::SubmitExpense => {
                let amount = parse_amount(&values[2])?;
                let employee = self.resolve(&values[0]).await?;
                Action::SubmitExpense {
                    employee,
                    category: values[1].clone(),
                    amount,
                }
            }
            ActionKind::CancelLeave => Action::CancelLeave {
                request_id: parse_request_id(&values[0])?,
            },
            ActionKind::DecideLeave => {
                let request_id = parse_request_id(&values[0])?;
                let decision = parse_decision(&values[1])?;
                Action::DecideLeave {
                    request_id,
                    decision,
                }
            }
        };
        Ok(action)
    }

    /// Resolve a name to exactly one employee. Zero or several is ambiguous.
    async fn resolve(&self, name: &str) -> ExtractResult<EmployeeRef> {
        match self.records.find_by_name(name).await? {
            NameLookup::Found(employee) => Ok(employee.to_ref()),
            lookup => Err(ExtractionFailure::AmbiguousEmployee {
                name: name.to_string(),
                candidates: lookup.candidate_names(),
            }
            .into()),
        }
    }
}
