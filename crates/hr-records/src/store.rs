//! Record store abstraction: lookups by name/id plus the writes the
//! capability set needs.

use async_trait::async_trait;
use chrono::NaiveDate;

use hr_protocol::{
    Employee, EmployeeId, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, PerformanceReview,
};

use crate::error::RecordResult;

/// Outcome of resolving a free-text name against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    Found(Employee),
    NotFound,
    Ambiguous(Vec<Employee>),
}

impl NameLookup {
    /// Full names of every candidate (empty unless ambiguous).
    pub fn candidate_names(&self) -> Vec<String> {
        match self {
            NameLookup::Ambiguous(list) => list.iter().map(|e| e.name.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// Classify a candidate list: zero → NotFound, one → Found, more → Ambiguous.
    pub fn from_candidates(mut candidates: Vec<Employee>) -> Self {
        match candidates.len() {
            0 => NameLookup::NotFound,
            1 => NameLookup::Found(candidates.remove(0)),
            _ => NameLookup::Ambiguous(candidates),
        }
    }
}

/// Read access to employee and leave facts.
///
/// Implementations must be safe under concurrent reads.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolve a (possibly partial) name to employee records.
    ///
    /// Case-insensitive. An exact full-name match wins; otherwise every
    /// token of `name` must equal one of the employee's name tokens.
    async fn find_by_name(&self, name: &str) -> RecordResult<NameLookup>;

    async fn employee(&self, id: EmployeeId) -> RecordResult<Option<Employee>>;

    async fn leave_balance(
        &self,
        id: EmployeeId,
        leave_type: LeaveType,
    ) -> RecordResult<Option<LeaveBalance>>;

    async fn leave_request(&self, id: &str) -> RecordResult<Option<LeaveRequest>>;

    /// Most recently submitted leave request for the employee.
    async fn latest_leave_request(&self, id: EmployeeId) -> RecordResult<Option<LeaveRequest>>;

    /// Reviews where the employee is either reviewee or reviewer.
    async fn reviews_involving(&self, id: EmployeeId) -> RecordResult<Vec<PerformanceReview>>;

    /// Direct manager of `employee`, if one is recorded.
    async fn manager_of(&self, employee: &Employee) -> RecordResult<Option<Employee>> {
        match employee.manager_id {
            Some(manager_id) => self.employee(manager_id).await,
            None => Ok(None),
        }
    }
}

/// New remaining days for an existing balance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub remaining_days: u32,
}

/// Write access used by the capability set to commit actions.
///
/// Each leave write is a single call so that a balance change and the request
/// it belongs to are applied together or not at all.
#[async_trait]
pub trait RecordLedger: RecordStore {
    /// Insert a new leave request and write its balance change.
    async fn commit_leave(
        &self,
        request: LeaveRequest,
        balance: BalanceUpdate,
    ) -> RecordResult<()>;

    /// Move an existing request to `status`, optionally writing a balance change.
    async fn update_leave_status(
        &self,
        request_id: &str,
        status: LeaveStatus,
        balance: Option<BalanceUpdate>,
    ) -> RecordResult<()>;

    async fn insert_review(&self, review: PerformanceReview) -> RecordResult<()>;

    /// Scheduled reviews on `date` where `id` is the reviewer.
    async fn reviews_by_reviewer_on(
        &self,
        id: EmployeeId,
        date: NaiveDate,
    ) -> RecordResult<Vec<PerformanceReview>> {
        let reviews = self.reviews_involving(id).await?;
        Ok(reviews
            .into_iter()
            .filter(|r| r.reviewer_id == id && r.date == date)
            .collect())
    }
}

/// Forms of address dropped from a name query ("bu santi" → "santi").
pub const HONORIFICS: &[&str] = &[
    "pak", "bu", "bapak", "ibu", "mas", "mbak", "saudara", "sdr", "sdri", "mr", "mrs", "ms",
];

/// Lowercase alphanumeric tokens of a name ("Budi  Santoso," → ["budi", "santoso"]).
pub fn name_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens of a name query with forms of address removed.
///
/// A query made only of honorifics is kept as is, so "mas" can still match
/// someone actually named Mas.
pub fn query_tokens(text: &str) -> Vec<String> {
    let tokens = name_tokens(text);
    let named: Vec<String> = tokens
        .iter()
        .filter(|t| !HONORIFICS.contains(&t.as_str()))
        .cloned()
        .collect();
    if named.is_empty() { tokens } else { named }
}

/// Whether `query` names `full_name` under the store's matching rules.
pub(crate) fn name_matches(query_tokens: &[String], full_name: &str) -> bool {
    if query_tokens.is_empty() {
        return false;
    }
    let tokens = name_tokens(full_name);
    query_tokens.iter().all(|q| tokens.iter().any(|t| t == q))
}
