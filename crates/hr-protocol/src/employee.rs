use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric employee identifier as assigned by the HR system of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u32);

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employment status of a person in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Active,
    OnLeave,
    Resigned,
}

/// Core employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    /// Full display name, e.g. "Budi Santoso".
    pub name: String,
    pub email: String,
    /// Job title ("jabatan").
    pub title: String,
    pub department: String,
    /// Direct manager, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EmployeeId>,
    pub joined_on: NaiveDate,
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employee {
    /// Lightweight reference carried inside validated actions.
    pub fn to_ref(&self) -> EmployeeRef {
        EmployeeRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Resolved reference to exactly one employee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: EmployeeId,
    pub name: String,
}

impl std::fmt::Display for EmployeeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Kind of leave an employee can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// "Cuti tahunan".
    Annual,
    /// "Cuti sakit".
    Sick,
    /// "Cuti melahirkan".
    Maternity,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Annual, LeaveType::Sick, LeaveType::Maternity];

    /// Normalize free-form leave type text (Indonesian or English).
    ///
    /// Returns `None` for anything that doesn't name a known leave type.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.contains("tahunan") || lower.contains("annual") {
            Some(LeaveType::Annual)
        } else if lower.contains("sakit") || lower.contains("sick") {
            Some(LeaveType::Sick)
        } else if lower.contains("melahirkan") || lower.contains("maternity") {
            Some(LeaveType::Maternity)
        } else {
            None
        }
    }

    /// Indonesian display label.
    pub fn label(self) -> &'static str {
        match self {
            LeaveType::Annual => "Tahunan",
            LeaveType::Sick => "Sakit",
            LeaveType::Maternity => "Cuti Melahirkan",
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Remaining entitlement for one employee and leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub remaining_days: u32,
}

/// Lifecycle status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Menunggu Persetujuan",
            LeaveStatus::Approved => "Disetujui",
            LeaveStatus::Rejected => "Ditolak",
            LeaveStatus::Cancelled => "Dibatalkan",
        }
    }
}

/// Outcome chosen by an approver for a pending leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    /// Normalize free-form decision text ("Disetujui", "tolak", "approved").
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "disetujui" | "setujui" | "setuju" | "approve" | "approved" | "terima" | "diterima" => {
                Some(LeaveDecision::Approve)
            }
            "ditolak" | "tolak" | "reject" | "rejected" | "decline" | "declined" => {
                Some(LeaveDecision::Reject)
            }
            _ => None,
        }
    }

    /// Status the request moves to.
    pub fn status(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        }
    }
}

/// A submitted leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Number of calendar days covered, inclusive of both ends.
    pub fn days(&self) -> u32 {
        inclusive_days(self.start, self.end)
    }
}

/// Inclusive day count between two dates; zero if `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end - start).num_days();
    if span < 0 { 0 } else { span as u32 + 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A performance review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub id: String,
    pub employee_id: EmployeeId,
    pub reviewer_id: EmployeeId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub status: ReviewStatus,
}
