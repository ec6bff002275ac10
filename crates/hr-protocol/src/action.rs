use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::employee::{EmployeeRef, LeaveDecision, LeaveType};

/// Which operation an action request names.
///
/// The wire names are the values of the `action` field in the model's
/// JSON response; they must stay stable across model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ApplyLeave,
    ScheduleReview,
    CheckStatus,
    SubmitExpense,
    CancelLeave,
    DecideLeave,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::ApplyLeave,
        ActionKind::ScheduleReview,
        ActionKind::CheckStatus,
        ActionKind::SubmitExpense,
        ActionKind::CancelLeave,
        ActionKind::DecideLeave,
    ];

    /// Canonical wire name.
    pub fn wire_name(self) -> &'static str {
        match self {
            ActionKind::ApplyLeave => "apply_leave",
            ActionKind::ScheduleReview => "schedule_review",
            ActionKind::CheckStatus => "check_status",
            ActionKind::SubmitExpense => "submit_expense",
            ActionKind::CancelLeave => "cancel_leave",
            ActionKind::DecideLeave => "decide_leave",
        }
    }

    /// Parse a wire name, accepting the legacy Indonesian aliases.
    ///
    /// Matching is case-sensitive after trimming, like every other field of
    /// the response contract.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name.trim() {
            "apply_leave" | "ajukan_cuti" => Some(ActionKind::ApplyLeave),
            "schedule_review" | "jadwalkan_review" => Some(ActionKind::ScheduleReview),
            "check_status" | "cek_status_cuti" => Some(ActionKind::CheckStatus),
            "submit_expense" => Some(ActionKind::SubmitExpense),
            "cancel_leave" | "batalkan_cuti" => Some(ActionKind::CancelLeave),
            "decide_leave" | "approve_reject_cuti" => Some(ActionKind::DecideLeave),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A validated, fully populated HR operation ready for execution.
///
/// Only the action extractor constructs these, and only after every field
/// has been checked; the capability set consumes each one exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ApplyLeave {
        employee: EmployeeRef,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
    },
    ScheduleReview {
        employee: EmployeeRef,
        reviewer: EmployeeRef,
        when: NaiveDate,
    },
    CheckLeaveStatus {
        employee: EmployeeRef,
    },
    SubmitExpense {
        employee: EmployeeRef,
        category: String,
        /// Whole rupiah.
        amount: u64,
    },
    CancelLeave {
        request_id: String,
    },
    DecideLeave {
        request_id: String,
        decision: LeaveDecision,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ApplyLeave { .. } => ActionKind::ApplyLeave,
            Action::ScheduleReview { .. } => ActionKind::ScheduleReview,
            Action::CheckLeaveStatus { .. } => ActionKind::CheckStatus,
            Action::SubmitExpense { .. } => ActionKind::SubmitExpense,
            Action::CancelLeave { .. } => ActionKind::CancelLeave,
            Action::DecideLeave { .. } => ActionKind::DecideLeave,
        }
    }

    /// The employee the action is performed for. Actions on an existing
    /// leave request name the request instead.
    pub fn employee(&self) -> Option<&EmployeeRef> {
        match self {
            Action::ApplyLeave { employee, .. }
            | Action::ScheduleReview { employee, .. }
            | Action::CheckLeaveStatus { employee }
            | Action::SubmitExpense { employee, .. } => Some(employee),
            Action::CancelLeave { .. } | Action::DecideLeave { .. } => None,
        }
    }

    /// What the action is about, for logs: an employee name or a request id.
    pub fn subject(&self) -> &str {
        match self {
            Action::CancelLeave { request_id } | Action::DecideLeave { request_id, .. } => {
                request_id.as_str()
            }
            other => other.employee().map_or("", |e| e.name.as_str()),
        }
    }
}
