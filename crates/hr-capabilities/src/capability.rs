//! Capability set abstraction. One operation per action variant.

use async_trait::async_trait;
use chrono::NaiveDate;

use hr_protocol::{Action, EmployeeRef, LeaveDecision, LeaveType};

use crate::error::CapabilityResult;

/// Successful outcome of a capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Identifier of the created record, if the operation created one.
    pub reference: Option<String>,
    /// User-facing confirmation text.
    pub message: String,
}

impl Confirmation {
    pub fn new(reference: Option<String>, message: impl Into<String>) -> Self {
        Self {
            reference,
            message: message.into(),
        }
    }
}

/// The concrete HR operations the agent can invoke.
///
/// Implementations define their own serialization for conflicting writes on
/// the same employee; callers may invoke operations from concurrent turns.
#[async_trait]
pub trait CapabilitySet: Send + Sync {
    async fn apply_leave(
        &self,
        employee: &EmployeeRef,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CapabilityResult<Confirmation>;

    async fn schedule_review(
        &self,
        employee: &EmployeeRef,
        reviewer: &EmployeeRef,
        when: NaiveDate,
    ) -> CapabilityResult<Confirmation>;

    async fn check_leave_status(&self, employee: &EmployeeRef) -> CapabilityResult<Confirmation>;

    async fn submit_expense(
        &self,
        employee: &EmployeeRef,
        category: &str,
        amount: u64,
    ) -> CapabilityResult<Confirmation>;

    /// Withdraw a pending or approved request, returning any debited days.
    async fn cancel_leave(&self, request_id: &str) -> CapabilityResult<Confirmation>;

    /// Approve or reject a pending request. Approval debits the balance.
    async fn decide_leave(
        &self,
        request_id: &str,
        decision: LeaveDecision,
    ) -> CapabilityResult<Confirmation>;

    /// Execute a validated action. This call is the commit point of a turn.
    async fn perform(&self, action: Action) -> CapabilityResult<Confirmation> {
        match action {
            Action::ApplyLeave {
                employee,
                leave_type,
                start,
                end,
            } => self.apply_leave(&employee, leave_type, start, end).await,
            Action::ScheduleReview {
                employee,
                reviewer,
                when,
            } => self.schedule_review(&employee, &reviewer, when).await,
            Action::CheckLeaveStatus { employee } => self.check_leave_status(&employee).await,
            Action::SubmitExpense {
                employee,
                category,
                amount,
            } => self.submit_expense(&employee, &category, amount).await,
            Action::CancelLeave { request_id } => self.cancel_leave(&request_id).await,
            Action::DecideLeave {
                request_id,
                decision,
            } => self.decide_leave(&request_id, decision).await,
        }
    }
}
