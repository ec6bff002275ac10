//! Mock capability set for testing.
//!
//! Records every action it is asked to perform and can be scripted to fail
//! the next call with a given domain error.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use hr_protocol::{Action, EmployeeRef, LeaveDecision, LeaveType};

use crate::capability::{CapabilitySet, Confirmation};
use crate::error::{CapabilityError, CapabilityResult};

/// Capability set that performs nothing and remembers what it was asked.
pub struct MockCapabilities {
    /// Actions in the order they were received.
    performed: Mutex<Vec<Action>>,
    /// Failure returned by the next call, if scripted.
    next_failure: Mutex<Option<CapabilityError>>,
}

impl MockCapabilities {
    pub fn new() -> Self {
        Self {
            performed: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
        }
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: CapabilityError) {
        *self.next_failure.lock().unwrap() = Some(error);
    }

    /// Copies of all actions received so far.
    pub fn performed(&self) -> Vec<Action> {
        self.performed.lock().unwrap().clone()
    }

    pub fn last_performed(&self) -> Option<Action> {
        self.performed.lock().unwrap().last().cloned()
    }

    fn record(&self, action: Action) -> CapabilityResult<Confirmation> {
        let kind = action.kind();
        let subject = action.subject().to_string();
        self.performed.lock().unwrap().push(action);
        if let Some(error) = self.next_failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(Confirmation::new(
            Some(format!("MOCK-{}", self.performed.lock().unwrap().len())),
            format!("mock {kind} for {subject}"),
        ))
    }
}

impl Default for MockCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilitySet for MockCapabilities {
    async fn apply_leave(
        &self,
        employee: &EmployeeRef,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CapabilityResult<Confirmation> {
        self.record(Action::ApplyLeave {
            employee: employee.clone(),
            leave_type,
            start,
            end,
        })
    }

    async fn schedule_review(
        &self,
        employee: &EmployeeRef,
        reviewer: &EmployeeRef,
        when: NaiveDate,
    ) -> CapabilityResult<Confirmation> {
        self.record(Action::ScheduleReview {
            employee: employee.clone(),
            reviewer: reviewer.clone(),
            when,
        })
    }

    async fn check_leave_status(&self, employee: &EmployeeRef) -> CapabilityResult<Confirmation> {
        self.record(Action::CheckLeaveStatus {
            employee: employee.clone(),
        })
    }

    async fn submit_expense(
        &self,
        employee: &EmployeeRef,
        category: &str,
        amount: u64,
    ) -> CapabilityResult<Confirmation> {
        self.record(Action::SubmitExpense {
            employee: employee.clone(),
            category: category.to_string(),
            amount,
        })
    }

    async fn cancel_leave(&self, request_id: &str) -> CapabilityResult<Confirmation> {
        self.record(Action::CancelLeave {
            request_id: request_id.to_string(),
        })
    }

    async fn decide_leave(
        &self,
        request_id: &str,
        decision: LeaveDecision,
    ) -> CapabilityResult<Confirmation> {
        self.record(Action::DecideLeave {
            request_id: request_id.to_string(),
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_protocol::EmployeeId;

    fn leo() -> EmployeeRef {
        EmployeeRef {
            id: EmployeeId(6),
            name: "Leo Pratama".into(),
        }
    }

    #[tokio::test]
    async fn records_performed_actions() {
        let mock = MockCapabilities::new();
        let confirmation = mock
            .perform(Action::CheckLeaveStatus { employee: leo() })
            .await
            .unwrap();
        assert_eq!(confirmation.message, "mock check_status for Leo Pratama");
        assert_eq!(mock.performed().len(), 1);
    }

    #[tokio::test]
    async fn request_actions_are_recorded_by_id() {
        let mock = MockCapabilities::new();
        let confirmation = mock.cancel_leave("LR002").await.unwrap();
        assert_eq!(confirmation.message, "mock cancel_leave for LR002");
        assert_eq!(
            mock.last_performed(),
            Some(Action::CancelLeave {
                request_id: "LR002".into()
            })
        );
    }

    #[tokio::test]
    async fn scripted_failure_applies_once() {
        let mock = MockCapabilities::new();
        mock.fail_next(CapabilityError::UnknownEmployee("Leo Pratama".into()));

        let first = mock.check_leave_status(&leo()).await;
        assert!(matches!(first, Err(CapabilityError::UnknownEmployee(_))));

        let second = mock.check_leave_status(&leo()).await;
        assert!(second.is_ok());
        assert_eq!(mock.performed().len(), 2);
    }
}
