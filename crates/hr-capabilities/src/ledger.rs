//! Ledger-backed capabilities: commit actions against a `RecordLedger`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use hr_protocol::{
    EmployeeId, EmployeeRef, LeaveDecision, LeaveRequest, LeaveStatus, LeaveType,
    PerformanceReview, ReviewStatus, inclusive_days,
};
use hr_records::{BalanceUpdate, RecordLedger};

use crate::capability::{CapabilitySet, Confirmation};
use crate::error::{CapabilityError, CapabilityResult};
use crate::format::{long_date, long_date_with_weekday, rupiah};

/// Capability set that reads and writes the shared record ledger.
///
/// All writes go through one async mutex, so a balance check and its debit
/// can never interleave with another turn's.
pub struct LedgerCapabilities {
    records: Arc<dyn RecordLedger>,
    write_lock: Mutex<()>,
}

impl LedgerCapabilities {
    pub fn new(records: Arc<dyn RecordLedger>) -> Self {
        Self {
            records,
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_exists(&self, employee: &EmployeeRef) -> CapabilityResult<()> {
        match self.records.employee(employee.id).await? {
            Some(_) => Ok(()),
            None => Err(CapabilityError::UnknownEmployee(employee.name.clone())),
        }
    }

    /// Look up a request whose status is one of `open`.
    async fn open_request(
        &self,
        request_id: &str,
        open: &[LeaveStatus],
    ) -> CapabilityResult<LeaveRequest> {
        let request = self
            .records
            .leave_request(request_id)
            .await?
            .ok_or_else(|| CapabilityError::UnknownLeaveRequest(request_id.to_string()))?;
        if !open.contains(&request.status) {
            return Err(CapabilityError::LeaveRequestClosed {
                request_id: request.id,
                status: request.status.label().to_string(),
            });
        }
        Ok(request)
    }

    async fn display_name(&self, id: EmployeeId) -> CapabilityResult<String> {
        Ok(self
            .records
            .employee(id)
            .await?
            .map(|e| e.name)
            .unwrap_or_else(|| format!("karyawan #{id}")))
    }
}

fn reference(prefix: &str) -> String {
    let id = Uuid::now_v7().simple().to_string();
    format!("{prefix}-{}", &id[id.len() - 8..]).to_uppercase()
}

#[async_trait]
impl CapabilitySet for LedgerCapabilities {
    async fn apply_leave(
        &self,
        employee: &EmployeeRef,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CapabilityResult<Confirmation> {
        let requested = inclusive_days(start, end);
        if requested == 0 {
            return Err(CapabilityError::InvalidRequest(
                "Tanggal selesai tidak boleh sebelum tanggal mulai.".into(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.ensure_exists(employee).await?;

        let balance = self
            .records
            .leave_balance(employee.id, leave_type)
            .await?
            .ok_or_else(|| CapabilityError::NoLeaveEntitlement {
                employee: employee.name.clone(),
                leave_type: leave_type.label().to_lowercase(),
            })?;

        if requested > balance.remaining_days {
            return Err(CapabilityError::InsufficientLeaveBalance {
                employee: employee.name.clone(),
                leave_type: leave_type.label().to_lowercase(),
                remaining: balance.remaining_days,
                requested,
            });
        }

        let remaining = balance.remaining_days - requested;
        let request = LeaveRequest {
            id: reference("LR"),
            employee_id: employee.id,
            leave_type,
            start,
            end,
            status: LeaveStatus::Approved,
        };
        let request_id = request.id.clone();
        self.records
            .commit_leave(
                request,
                BalanceUpdate {
                    employee_id: employee.id,
                    leave_type,
                    remaining_days: remaining,
                },
            )
            .await?;

        tracing::info!(
            employee_id = %employee.id,
            leave_type = %leave_type,
            days = requested,
            remaining,
            request_id = %request_id,
            "leave applied"
        );

        Ok(Confirmation::new(
            Some(request_id),
            format!(
                "✅ KONFIRMASI: Pengajuan cuti untuk {} (jenis: {}) dari tanggal {} hingga {} telah dicatat.\n💡 Sisa cuti {} sekarang: {} hari.",
                employee.name,
                leave_type,
                long_date(start),
                long_date(end),
                leave_type.label().to_lowercase(),
                remaining
            ),
        ))
    }

    async fn schedule_review(
        &self,
        employee: &EmployeeRef,
        reviewer: &EmployeeRef,
        when: NaiveDate,
    ) -> CapabilityResult<Confirmation> {
        if employee.id == reviewer.id {
            return Err(CapabilityError::InvalidRequest(
                "Karyawan tidak dapat mereview dirinya sendiri.".into(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.ensure_exists(employee).await?;
        self.ensure_exists(reviewer).await?;

        let busy = self
            .records
            .reviews_by_reviewer_on(reviewer.id, when)
            .await?
            .into_iter()
            .any(|r| r.status == ReviewStatus::Scheduled);
        if busy {
            return Err(CapabilityError::ScheduleConflict {
                reviewer: reviewer.name.clone(),
                date: long_date(when),
            });
        }

        let review = PerformanceReview {
            id: reference("REV"),
            employee_id: employee.id,
            reviewer_id: reviewer.id,
            date: when,
            score: None,
            status: ReviewStatus::Scheduled,
        };
        let review_id = review.id.clone();
        self.records.insert_review(review).await?;

        tracing::info!(
            employee_id = %employee.id,
            reviewer_id = %reviewer.id,
            date = %when,
            review_id = %review_id,
            "review scheduled"
        );

        Ok(Confirmation::new(
            Some(review_id),
            format!(
                "✅ KONFIRMASI: Sesi review performa untuk {} dengan {} telah dijadwalkan pada {}.",
                employee.name,
                reviewer.name,
                long_date_with_weekday(when)
            ),
        ))
    }

    async fn check_leave_status(&self, employee: &EmployeeRef) -> CapabilityResult<Confirmation> {
        self.ensure_exists(employee).await?;
        let latest = self.records.latest_leave_request(employee.id).await?;

        let Some(request) = latest else {
            return Ok(Confirmation::new(
                None,
                format!("ℹ️ Belum ada pengajuan cuti untuk {}.", employee.name),
            ));
        };

        Ok(Confirmation::new(
            Some(request.id.clone()),
            format!(
                "ℹ️ Status pengajuan cuti terakhir untuk {} (cuti {}, {} s.d. {}) adalah: {}.",
                employee.name,
                request.leave_type.label().to_lowercase(),
                long_date(request.start),
                long_date(request.end),
                request.status.label()
            ),
        ))
    }

    async fn submit_expense(
        &self,
        employee: &EmployeeRef,
        category: &str,
        amount: u64,
    ) -> CapabilityResult<Confirmation> {
        if amount == 0 {
            return Err(CapabilityError::InvalidRequest(
                "Nominal pengeluaran harus lebih dari nol.".into(),
            ));
        }
        self.ensure_exists(employee).await?;

        let expense_id = reference("EXP");
        tracing::info!(
            employee_id = %employee.id,
            category,
            amount,
            expense_id = %expense_id,
            "expense submitted"
        );

        Ok(Confirmation::new(
            Some(expense_id),
            format!(
                "✅ KONFIRMASI: Laporan pengeluaran untuk {} sebesar {} (kategori: {}) telah diajukan untuk diproses.",
                employee.name,
                rupiah(amount),
                category
            ),
        ))
    }

    async fn cancel_leave(&self, request_id: &str) -> CapabilityResult<Confirmation> {
        let _guard = self.write_lock.lock().await;
        let request = self
            .open_request(request_id, &[LeaveStatus::Pending, LeaveStatus::Approved])
            .await?;
        let name = self.display_name(request.employee_id).await?;

        // Only approved requests were debited.
        let refund = match request.status {
            LeaveStatus::Approved => {
                let balance = self
                    .records
                    .leave_balance(request.employee_id, request.leave_type)
                    .await?
                    .ok_or_else(|| CapabilityError::NoLeaveEntitlement {
                        employee: name.clone(),
                        leave_type: request.leave_type.label().to_lowercase(),
                    })?;
                Some(BalanceUpdate {
                    employee_id: request.employee_id,
                    leave_type: request.leave_type,
                    remaining_days: balance.remaining_days + request.days(),
                })
            }
            _ => None,
        };
        self.records
            .update_leave_status(&request.id, LeaveStatus::Cancelled, refund)
            .await?;

        tracing::info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            refunded_days = refund.map_or(0, |_| request.days()),
            "leave cancelled"
        );

        let mut message = format!(
            "✅ KONFIRMASI: Pengajuan cuti {} untuk {} ({} s.d. {}) telah dibatalkan.",
            request.id,
            name,
            long_date(request.start),
            long_date(request.end)
        );
        if let Some(update) = refund {
            message.push_str(&format!(
                "\n💡 {} hari dikembalikan. Sisa cuti {} sekarang: {} hari.",
                request.days(),
                request.leave_type.label().to_lowercase(),
                update.remaining_days
            ));
        }
        Ok(Confirmation::new(Some(request.id), message))
    }

    async fn decide_leave(
        &self,
        request_id: &str,
        decision: LeaveDecision,
    ) -> CapabilityResult<Confirmation> {
        let _guard = self.write_lock.lock().await;
        let request = self.open_request(request_id, &[LeaveStatus::Pending]).await?;
        let name = self.display_name(request.employee_id).await?;
        let leave_label = request.leave_type.label().to_lowercase();

        let debit = match decision {
            LeaveDecision::Approve => {
                let balance = self
                    .records
                    .leave_balance(request.employee_id, request.leave_type)
                    .await?
                    .ok_or_else(|| CapabilityError::NoLeaveEntitlement {
                        employee: name.clone(),
                        leave_type: leave_label.clone(),
                    })?;
                let requested = request.days();
                if requested > balance.remaining_days {
                    return Err(CapabilityError::InsufficientLeaveBalance {
                        employee: name,
                        leave_type: leave_label,
                        remaining: balance.remaining_days,
                        requested,
                    });
                }
                Some(BalanceUpdate {
                    employee_id: request.employee_id,
                    leave_type: request.leave_type,
                    remaining_days: balance.remaining_days - requested,
                })
            }
            LeaveDecision::Reject => None,
        };
        let status = decision.status();
        self.records
            .update_leave_status(&request.id, status, debit)
            .await?;

        tracing::info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            decision = ?decision,
            "leave request decided"
        );

        let mut message = format!(
            "✅ KONFIRMASI: Pengajuan cuti {} untuk {} ({} s.d. {}) telah {}.",
            request.id,
            name,
            long_date(request.start),
            long_date(request.end),
            status.label().to_lowercase()
        );
        if let Some(update) = debit {
            message.push_str(&format!(
                "\n💡 Sisa cuti {leave_label} sekarang: {} hari.",
                update.remaining_days
            ));
        }
        Ok(Confirmation::new(Some(request.id), message))
    }
}
