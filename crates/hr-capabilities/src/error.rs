//! Capability error types.
//!
//! Messages are shown to the end user verbatim, so they are written in
//! Indonesian like the rest of the conversation.

use hr_records::RecordError;
use thiserror::Error;

/// Domain failures reported by capability operations.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error(
        "❌ Saldo cuti {leave_type} {employee} tidak cukup. Tersisa {remaining} hari, diminta {requested} hari."
    )]
    InsufficientLeaveBalance {
        employee: String,
        leave_type: String,
        remaining: u32,
        requested: u32,
    },

    #[error("❌ {employee} tidak memiliki jatah cuti {leave_type}.")]
    NoLeaveEntitlement {
        employee: String,
        leave_type: String,
    },

    #[error("❌ {reviewer} sudah memiliki jadwal review pada {date}.")]
    ScheduleConflict { reviewer: String, date: String },

    #[error("❌ Karyawan {0} tidak ditemukan.")]
    UnknownEmployee(String),

    #[error("❌ Pengajuan cuti dengan ID {0} tidak ditemukan.")]
    UnknownLeaveRequest(String),

    #[error("❌ Pengajuan cuti {request_id} sudah berstatus {status}.")]
    LeaveRequestClosed { request_id: String, status: String },

    #[error("❌ {0}")]
    InvalidRequest(String),

    #[error("❌ Gagal mengakses data HR: {0}")]
    Record(#[from] RecordError),
}

/// Convenience alias for capability results.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
