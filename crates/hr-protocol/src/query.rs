use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::employee::LeaveType;

/// Which lookup a question maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    ManagerOf,
    LeaveBalanceOf,
    TitleOf,
    EmailOf,
    LeaveStatusOf,
}

/// A question resolved to one of the supported lookup templates.
///
/// Every variant carries the employee name as typed by the user; resolving
/// it against the record store happens later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryTemplate {
    ManagerOf { subject: String },
    LeaveBalanceOf { subject: String, leave_type: LeaveType },
    TitleOf { subject: String },
    EmailOf { subject: String },
    LeaveStatusOf { subject: String },
}

impl QueryTemplate {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryTemplate::ManagerOf { .. } => QueryKind::ManagerOf,
            QueryTemplate::LeaveBalanceOf { .. } => QueryKind::LeaveBalanceOf,
            QueryTemplate::TitleOf { .. } => QueryKind::TitleOf,
            QueryTemplate::EmailOf { .. } => QueryKind::EmailOf,
            QueryTemplate::LeaveStatusOf { .. } => QueryKind::LeaveStatusOf,
        }
    }

    /// The employee name the question is about.
    pub fn subject(&self) -> &str {
        match self {
            QueryTemplate::ManagerOf { subject }
            | QueryTemplate::LeaveBalanceOf { subject, .. }
            | QueryTemplate::TitleOf { subject }
            | QueryTemplate::EmailOf { subject }
            | QueryTemplate::LeaveStatusOf { subject } => subject,
        }
    }
}

/// Why a question could not be mapped to a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RoutingFailure {
    #[error("no query template matches the question")]
    UnrecognizedQueryShape,

    #[error("query template {0:?} matched but no employee name remains")]
    MissingSubject(QueryKind),
}
