//! In-memory record store with sample data and JSON seed loading.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use hr_protocol::{
    Employee, EmployeeId, EmploymentStatus, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType,
    PerformanceReview, ReviewStatus,
};

use crate::error::{RecordError, RecordResult};
use crate::store::{
    BalanceUpdate, NameLookup, RecordLedger, RecordStore, name_matches, name_tokens, query_tokens,
};

/// Bootstrap data for a `MemoryRecordStore`, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub leave_balances: Vec<LeaveBalance>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    #[serde(default)]
    pub reviews: Vec<PerformanceReview>,
}

#[derive(Debug, Default)]
struct Records {
    employees: BTreeMap<EmployeeId, Employee>,
    balances: Vec<LeaveBalance>,
    /// Insertion order; the last entry per employee is the latest request.
    requests: Vec<LeaveRequest>,
    reviews: Vec<PerformanceReview>,
}

impl Records {
    fn balance_mut(&mut self, update: &BalanceUpdate) -> RecordResult<&mut LeaveBalance> {
        self.balances
            .iter_mut()
            .find(|b| b.employee_id == update.employee_id && b.leave_type == update.leave_type)
            .ok_or_else(|| {
                RecordError::NotFound(format!(
                    "{} balance for employee {}",
                    update.leave_type, update.employee_id
                ))
            })
    }
}

/// Record store held entirely in memory behind an async `RwLock`.
#[derive(Debug)]
pub struct MemoryRecordStore {
    inner: RwLock<Records>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Records::default()),
        }
    }

    /// Build a store from seed data, rejecting duplicate employee ids.
    pub fn from_seed(seed: Seed) -> RecordResult<Self> {
        let mut store = Self::new();
        for employee in seed.employees {
            store.insert_employee(employee)?;
        }
        let records = store.inner.get_mut();
        records.balances = seed.leave_balances;
        records.requests = seed.leave_requests;
        records.reviews = seed.reviews;
        Ok(store)
    }

    /// Load a JSON seed file (see `Seed`).
    pub fn from_json_file(path: impl AsRef<Path>) -> RecordResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RecordError::NotFound(path.display().to_string())
            } else {
                RecordError::Io(format!("{}: {e}", path.display()))
            }
        })?;
        let seed: Seed = serde_json::from_str(&contents)
            .map_err(|e| RecordError::Parse(format!("{}: {e}", path.display())))?;
        let store = Self::from_seed(seed)?;
        tracing::info!(
            path = %path.display(),
            employees = store.employee_count(),
            "record store seeded from file"
        );
        Ok(store)
    }

    /// Store pre-loaded with a small Indonesian office.
    pub fn with_sample_data() -> Self {
        let mut store = Self::new();
        let people = [
            (1, "Agus Hidayat", "Head of Engineering", "Engineering", None, (2018, 2, 1)),
            (2, "Budi Santoso", "Software Engineer", "Engineering", Some(1), (2021, 3, 15)),
            (3, "Rina Wijaya", "Data Analyst", "Engineering", Some(1), (2022, 7, 1)),
            (4, "Santi Putri", "HR Manager", "Human Resources", None, (2017, 9, 4)),
            (5, "Dewi Lestari", "HR Specialist", "Human Resources", Some(4), (2023, 1, 9)),
            (6, "Leo Pratama", "Sales Executive", "Sales", Some(4), (2024, 5, 20)),
        ];
        let records = store.inner.get_mut();
        for (id, name, title, department, manager, (y, m, d)) in people {
            let email = format!("{}@smarthr.co.id", name.to_lowercase().replace(' ', "."));
            let employee = Employee {
                id: EmployeeId(id),
                name: name.into(),
                email,
                title: title.into(),
                department: department.into(),
                manager_id: manager.map(EmployeeId),
                joined_on: ymd(y, m, d),
                status: EmploymentStatus::Active,
            };
            records.employees.insert(employee.id, employee);
        }

        let annual = [(1, 14), (2, 10), (3, 8), (4, 12), (5, 12), (6, 2)];
        for (id, days) in annual {
            records.balances.push(LeaveBalance {
                employee_id: EmployeeId(id),
                leave_type: LeaveType::Annual,
                remaining_days: days,
            });
            records.balances.push(LeaveBalance {
                employee_id: EmployeeId(id),
                leave_type: LeaveType::Sick,
                remaining_days: 14,
            });
        }
        records.balances.push(LeaveBalance {
            employee_id: EmployeeId(5),
            leave_type: LeaveType::Maternity,
            remaining_days: 90,
        });

        records.requests.push(LeaveRequest {
            id: "LR001".into(),
            employee_id: EmployeeId(5),
            leave_type: LeaveType::Annual,
            start: ymd(2025, 8, 11),
            end: ymd(2025, 8, 13),
            status: LeaveStatus::Approved,
        });
        records.requests.push(LeaveRequest {
            id: "LR002".into(),
            employee_id: EmployeeId(6),
            leave_type: LeaveType::Sick,
            start: ymd(2025, 9, 22),
            end: ymd(2025, 9, 23),
            status: LeaveStatus::Pending,
        });

        records.reviews.push(PerformanceReview {
            id: "REV-001".into(),
            employee_id: EmployeeId(5),
            reviewer_id: EmployeeId(4),
            date: ymd(2025, 10, 10),
            score: None,
            status: ReviewStatus::Scheduled,
        });
        store
    }

    /// Add an employee while the store is still exclusively owned.
    pub fn insert_employee(&mut self, employee: Employee) -> RecordResult<()> {
        let records = self.inner.get_mut();
        if records.employees.contains_key(&employee.id) {
            return Err(RecordError::Duplicate(format!("employee id {}", employee.id)));
        }
        records.employees.insert(employee.id, employee);
        Ok(())
    }

    /// Add a balance entry while the store is still exclusively owned.
    pub fn insert_balance(&mut self, balance: LeaveBalance) {
        self.inner.get_mut().balances.push(balance);
    }

    pub fn employee_count(&self) -> usize {
        self.inner
            .try_read()
            .map(|records| records.employees.len())
            .unwrap_or_default()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_name(&self, name: &str) -> RecordResult<NameLookup> {
        let query = query_tokens(name);
        if query.is_empty() {
            return Ok(NameLookup::NotFound);
        }
        let records = self.inner.read().await;

        let exact: Vec<Employee> = records
            .employees
            .values()
            .filter(|e| name_tokens(&e.name) == query)
            .cloned()
            .collect();
        if !exact.is_empty() {
            return Ok(NameLookup::from_candidates(exact));
        }

        let partial: Vec<Employee> = records
            .employees
            .values()
            .filter(|e| name_matches(&query, &e.name))
            .cloned()
            .collect();
        Ok(NameLookup::from_candidates(partial))
    }

    async fn employee(&self, id: EmployeeId) -> RecordResult<Option<Employee>> {
        Ok(self.inner.read().await.employees.get(&id).cloned())
    }

    async fn leave_balance(
        &self,
        id: EmployeeId,
        leave_type: LeaveType,
    ) -> RecordResult<Option<LeaveBalance>> {
        let records = self.inner.read().await;
        Ok(records
            .balances
            .iter()
            .find(|b| b.employee_id == id && b.leave_type == leave_type)
            .cloned())
    }

    async fn leave_request(&self, id: &str) -> RecordResult<Option<LeaveRequest>> {
        let records = self.inner.read().await;
        Ok(records.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn latest_leave_request(&self, id: EmployeeId) -> RecordResult<Option<LeaveRequest>> {
        let records = self.inner.read().await;
        Ok(records
            .requests
            .iter()
            .rev()
            .find(|r| r.employee_id == id)
            .cloned())
    }

    async fn reviews_involving(&self, id: EmployeeId) -> RecordResult<Vec<PerformanceReview>> {
        let records = self.inner.read().await;
        Ok(records
            .reviews
            .iter()
            .filter(|r| r.employee_id == id || r.reviewer_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordLedger for MemoryRecordStore {
    async fn commit_leave(
        &self,
        request: LeaveRequest,
        balance: BalanceUpdate,
    ) -> RecordResult<()> {
        let mut records = self.inner.write().await;
        if records.requests.iter().any(|r| r.id == request.id) {
            return Err(RecordError::Duplicate(format!("leave request {}", request.id)));
        }
        records.balance_mut(&balance)?.remaining_days = balance.remaining_days;
        records.requests.push(request);
        Ok(())
    }

    async fn update_leave_status(
        &self,
        request_id: &str,
        status: LeaveStatus,
        balance: Option<BalanceUpdate>,
    ) -> RecordResult<()> {
        let mut records = self.inner.write().await;
        let index = records
            .requests
            .iter()
            .position(|r| r.id == request_id)
            .ok_or_else(|| RecordError::NotFound(format!("leave request {request_id}")))?;
        if let Some(update) = balance {
            records.balance_mut(&update)?.remaining_days = update.remaining_days;
        }
        records.requests[index].status = status;
        Ok(())
    }

    async fn insert_review(&self, review: PerformanceReview) -> RecordResult<()> {
        let mut records = self.inner.write().await;
        if records.reviews.iter().any(|r| r.id == review.id) {
            return Err(RecordError::Duplicate(format!("review {}", review.id)));
        }
        records.reviews.push(review);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budi_hartono() -> Employee {
        Employee {
            id: EmployeeId(7),
            name: "Budi Hartono".into(),
            email: "budi.hartono@smarthr.co.id".into(),
            title: "Sales Manager".into(),
            department: "Sales".into(),
            manager_id: None,
            joined_on: ymd(2019, 4, 1),
            status: EmploymentStatus::Active,
        }
    }

    #[tokio::test]
    async fn find_by_first_name() {
        let store = MemoryRecordStore::with_sample_data();
        match store.find_by_name("rina").await.unwrap() {
            NameLookup::Found(emp) => assert_eq!(emp.name, "Rina Wijaya"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_is_case_insensitive() {
        let store = MemoryRecordStore::with_sample_data();
        let lookup = store.find_by_name("SANTI putri").await.unwrap();
        assert!(matches!(lookup, NameLookup::Found(ref e) if e.id == EmployeeId(4)));
    }

    #[tokio::test]
    async fn unknown_name_not_found() {
        let store = MemoryRecordStore::with_sample_data();
        assert_eq!(store.find_by_name("joko").await.unwrap(), NameLookup::NotFound);
        assert_eq!(store.find_by_name("   ").await.unwrap(), NameLookup::NotFound);
    }

    #[tokio::test]
    async fn shared_first_name_is_ambiguous() {
        let mut store = MemoryRecordStore::with_sample_data();
        store.insert_employee(budi_hartono()).unwrap();

        let lookup = store.find_by_name("budi").await.unwrap();
        let mut names = lookup.candidate_names();
        names.sort();
        assert_eq!(names, vec!["Budi Hartono", "Budi Santoso"]);

        // Full name disambiguates.
        let lookup = store.find_by_name("budi hartono").await.unwrap();
        assert!(matches!(lookup, NameLookup::Found(ref e) if e.id == EmployeeId(7)));
    }

    #[tokio::test]
    async fn duplicate_employee_id_rejected() {
        let mut store = MemoryRecordStore::with_sample_data();
        let mut dup = budi_hartono();
        dup.id = EmployeeId(2);
        assert!(matches!(
            store.insert_employee(dup),
            Err(RecordError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn manager_lookup() {
        let store = MemoryRecordStore::with_sample_data();
        let budi = store.employee(EmployeeId(2)).await.unwrap().unwrap();
        let manager = store.manager_of(&budi).await.unwrap().unwrap();
        assert_eq!(manager.name, "Agus Hidayat");

        let agus = store.employee(EmployeeId(1)).await.unwrap().unwrap();
        assert!(store.manager_of(&agus).await.unwrap().is_none());
    }

    fn rina_annual(remaining_days: u32) -> BalanceUpdate {
        BalanceUpdate {
            employee_id: EmployeeId(3),
            leave_type: LeaveType::Annual,
            remaining_days,
        }
    }

    fn rina_request(id: &str) -> LeaveRequest {
        LeaveRequest {
            id: id.into(),
            employee_id: EmployeeId(3),
            leave_type: LeaveType::Annual,
            start: ymd(2025, 10, 6),
            end: ymd(2025, 10, 8),
            status: LeaveStatus::Approved,
        }
    }

    async fn rina_balance(store: &MemoryRecordStore) -> u32 {
        store
            .leave_balance(EmployeeId(3), LeaveType::Annual)
            .await
            .unwrap()
            .unwrap()
            .remaining_days
    }

    #[tokio::test]
    async fn honorific_is_ignored_in_lookup() {
        let store = MemoryRecordStore::with_sample_data();
        let lookup = store.find_by_name("bu santi").await.unwrap();
        assert!(matches!(lookup, NameLookup::Found(ref e) if e.id == EmployeeId(4)));
        let lookup = store.find_by_name("Pak Budi").await.unwrap();
        assert!(matches!(lookup, NameLookup::Found(ref e) if e.id == EmployeeId(2)));
    }

    #[tokio::test]
    async fn commit_leave_writes_request_and_balance() {
        let store = MemoryRecordStore::with_sample_data();
        store
            .commit_leave(rina_request("LR900"), rina_annual(5))
            .await
            .unwrap();
        assert_eq!(rina_balance(&store).await, 5);
        let latest = store
            .latest_leave_request(EmployeeId(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, "LR900");
        assert_eq!(store.leave_request("LR900").await.unwrap(), Some(latest));
    }

    #[tokio::test]
    async fn failed_commit_changes_nothing() {
        let store = MemoryRecordStore::with_sample_data();
        let err = store
            .commit_leave(rina_request("LR001"), rina_annual(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Duplicate(_)));
        assert_eq!(rina_balance(&store).await, 8);

        let mut request = rina_request("LR901");
        request.leave_type = LeaveType::Maternity;
        let err = store
            .commit_leave(
                request,
                BalanceUpdate {
                    leave_type: LeaveType::Maternity,
                    ..rina_annual(1)
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
        assert!(store.leave_request("LR901").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_update_with_balance() {
        let store = MemoryRecordStore::with_sample_data();
        let leo_sick = BalanceUpdate {
            employee_id: EmployeeId(6),
            leave_type: LeaveType::Sick,
            remaining_days: 12,
        };
        store
            .update_leave_status("LR002", LeaveStatus::Approved, Some(leo_sick))
            .await
            .unwrap();
        let request = store.leave_request("LR002").await.unwrap().unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);
        let sick = store
            .leave_balance(EmployeeId(6), LeaveType::Sick)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sick.remaining_days, 12);
    }

    #[tokio::test]
    async fn status_update_on_missing_balance_keeps_status() {
        let store = MemoryRecordStore::with_sample_data();
        let leo_maternity = BalanceUpdate {
            employee_id: EmployeeId(6),
            leave_type: LeaveType::Maternity,
            remaining_days: 1,
        };
        let err = store
            .update_leave_status("LR002", LeaveStatus::Approved, Some(leo_maternity))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
        let request = store.leave_request("LR002").await.unwrap().unwrap();
        assert_eq!(request.status, LeaveStatus::Pending);

        let err = store
            .update_leave_status("LR404", LeaveStatus::Cancelled, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[tokio::test]
    async fn reviewer_schedule_on_date() {
        let store = MemoryRecordStore::with_sample_data();
        let on_day = store
            .reviews_by_reviewer_on(EmployeeId(4), ymd(2025, 10, 10))
            .await
            .unwrap();
        assert_eq!(on_day.len(), 1);
        let other_day = store
            .reviews_by_reviewer_on(EmployeeId(4), ymd(2025, 10, 11))
            .await
            .unwrap();
        assert!(other_day.is_empty());
    }

    #[test]
    fn seed_from_json() {
        let json = r#"{
            "employees": [
                {"id": 10, "name": "Joko Widodo", "email": "joko@example.id",
                 "title": "Intern", "department": "Ops", "joined_on": "2025-01-02"}
            ],
            "leave_balances": [
                {"employee_id": 10, "leave_type": "annual", "remaining_days": 3}
            ]
        }"#;
        let seed: Seed = serde_json::from_str(json).unwrap();
        let store = MemoryRecordStore::from_seed(seed).unwrap();
        assert_eq!(store.employee_count(), 1);
    }

    #[test]
    fn missing_seed_file_is_not_found() {
        let err = MemoryRecordStore::from_json_file("/nonexistent/seed.json").unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[test]
    fn sample_data_size() {
        assert_eq!(MemoryRecordStore::with_sample_data().employee_count(), 6);
    }
}
