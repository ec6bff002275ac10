//! Shared test harness for E2E integration tests.
//!
//! Wires a real `Dispatcher` over the in-memory record store and the
//! ledger-backed capability set, with a scripted or HTTP-backed model.
//! Every turn runs at a fixed reference time.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use hr_agent::dispatcher::Dispatcher;
use hr_agent::extractor::ActionExtractor;
use hr_agent::gateway::{LanguageModel, ScriptedModel};
use hr_agent::router::QueryRouter;
use hr_capabilities::LedgerCapabilities;
use hr_protocol::{Employee, EmployeeId, EmploymentStatus, LeaveType};
use hr_records::{MemoryRecordStore, NameLookup, RecordStore};

/// Wednesday 2025-10-01, 09:00.
pub fn now() -> NaiveDateTime {
    date(2025, 10, 1).and_hms_opt(9, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A second "Budi" so that the bare first name is ambiguous.
pub fn budi_hartono() -> Employee {
    Employee {
        id: EmployeeId(7),
        name: "Budi Hartono".into(),
        email: "budi.hartono@smarthr.co.id".into(),
        title: "QA Engineer".into(),
        department: "Engineering".into(),
        manager_id: Some(EmployeeId(1)),
        joined_on: date(2024, 2, 1),
        status: EmploymentStatus::Active,
    }
}

/// End-to-end harness: dispatcher + ledger + record store + model.
pub struct TestHarness {
    pub dispatcher: Dispatcher,
    pub store: Arc<MemoryRecordStore>,
    /// Present when the harness was built with a scripted model.
    pub model: Option<Arc<ScriptedModel>>,
}

impl TestHarness {
    /// Sample office with a scripted model.
    pub fn with_sample_data() -> Self {
        Self::scripted(MemoryRecordStore::with_sample_data(), false)
    }

    /// Sample office plus Budi Hartono.
    pub fn with_two_budis() -> Self {
        let mut store = MemoryRecordStore::with_sample_data();
        store.insert_employee(budi_hartono()).unwrap();
        Self::scripted(store, false)
    }

    /// Sample office with re-prompting on malformed responses.
    pub fn with_reprompt() -> Self {
        Self::scripted(MemoryRecordStore::with_sample_data(), true)
    }

    /// Sample office with any model backend (e.g. an `OllamaClient`).
    pub fn with_model(model: Arc<dyn LanguageModel>) -> Self {
        Self::build(MemoryRecordStore::with_sample_data(), model, None, false)
    }

    fn scripted(store: MemoryRecordStore, reprompt: bool) -> Self {
        let model = Arc::new(ScriptedModel::new());
        Self::build(store, model.clone(), Some(model), reprompt)
    }

    fn build(
        store: MemoryRecordStore,
        model: Arc<dyn LanguageModel>,
        scripted: Option<Arc<ScriptedModel>>,
        reprompt: bool,
    ) -> Self {
        let store = Arc::new(store);
        let capabilities = Arc::new(LedgerCapabilities::new(store.clone()));
        let extractor = ActionExtractor::new(model, store.clone()).with_reprompt(reprompt);
        let dispatcher =
            Dispatcher::from_parts(QueryRouter::new(store.clone()), extractor, capabilities);
        Self {
            dispatcher,
            store,
            model: scripted,
        }
    }

    /// The scripted model. Panics for HTTP-backed harnesses.
    pub fn script(&self) -> &ScriptedModel {
        self.model.as_deref().expect("harness has no scripted model")
    }

    /// Queue the model's next response.
    pub fn model_says(&self, json: &str) {
        self.script().push_response(json);
    }

    /// Run one turn at the fixed reference time.
    pub async fn say(&self, text: &str) -> Option<String> {
        self.dispatcher.handle(text, now()).await
    }

    /// Run one turn that must produce a reply.
    pub async fn reply(&self, text: &str) -> String {
        self.say(text)
            .await
            .unwrap_or_else(|| panic!("no reply for {text:?}"))
    }

    /// Current balance for a uniquely named employee.
    pub async fn balance(&self, name: &str, leave_type: LeaveType) -> Option<u32> {
        let NameLookup::Found(employee) = self.store.find_by_name(name).await.unwrap() else {
            panic!("'{name}' does not resolve to one employee");
        };
        self.store
            .leave_balance(employee.id, leave_type)
            .await
            .unwrap()
            .map(|b| b.remaining_days)
    }

    pub fn model_calls(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.call_count())
    }
}
