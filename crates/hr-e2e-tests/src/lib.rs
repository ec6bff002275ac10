//! End-to-end tests for the HR agent live under `tests/`.
