//! Shared test harness for record service backends
//!
//! Provides measurement fixtures and the `record_service_tests!` contract
//! suite run against every `RecordService<Measurement>` implementation.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod service_harness;
//! use service_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod record_service_tests;

use desk::core::error::{DeskError, StorageError};
use desk::prelude::*;

/// A measurement appointment with one measured area
pub fn sample_measurement(name: &str, date: Option<&str>) -> Measurement {
    let mut m = Measurement::new(name, "9876543210", "12 MG Road");
    m.measurement_date = date.map(str::to_string);
    m.status = Some(MeasurementStatus::Created);
    m.areas = vec![Area {
        area_name: "Living room".to_string(),
        height: Some(2.4),
        width: Some(3.5),
        notes: "Two windows".to_string(),
        photo_urls: vec!["/uploads/living.jpg".to_string()],
    }];
    m
}

/// `n` appointments named `Customer 0..n`, one day apart
pub fn sample_batch(n: usize) -> Vec<Measurement> {
    (0..n)
        .map(|i| {
            let date = format!("2024-01-{:02}", i + 1);
            sample_measurement(&format!("Customer {}", i), Some(&date))
        })
        .collect()
}

/// Assert that `err` is a not-found storage error
pub fn assert_not_found(err: &DeskError) {
    match err {
        DeskError::Storage(StorageError::NotFound { kind, .. }) => {
            assert_eq!(kind, "measurement")
        }
        other => panic!("Expected StorageError::NotFound, got {:?}", other),
    }
}
