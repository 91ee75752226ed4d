//! Macro-generated contract suite for `RecordService<Measurement>`
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_assigns_id`: create returns the entity with a fresh id
//! - `test_get_nonexistent`: unknown id is `StorageError::NotFound`
//! - `test_list_empty`: an empty store lists nothing
//! - `test_list_keeps_insertion_order`: list returns entities as created
//! - `test_update_existing`: changes are persisted under the same id
//! - `test_update_nonexistent`: unknown id is `StorageError::NotFound`
//! - `test_delete_existing`: deleted entities are gone
//! - `test_delete_nonexistent`: unknown id is `StorageError::NotFound`
//!
//! ## Listing
//! - `test_list_feeds_query_engine`: listed entities filter and sort as records
//!
//! ## Edge Cases
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate the `RecordService<Measurement>` conformance suite
///
/// `$factory` is evaluated inside each async test, so it may `.await`.
/// The service must be `Clone + 'static` for the concurrent access test.
#[macro_export]
macro_rules! record_service_tests {
    ($factory:expr) => {
        mod record_service_contract_tests {
            use super::*;
            use desk::prelude::*;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_assigns_id() {
                let service = $factory;
                let entity = sample_measurement("Raj Kumar", Some("2024-03-10"));

                let created = service.create(entity).await.unwrap();
                let id = created.id().cloned().expect("created entity has an id");
                assert_eq!(created.customer_name, "Raj Kumar");
                assert_eq!(created.areas.len(), 1);

                let fetched = service.get(&id).await.unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                let err = service.get(&RecordId::generate()).await.unwrap_err();
                assert_not_found(&err);
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_keeps_insertion_order() {
                let service = $factory;
                for m in sample_batch(5) {
                    service.create(m).await.unwrap();
                }

                let names: Vec<String> = service
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|m| m.customer_name)
                    .collect();
                assert_eq!(
                    names,
                    vec!["Customer 0", "Customer 1", "Customer 2", "Customer 3", "Customer 4"]
                );
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let created = service
                    .create(sample_measurement("Before", None))
                    .await
                    .unwrap();
                let id = created.id().cloned().unwrap();

                let mut changed = created.clone();
                changed.customer_name = "After".to_string();
                changed.status = Some(MeasurementStatus::Assigned);
                let updated = service.update(&id, changed).await.unwrap();
                assert_eq!(updated.id(), Some(&id));

                let fetched = service.get(&id).await.unwrap();
                assert_eq!(fetched.customer_name, "After");
                assert_eq!(fetched.status(), MeasurementStatus::Assigned);
                assert_eq!(service.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let err = service
                    .update(&RecordId::generate(), sample_measurement("Ghost", None))
                    .await
                    .unwrap_err();
                assert_not_found(&err);
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let created = service
                    .create(sample_measurement("Doomed", None))
                    .await
                    .unwrap();
                let id = created.id().cloned().unwrap();

                service.delete(&id).await.unwrap();
                assert_not_found(&service.get(&id).await.unwrap_err());
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                let err = service.delete(&RecordId::generate()).await.unwrap_err();
                assert_not_found(&err);
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_list_feeds_query_engine() {
                let service = $factory;
                for m in sample_batch(4) {
                    service.create(m).await.unwrap();
                }
                service
                    .create(sample_measurement("Undated", None))
                    .await
                    .unwrap();

                let records = to_records(&service.list().await.unwrap()).unwrap();
                let engine = QueryEngine::new(RecordSchema::measurement());
                let criteria = FilterCriteria::new("measurement_date")
                    .sorted_by("measurement_date", SortDirection::Desc)
                    .with_date_range(
                        NaiveDate::from_ymd_opt(2024, 1, 2),
                        NaiveDate::from_ymd_opt(2024, 1, 3),
                    );

                let rows = engine.apply(&records, &criteria);
                let names: Vec<&str> = rows
                    .iter()
                    .map(|r| r.get_str("customer_name").unwrap_or("-"))
                    .collect();
                assert_eq!(names, vec!["Customer 2", "Customer 1"]);
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_access() {
                let service = $factory;
                let s1 = service.clone();
                let s2 = service.clone();

                let h1 = tokio::spawn(async move { s1.create(sample_measurement("A", None)).await });
                let h2 = tokio::spawn(async move { s2.create(sample_measurement("B", None)).await });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s");

                let id1 = r1.unwrap().id().cloned().unwrap();
                let id2 = r2.unwrap().id().cloned().unwrap();
                assert_ne!(id1, id2);

                let ids: Vec<RecordId> = service
                    .list()
                    .await
                    .unwrap()
                    .iter()
                    .filter_map(|m| m.id().cloned())
                    .collect();
                assert_eq!(ids.len(), 2);
                assert!(ids.contains(&id1));
                assert!(ids.contains(&id2));
            }
        }
    };
}
