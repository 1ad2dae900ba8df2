//! End-to-end seeding runs over in-memory SQLite and a static catalog.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;

use agro_provision::models::ProducerKind;
use agro_provision::seed::fake::{is_valid_cnpj, is_valid_cpf};
use agro_provision::seed::{SeedError, SeedProfile, SeedRun, SeedStage, StageOutcome};
use agro_provision::store::{EntityKind, SeedStore};

use helpers::{
    counts, memory_db, migrated_db, orchestrator, seed_config, FailingStore, MemoryStore,
    StaticCatalog,
};

const PROFILE: SeedProfile = SeedProfile {
    producers: 50,
    farms: 25,
    harvest_years: 2,
};

fn full_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_region("MT", 30)
        .with_region("GO", 20)
        .with_region("PR", 10)
}

fn completed(run: SeedRun) -> agro_provision::seed::SeedReport {
    match run {
        SeedRun::Completed(report) => report,
        other => panic!("expected a completed run, got {other:?}"),
    }
}

#[tokio::test]
async fn seeds_profile_counts_and_rerun_changes_nothing() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());

    let report = completed(
        orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), 1)
            .run()
            .await
            .unwrap(),
    );

    assert_eq!(report.cities, StageOutcome::Seeded { created: 60 });
    assert_eq!(report.producers, StageOutcome::Seeded { created: 50 });
    assert_eq!(report.farms, StageOutcome::Seeded { created: 25 });
    assert_eq!(report.harvests, StageOutcome::Seeded { created: 2 });
    assert!(report.failed_regions.is_empty());
    assert!((25..=50).contains(&report.farm_harvests));
    assert!(report.farm_harvest_crops >= report.farm_harvests);

    let before = counts(store.as_ref()).await;
    assert_eq!(before[&EntityKind::FarmHarvest], report.farm_harvests);
    assert_eq!(before[&EntityKind::FarmHarvestCrop], report.farm_harvest_crops);

    let rerun = completed(
        orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), 2)
            .run()
            .await
            .unwrap(),
    );

    assert_eq!(rerun.cities, StageOutcome::Skipped { existing: 60 });
    assert_eq!(rerun.producers, StageOutcome::Skipped { existing: 50 });
    assert_eq!(rerun.farms, StageOutcome::Skipped { existing: 25 });
    assert_eq!(rerun.harvests, StageOutcome::Skipped { existing: 2 });
    assert_eq!(rerun.total_created(), 0);
    assert_eq!(counts(store.as_ref()).await, before);
}

#[tokio::test]
async fn failing_region_is_skipped_and_the_rest_are_seeded() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let catalog = Arc::new(
        StaticCatalog::new()
            .with_region("MT", 10)
            .failing("GO")
            .with_region("PR", 5),
    );

    let report = completed(
        orchestrator(store.clone(), catalog.clone(), seed_config(PROFILE), 3)
            .run()
            .await
            .unwrap(),
    );

    assert_eq!(catalog.calls(), vec!["MT", "GO", "PR"]);
    assert_eq!(report.failed_regions, vec!["GO".to_string()]);
    assert_eq!(report.cities, StageOutcome::Seeded { created: 15 });
    assert_eq!(report.farms, StageOutcome::Seeded { created: 25 });

    let farms = store.list_farms().await.unwrap();
    assert_eq!(farms.len(), 25);
    assert!(farms.iter().all(|farm| farm.state != "GO"));
}

#[tokio::test]
async fn farms_fall_back_to_stocked_regions() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let catalog = Arc::new(StaticCatalog::new().with_region("PR", 3));

    completed(
        orchestrator(store.clone(), catalog, seed_config(PROFILE), 4)
            .run()
            .await
            .unwrap(),
    );

    let farms = store.list_farms().await.unwrap();
    assert_eq!(farms.len(), 25);
    assert!(farms.iter().all(|farm| farm.state == "PR"));

    let pool: HashSet<_> = store
        .find_cities_by_state("PR", 100)
        .await
        .unwrap()
        .into_iter()
        .map(|city| city.id)
        .collect();
    assert!(farms.iter().all(|farm| pool.contains(&farm.city_id)));
}

#[tokio::test]
async fn farms_use_only_the_first_hundred_municipalities_by_name() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let catalog = Arc::new(StaticCatalog::new().with_region("MT", 150));
    let profile = SeedProfile {
        producers: 10,
        farms: 60,
        harvest_years: 1,
    };

    completed(
        orchestrator(store.clone(), catalog, seed_config(profile), 15)
            .run()
            .await
            .unwrap(),
    );
    assert_eq!(store.count(EntityKind::City).await.unwrap(), 150);

    let pool = store.find_cities_by_state("MT", 100).await.unwrap();
    assert_eq!(pool.len(), 100);
    assert_eq!(pool[99].name, "Município MT 099");
    let pool: HashSet<_> = pool.into_iter().map(|city| city.id).collect();

    let farms = store.list_farms().await.unwrap();
    assert_eq!(farms.len(), 60);
    assert!(farms.iter().all(|farm| pool.contains(&farm.city_id)));
}

#[tokio::test(start_paused = true)]
async fn waits_between_region_fetches() {
    let delay = Duration::from_millis(250);
    let catalog = Arc::new(full_catalog());
    let mut config = seed_config(SeedProfile {
        producers: 0,
        farms: 0,
        harvest_years: 0,
    });
    config.region_delay = delay;

    let start = Instant::now();
    let report = completed(
        orchestrator(Arc::new(MemoryStore::default()), catalog.clone(), config, 14)
            .run()
            .await
            .unwrap(),
    );

    // three regions, so two pauses and none after the last fetch
    assert_eq!(start.elapsed(), delay * 2);
    assert_eq!(report.cities, StageOutcome::Seeded { created: 60 });

    let fetched = catalog.fetched_at();
    assert_eq!(fetched.len(), 3);
    assert_eq!(fetched[0], start);
    for pair in fetched.windows(2) {
        assert_eq!(pair[1] - pair[0], delay);
    }
}

#[tokio::test]
async fn no_municipalities_anywhere_is_an_error() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let catalog = Arc::new(StaticCatalog::new().failing("MT").failing("GO").failing("PR"));

    let err = orchestrator(store.clone(), catalog, seed_config(PROFILE), 5)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::NoMunicipalities));
    assert_eq!(store.count(EntityKind::Farm).await.unwrap(), 0);
}

#[tokio::test]
async fn farms_without_producers_are_a_missing_dependency() {
    let db = migrated_db().await;
    let profile = SeedProfile {
        producers: 0,
        farms: 5,
        harvest_years: 1,
    };

    let err = orchestrator(
        Arc::new(db.seed_store()),
        Arc::new(full_catalog()),
        seed_config(profile),
        6,
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        SeedError::MissingDependency {
            stage: SeedStage::Farms,
            dependency: EntityKind::Producer
        }
    ));
}

#[tokio::test]
async fn disabled_run_touches_nothing() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let catalog = Arc::new(full_catalog());
    let mut config = seed_config(PROFILE);
    config.enabled = false;

    let run = orchestrator(store.clone(), catalog.clone(), config, 7)
        .run()
        .await
        .unwrap();

    assert_eq!(run, SeedRun::Disabled);
    assert!(catalog.calls().is_empty());
    assert!(counts(store.as_ref()).await.values().all(|n| *n == 0));
}

#[tokio::test]
async fn unmigrated_store_is_not_ready() {
    let db = memory_db().await;
    let catalog = Arc::new(full_catalog());

    let run = orchestrator(
        Arc::new(db.seed_store()),
        catalog.clone(),
        seed_config(PROFILE),
        8,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(run, SeedRun::StoreNotReady);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn farm_persistence_failure_aborts_the_run() {
    let db = migrated_db().await;
    let store = Arc::new(FailingStore::new(db.seed_store(), EntityKind::Farm));

    let err = orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), 9)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Store(_)));
    assert_eq!(store.count(EntityKind::Producer).await.unwrap(), 50);
    assert_eq!(store.count(EntityKind::Harvest).await.unwrap(), 0);
}

#[tokio::test]
async fn city_persistence_failure_is_recoverable() {
    let db = migrated_db().await;
    let store = Arc::new(FailingStore::new(db.seed_store(), EntityKind::City));

    let err = orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), 10)
        .run()
        .await
        .unwrap_err();

    // every region failed to store, so farms have nowhere to go
    assert!(matches!(err, SeedError::NoMunicipalities));
    assert_eq!(store.count(EntityKind::Producer).await.unwrap(), 50);
}

#[tokio::test]
async fn stored_farms_keep_the_area_invariant() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let profile = SeedProfile {
        producers: 20,
        farms: 200,
        harvest_years: 1,
    };

    completed(
        orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(profile), 11)
            .run()
            .await
            .unwrap(),
    );

    let farms = store.list_farms().await.unwrap();
    assert_eq!(farms.len(), 200);
    for farm in &farms {
        assert!(farm.areas_consistent(), "{farm:?}");
        assert!(farm.total_area >= Decimal::new(1000, 2));
        assert!(farm.total_area <= Decimal::new(500000, 2));
        assert!(farm.arable_area.scale() <= 2 && farm.vegetation_area.scale() <= 2);
    }
}

#[tokio::test]
async fn producer_documents_are_valid_and_unique() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());

    completed(
        orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), 12)
            .run()
            .await
            .unwrap(),
    );

    let producers = store.list_producers().await.unwrap();
    let documents: HashSet<_> = producers.iter().map(|p| p.document.clone()).collect();
    assert_eq!(documents.len(), producers.len());

    for producer in &producers {
        assert_eq!(producer.document.len(), producer.kind.document_len());
        let valid = match producer.kind {
            ProducerKind::Individual => is_valid_cpf(&producer.document),
            ProducerKind::Company => is_valid_cnpj(&producer.document),
        };
        assert!(valid, "{producer:?}");
    }
    assert!(producers.iter().any(|p| p.kind == ProducerKind::Company));
    assert!(producers.iter().any(|p| p.kind == ProducerKind::Individual));
}

#[tokio::test]
async fn harvest_window_ends_at_reference_year() {
    let db = migrated_db().await;
    let store = Arc::new(db.seed_store());
    let profile = SeedProfile {
        producers: 5,
        farms: 5,
        harvest_years: 3,
    };

    completed(
        orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(profile), 13)
            .run()
            .await
            .unwrap(),
    );

    let harvests = store.list_harvests().await.unwrap();
    let years: Vec<i32> = harvests.iter().map(|h| h.year).collect();
    assert_eq!(years, vec![2022, 2023, 2024]);
    assert_eq!(harvests[0].description, "Safra 2022");
}

#[tokio::test]
async fn same_seed_reproduces_the_dataset() {
    type FarmRow = (String, String, Decimal, Decimal, Decimal);

    async fn dataset(seed: u64) -> (Vec<(String, String)>, Vec<FarmRow>) {
        let db = migrated_db().await;
        let store = Arc::new(db.seed_store());
        completed(
            orchestrator(store.clone(), Arc::new(full_catalog()), seed_config(PROFILE), seed)
                .run()
                .await
                .unwrap(),
        );

        let producers = store
            .list_producers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.document))
            .collect();
        let farms = store
            .list_farms()
            .await
            .unwrap()
            .into_iter()
            .map(|f| (f.name, f.state, f.total_area, f.arable_area, f.vegetation_area))
            .collect();
        (producers, farms)
    }

    let first = dataset(42).await;
    let second = dataset(42).await;
    let other = dataset(43).await;

    assert_eq!(first, second);
    assert_ne!(first, other);
}
