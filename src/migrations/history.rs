//! Schema history for the producer registry (SQLite dialect).
//!
//! Append new changes at the end with a later timestamp prefix. Never edit a
//! change that has shipped.

use super::{SchemaChange, SchemaObject};

pub const SCHEMA_HISTORY: &[SchemaChange] = &[
    SchemaChange {
        name: "20240115090000_create_producers",
        tables: &[SchemaObject {
            name: "producers",
            create: r#"
                CREATE TABLE producers (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    document TEXT NOT NULL,
                    kind TEXT NOT NULL CHECK (kind IN ('individual', 'company')),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )"#,
            drop: "DROP TABLE producers",
        }],
        indexes: &[SchemaObject {
            name: "idx_producers_document",
            create: "CREATE UNIQUE INDEX idx_producers_document ON producers (document)",
            drop: "DROP INDEX idx_producers_document",
        }],
    },
    SchemaChange {
        name: "20240115090100_create_cities",
        tables: &[SchemaObject {
            name: "cities",
            create: r#"
                CREATE TABLE cities (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    state TEXT NOT NULL,
                    external_code TEXT NOT NULL,
                    created_at TEXT NOT NULL
                )"#,
            drop: "DROP TABLE cities",
        }],
        indexes: &[
            SchemaObject {
                name: "idx_cities_external_code",
                create: "CREATE UNIQUE INDEX idx_cities_external_code ON cities (external_code)",
                drop: "DROP INDEX idx_cities_external_code",
            },
            SchemaObject {
                name: "idx_cities_state",
                create: "CREATE INDEX idx_cities_state ON cities (state, name)",
                drop: "DROP INDEX idx_cities_state",
            },
        ],
    },
    SchemaChange {
        name: "20240115090200_create_farms",
        tables: &[SchemaObject {
            name: "farms",
            create: r#"
                CREATE TABLE farms (
                    id TEXT PRIMARY KEY NOT NULL,
                    producer_id TEXT NOT NULL REFERENCES producers (id) ON DELETE CASCADE,
                    city_id TEXT NOT NULL REFERENCES cities (id),
                    name TEXT NOT NULL,
                    state TEXT NOT NULL,
                    total_area TEXT NOT NULL,
                    arable_area TEXT NOT NULL,
                    vegetation_area TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )"#,
            drop: "DROP TABLE farms",
        }],
        indexes: &[
            SchemaObject {
                name: "idx_farms_producer_id",
                create: "CREATE INDEX idx_farms_producer_id ON farms (producer_id)",
                drop: "DROP INDEX idx_farms_producer_id",
            },
            SchemaObject {
                name: "idx_farms_city_id",
                create: "CREATE INDEX idx_farms_city_id ON farms (city_id)",
                drop: "DROP INDEX idx_farms_city_id",
            },
            SchemaObject {
                name: "idx_farms_state",
                create: "CREATE INDEX idx_farms_state ON farms (state)",
                drop: "DROP INDEX idx_farms_state",
            },
        ],
    },
    SchemaChange {
        name: "20240115090300_create_harvests",
        tables: &[
            SchemaObject {
                name: "harvests",
                create: r#"
                    CREATE TABLE harvests (
                        id TEXT PRIMARY KEY NOT NULL,
                        year INTEGER NOT NULL,
                        description TEXT NOT NULL,
                        created_at TEXT NOT NULL
                    )"#,
                drop: "DROP TABLE harvests",
            },
            SchemaObject {
                name: "farm_harvests",
                create: r#"
                    CREATE TABLE farm_harvests (
                        id TEXT PRIMARY KEY NOT NULL,
                        farm_id TEXT NOT NULL REFERENCES farms (id) ON DELETE CASCADE,
                        harvest_id TEXT NOT NULL REFERENCES harvests (id) ON DELETE CASCADE,
                        created_at TEXT NOT NULL,
                        UNIQUE (farm_id, harvest_id)
                    )"#,
                drop: "DROP TABLE farm_harvests",
            },
            SchemaObject {
                name: "farm_harvest_crops",
                create: r#"
                    CREATE TABLE farm_harvest_crops (
                        id TEXT PRIMARY KEY NOT NULL,
                        farm_harvest_id TEXT NOT NULL REFERENCES farm_harvests (id) ON DELETE CASCADE,
                        crop TEXT NOT NULL,
                        created_at TEXT NOT NULL,
                        UNIQUE (farm_harvest_id, crop)
                    )"#,
                drop: "DROP TABLE farm_harvest_crops",
            },
        ],
        indexes: &[
            SchemaObject {
                name: "idx_harvests_year",
                create: "CREATE UNIQUE INDEX idx_harvests_year ON harvests (year)",
                drop: "DROP INDEX idx_harvests_year",
            },
            SchemaObject {
                name: "idx_farm_harvests_harvest_id",
                create: "CREATE INDEX idx_farm_harvests_harvest_id ON farm_harvests (harvest_id)",
                drop: "DROP INDEX idx_farm_harvests_harvest_id",
            },
            SchemaObject {
                name: "idx_farm_harvest_crops_crop",
                create: "CREATE INDEX idx_farm_harvest_crops_crop ON farm_harvest_crops (crop)",
                drop: "DROP INDEX idx_farm_harvest_crops_crop",
            },
        ],
    },
];
