//! SQLite implementation of the seeding storage port.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) so building the
//! crate never needs a database. Ids are stored as hyphenated UUID text and
//! areas as canonical decimal text, which round-trip exactly.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{EntityKind, Result, SeedStore, StoreError};
use crate::models::{
    City, Farm, FarmHarvest, FarmHarvestCrop, Harvest, NewCity, NewFarm, NewHarvest, NewProducer,
    Producer, ProducerKind,
};

#[derive(Clone)]
pub struct SqliteSeedStore {
    pool: SqlitePool,
}

impl SqliteSeedStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn uuid_column(row: &SqliteRow, column: &'static str) -> Result<Uuid> {
    let raw: String = row
        .try_get(column)
        .map_err(StoreError::database("decode row"))?;
    Uuid::parse_str(&raw).map_err(|_| StoreError::InvalidColumn { column, value: raw })
}

fn decimal_column(row: &SqliteRow, column: &'static str) -> Result<Decimal> {
    let raw: String = row
        .try_get(column)
        .map_err(StoreError::database("decode row"))?;
    Decimal::from_str(&raw).map_err(|_| StoreError::InvalidColumn { column, value: raw })
}

fn text_column(row: &SqliteRow, column: &'static str) -> Result<String> {
    row.try_get(column)
        .map_err(StoreError::database("decode row"))
}

fn producer_from_row(row: &SqliteRow) -> Result<Producer> {
    let kind_raw = text_column(row, "kind")?;
    let kind = ProducerKind::parse(&kind_raw).ok_or(StoreError::InvalidColumn {
        column: "kind",
        value: kind_raw.clone(),
    })?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(StoreError::database("decode row"))?;

    Ok(Producer {
        id: uuid_column(row, "id")?,
        name: text_column(row, "name")?,
        document: text_column(row, "document")?,
        kind,
        created_at,
    })
}

fn city_from_row(row: &SqliteRow) -> Result<City> {
    Ok(City {
        id: uuid_column(row, "id")?,
        name: text_column(row, "name")?,
        state: text_column(row, "state")?,
        external_code: text_column(row, "external_code")?,
    })
}

fn farm_from_row(row: &SqliteRow) -> Result<Farm> {
    Ok(Farm {
        id: uuid_column(row, "id")?,
        producer_id: uuid_column(row, "producer_id")?,
        city_id: uuid_column(row, "city_id")?,
        name: text_column(row, "name")?,
        state: text_column(row, "state")?,
        total_area: decimal_column(row, "total_area")?,
        arable_area: decimal_column(row, "arable_area")?,
        vegetation_area: decimal_column(row, "vegetation_area")?,
    })
}

fn harvest_from_row(row: &SqliteRow) -> Result<Harvest> {
    let year: i64 = row
        .try_get("year")
        .map_err(StoreError::database("decode row"))?;
    let year = i32::try_from(year).map_err(|_| StoreError::InvalidColumn {
        column: "year",
        value: year.to_string(),
    })?;

    Ok(Harvest {
        id: uuid_column(row, "id")?,
        year,
        description: text_column(row, "description")?,
    })
}

#[async_trait]
impl SeedStore for SqliteSeedStore {
    async fn is_ready(&self) -> Result<bool> {
        let names = EntityKind::ALL
            .iter()
            .map(|kind| format!("'{}'", kind.table()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ({})",
            names
        );

        let found: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::database("check schema"))?;

        Ok(found as usize == EntityKind::ALL.len())
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::database("count rows"))?;
        Ok(count.max(0) as u64)
    }

    async fn create_cities(&self, cities: &[NewCity]) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::database("begin city batch"))?;

        let now = Utc::now();
        let mut inserted = 0;
        for city in cities {
            let result = sqlx::query(
                r#"INSERT INTO cities (id, name, state, external_code, created_at)
                   VALUES (?, ?, ?, ?, ?)
                   ON CONFLICT (external_code) DO NOTHING"#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&city.name)
            .bind(&city.state)
            .bind(&city.external_code)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::database("insert city"))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(StoreError::database("commit city batch"))?;
        Ok(inserted)
    }

    async fn find_cities_by_state(&self, state: &str, limit: u32) -> Result<Vec<City>> {
        let rows = sqlx::query(
            r#"SELECT id, name, state, external_code
               FROM cities
               WHERE state = ?
               ORDER BY name
               LIMIT ?"#,
        )
        .bind(state)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::database("find cities"))?;

        rows.iter().map(city_from_row).collect()
    }

    async fn create_producer(&self, producer: &NewProducer) -> Result<Producer> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"INSERT INTO producers (id, name, document, kind, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&producer.name)
        .bind(&producer.document)
        .bind(producer.kind.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("insert producer"))?;

        Ok(Producer {
            id,
            name: producer.name.clone(),
            document: producer.document.clone(),
            kind: producer.kind,
            created_at: now,
        })
    }

    async fn list_producers(&self) -> Result<Vec<Producer>> {
        let rows = sqlx::query(
            r#"SELECT id, name, document, kind, created_at
               FROM producers
               ORDER BY rowid"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::database("list producers"))?;

        rows.iter().map(producer_from_row).collect()
    }

    async fn create_farm(&self, farm: &NewFarm) -> Result<Farm> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"INSERT INTO farms (
                   id, producer_id, city_id, name, state,
                   total_area, arable_area, vegetation_area, created_at, updated_at
               ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(farm.producer_id.to_string())
        .bind(farm.city_id.to_string())
        .bind(&farm.name)
        .bind(&farm.state)
        .bind(farm.total_area.to_string())
        .bind(farm.arable_area.to_string())
        .bind(farm.vegetation_area.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("insert farm"))?;

        Ok(Farm {
            id,
            producer_id: farm.producer_id,
            city_id: farm.city_id,
            name: farm.name.clone(),
            state: farm.state.clone(),
            total_area: farm.total_area,
            arable_area: farm.arable_area,
            vegetation_area: farm.vegetation_area,
        })
    }

    async fn list_farms(&self) -> Result<Vec<Farm>> {
        let rows = sqlx::query(
            r#"SELECT id, producer_id, city_id, name, state,
                      total_area, arable_area, vegetation_area
               FROM farms
               ORDER BY rowid"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::database("list farms"))?;

        rows.iter().map(farm_from_row).collect()
    }

    async fn create_harvest(&self, harvest: &NewHarvest) -> Result<Harvest> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO harvests (id, year, description, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(harvest.year)
        .bind(&harvest.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("insert harvest"))?;

        Ok(Harvest {
            id,
            year: harvest.year,
            description: harvest.description.clone(),
        })
    }

    async fn list_harvests(&self) -> Result<Vec<Harvest>> {
        let rows = sqlx::query("SELECT id, year, description FROM harvests ORDER BY year")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database("list harvests"))?;

        rows.iter().map(harvest_from_row).collect()
    }

    async fn create_farm_harvest(&self, farm_id: Uuid, harvest_id: Uuid) -> Result<FarmHarvest> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO farm_harvests (id, farm_id, harvest_id, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(farm_id.to_string())
        .bind(harvest_id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("insert farm harvest"))?;

        Ok(FarmHarvest {
            id,
            farm_id,
            harvest_id,
        })
    }

    async fn create_farm_harvest_crop(
        &self,
        farm_harvest_id: Uuid,
        crop: &str,
    ) -> Result<FarmHarvestCrop> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO farm_harvest_crops (id, farm_harvest_id, crop, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(farm_harvest_id.to_string())
        .bind(crop)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StoreError::database("insert crop"))?;

        Ok(FarmHarvestCrop {
            id,
            farm_harvest_id,
            crop: crop.to_string(),
        })
    }
}
