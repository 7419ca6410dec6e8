// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Persistence of engines.

use crate::model::Engine;
#[cfg(feature = "postgres")]
use fleet_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use fleet_core::db::sqlite;
use fleet_core::db::{DbError, DbResult, Executor, ensure_one_insert, ensure_one_update};
use futures::TryStreamExt;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Engine {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let engine_id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let displacement: i64 = row.try_get("displacement").map_err(postgres::map_sqlx_error)?;
        let no_of_cylinders: i64 =
            row.try_get("no_of_cylinders").map_err(postgres::map_sqlx_error)?;
        let car_range: i64 = row.try_get("car_range").map_err(postgres::map_sqlx_error)?;
        Ok(Engine { engine_id, displacement, no_of_cylinders, car_range })
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Engine {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let engine_id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let displacement: i64 = row.try_get("displacement").map_err(sqlite::map_sqlx_error)?;
        let no_of_cylinders: i64 =
            row.try_get("no_of_cylinders").map_err(sqlite::map_sqlx_error)?;
        let car_range: i64 = row.try_get("car_range").map_err(sqlite::map_sqlx_error)?;
        Ok(Engine { engine_id, displacement, no_of_cylinders, car_range })
    }
}

/// Stores a new `engine`.
pub(crate) async fn create_engine(ex: &mut Executor, engine: &Engine) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO engines (id, displacement, no_of_cylinders, car_range)
                VALUES ($1, $2, $3, $4)
            ";
            sqlx::query(query_str)
                .bind(engine.engine_id)
                .bind(engine.displacement)
                .bind(engine.no_of_cylinders)
                .bind(engine.car_range)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO engines (id, displacement, no_of_cylinders, car_range)
                VALUES (?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(engine.engine_id)
                .bind(engine.displacement)
                .bind(engine.no_of_cylinders)
                .bind(engine.car_range)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_insert(rows_affected)
}

/// Gets the engine identified by `id`, or `None` if it does not exist.
pub(crate) async fn get_engine(ex: &mut Executor, id: Uuid) -> DbResult<Option<Engine>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM engines WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Engine::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM engines WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Engine::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all engines.
pub(crate) async fn list_engines(ex: &mut Executor) -> DbResult<Vec<Engine>> {
    let query_str = "SELECT * FROM engines ORDER BY id";
    let mut engines = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                engines.push(Engine::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                engines.push(Engine::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(engines)
}

/// Replaces the specifications of an existing `engine`.
pub(crate) async fn update_engine(ex: &mut Executor, engine: &Engine) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE engines
                SET displacement = $2, no_of_cylinders = $3, car_range = $4
                WHERE id = $1
            ";
            sqlx::query(query_str)
                .bind(engine.engine_id)
                .bind(engine.displacement)
                .bind(engine.no_of_cylinders)
                .bind(engine.car_range)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE engines
                SET displacement = ?, no_of_cylinders = ?, car_range = ?
                WHERE id = ?
            ";
            sqlx::query(query_str)
                .bind(engine.displacement)
                .bind(engine.no_of_cylinders)
                .bind(engine.car_range)
                .bind(engine.engine_id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_update(rows_affected)
}

/// Deletes the engine identified by `id`.  Fails if any car still uses it.
pub(crate) async fn delete_engine(ex: &mut Executor, id: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM engines WHERE id = $1";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM engines WHERE id = ?";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_update(rows_affected)
}
