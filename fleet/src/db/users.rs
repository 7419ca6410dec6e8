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

//! Persistence of users and their password hashes.

use crate::model::{HashedPassword, User};
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
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let phone_number: String = row.try_get("phone_number").map_err(postgres::map_sqlx_error)?;
        let role: String = row.try_get("role").map_err(postgres::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(postgres::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(postgres::map_sqlx_error)?;
        let deleted_at = row.try_get("deleted_at").map_err(postgres::map_sqlx_error)?;
        let created_at = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(User {
            id,
            username,
            first_name,
            last_name,
            email,
            phone_number,
            role,
            active,
            created_by,
            deleted_at,
            created_at,
            updated_at,
        })
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let phone_number: String = row.try_get("phone_number").map_err(sqlite::map_sqlx_error)?;
        let role: String = row.try_get("role").map_err(sqlite::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(sqlite::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(sqlite::map_sqlx_error)?;
        let deleted_at_sec: Option<i64> =
            row.try_get("deleted_at_sec").map_err(sqlite::map_sqlx_error)?;
        let deleted_at_nsec: Option<i64> =
            row.try_get("deleted_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let created_at_sec: i64 = row.try_get("created_at_sec").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsec: i64 =
            row.try_get("created_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_sec: i64 = row.try_get("updated_at_sec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsec: i64 =
            row.try_get("updated_at_nsec").map_err(sqlite::map_sqlx_error)?;

        Ok(User {
            id,
            username,
            first_name,
            last_name,
            email,
            phone_number,
            role,
            active,
            created_by,
            deleted_at: sqlite::build_optional_timestamp(deleted_at_sec, deleted_at_nsec)?,
            created_at: sqlite::build_timestamp(created_at_sec, created_at_nsec)?,
            updated_at: sqlite::build_timestamp(updated_at_sec, updated_at_nsec)?,
        })
    }
}

/// Stores a new `user` that logs in with the `password` hash.
pub(crate) async fn create_user(
    ex: &mut Executor,
    user: &User,
    password: &HashedPassword,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO users (
                    id, username, password_hash, first_name, last_name, email, phone_number,
                    role, active, created_by, deleted_at, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ";
            sqlx::query(query_str)
                .bind(user.id)
                .bind(&user.username)
                .bind(password.as_str())
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.phone_number)
                .bind(&user.role)
                .bind(user.active)
                .bind(&user.created_by)
                .bind(user.deleted_at)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (deleted_at_sec, deleted_at_nsec) =
                sqlite::unpack_optional_timestamp(user.deleted_at);
            let (created_at_sec, created_at_nsec) = sqlite::unpack_timestamp(user.created_at);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(user.updated_at);

            let query_str = "
                INSERT INTO users (
                    id, username, password_hash, first_name, last_name, email, phone_number,
                    role, active, created_by,
                    deleted_at_sec, deleted_at_nsec,
                    created_at_sec, created_at_nsec,
                    updated_at_sec, updated_at_nsec
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(user.id)
                .bind(&user.username)
                .bind(password.as_str())
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.phone_number)
                .bind(&user.role)
                .bind(user.active)
                .bind(&user.created_by)
                .bind(deleted_at_sec)
                .bind(deleted_at_nsec)
                .bind(created_at_sec)
                .bind(created_at_nsec)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
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

/// Gets the user identified by `id`, or `None` if it does not exist or was soft-deleted.
pub(crate) async fn get_user(ex: &mut Executor, id: Uuid) -> DbResult<Option<User>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(User::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM users WHERE id = ? AND deleted_at_sec IS NULL";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(User::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the user named `username`, or `None` if it does not exist or was soft-deleted.
pub(crate) async fn get_user_by_username(
    ex: &mut Executor,
    username: &str,
) -> DbResult<Option<User>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM users WHERE username = $1 AND deleted_at IS NULL";
            let row = sqlx::query(query_str)
                .bind(username)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(User::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM users WHERE username = ? AND deleted_at_sec IS NULL";
            let row = sqlx::query(query_str)
                .bind(username)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(User::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the password hash of the user named `username` if the user can log in, which requires
/// the user to be active and not soft-deleted.
pub(crate) async fn get_login_password(
    ex: &mut Executor,
    username: &str,
) -> DbResult<Option<HashedPassword>> {
    let hash: Option<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT password_hash FROM users
                WHERE username = $1 AND active AND deleted_at IS NULL
            ";
            let row = sqlx::query(query_str)
                .bind(username)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("password_hash").map_err(postgres::map_sqlx_error)?),
                None => None,
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT password_hash FROM users
                WHERE username = ? AND active AND deleted_at_sec IS NULL
            ";
            let row = sqlx::query(query_str)
                .bind(username)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("password_hash").map_err(sqlite::map_sqlx_error)?),
                None => None,
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(hash.map(HashedPassword::new))
}

/// Gets the password hash of the user identified by `id`, or `None` if the user does not exist or
/// was soft-deleted.
pub(crate) async fn get_user_password(
    ex: &mut Executor,
    id: Uuid,
) -> DbResult<Option<HashedPassword>> {
    let hash: Option<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT password_hash FROM users WHERE id = $1 AND deleted_at IS NULL";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("password_hash").map_err(postgres::map_sqlx_error)?),
                None => None,
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                "SELECT password_hash FROM users WHERE id = ? AND deleted_at_sec IS NULL";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("password_hash").map_err(sqlite::map_sqlx_error)?),
                None => None,
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(hash.map(HashedPassword::new))
}

/// Gets all users that have not been soft-deleted.
pub(crate) async fn list_users(ex: &mut Executor) -> DbResult<Vec<User>> {
    let mut users = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM users WHERE deleted_at IS NULL ORDER BY username";
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                users.push(User::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM users WHERE deleted_at_sec IS NULL ORDER BY username";
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                users.push(User::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(users)
}

/// Replaces the profile of an existing `user`.  Neither the password nor the status change.
pub(crate) async fn update_user(ex: &mut Executor, user: &User) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE users
                SET
                    username = $2, first_name = $3, last_name = $4, email = $5,
                    phone_number = $6, role = $7, updated_at = $8
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(user.id)
                .bind(&user.username)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.phone_number)
                .bind(&user.role)
                .bind(user.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(user.updated_at);

            let query_str = "
                UPDATE users
                SET
                    username = ?, first_name = ?, last_name = ?, email = ?,
                    phone_number = ?, role = ?, updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(&user.username)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.phone_number)
                .bind(&user.role)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
                .bind(user.id)
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

/// Replaces the password hash of the user identified by `id`.
pub(crate) async fn update_user_password(
    ex: &mut Executor,
    id: Uuid,
    password: &HashedPassword,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE users
                SET password_hash = $2, updated_at = $3
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id)
                .bind(password.as_str())
                .bind(now)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                UPDATE users
                SET password_hash = ?, updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(password.as_str())
                .bind(now_sec)
                .bind(now_nsec)
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

/// Sets the `active` flag of the user identified by `id`.
pub(crate) async fn set_user_active(
    ex: &mut Executor,
    id: Uuid,
    active: bool,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE users
                SET active = $2, updated_at = $3
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id)
                .bind(active)
                .bind(now)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                UPDATE users
                SET active = ?, updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(active)
                .bind(now_sec)
                .bind(now_nsec)
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

/// Marks the user identified by `id` as deleted at `now`.
pub(crate) async fn soft_delete_user(
    ex: &mut Executor,
    id: Uuid,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE users
                SET deleted_at = $2, updated_at = $2
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id)
                .bind(now)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                UPDATE users
                SET
                    deleted_at_sec = ?, deleted_at_nsec = ?,
                    updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(now_sec)
                .bind(now_nsec)
                .bind(now_sec)
                .bind(now_nsec)
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
