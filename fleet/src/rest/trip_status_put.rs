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

//! API to move a trip to a different status.

use crate::driver::Driver;
use crate::rest::AuthenticatedUser;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use fleet_core::model::parse_id;
use fleet_core::rest::{EmptyBody, RestError};
use serde::Deserialize;

/// Query parameters for this API.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusQuery {
    /// New status of the trip.
    status: String,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_id("trip", &id)?;
    let trip = driver.update_trip_status(&user.0, id, query.status).await?;
    Ok(Json(trip))
}
