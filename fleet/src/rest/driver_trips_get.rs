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

//! API to list the trips done by a driver.

use crate::driver::Driver;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use fleet_core::model::parse_id;
use fleet_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_id("driver", &id)?;
    let trips = driver.list_trips_by_driver(id).await?;
    Ok(Json(trips))
}

#[cfg(test)]
mod tests {
    use crate::model::Trip;
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_empty;
    use uuid::Uuid;

    fn route(id: Uuid) -> (http::Method, String) {
        (http::Method::GET, format!("/api/v1/drivers/{}/trips", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        let car = context.create_car("KAA 111A", "Honda", &engine).await;
        let driver1 = context.create_driver("alice").await;
        let driver2 = context.create_driver("bob").await;
        let trip = context.create_trip(&driver1, &car).await;
        context.create_trip(&driver2, &car).await;

        let response = OneShotBuilder::new(context.app(), route(driver1.id))
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Trip>>()
            .await;
        assert_eq!(vec![trip], response);
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(Uuid::new_v4()),
        bearer = TestContext::setup().await.token()
    );
}
