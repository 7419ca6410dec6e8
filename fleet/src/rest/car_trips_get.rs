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

//! API to list the trips done with a car.

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
    let id = parse_id("car", &id)?;
    let trips = driver.list_trips_by_car(id).await?;
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
        (http::Method::GET, format!("/api/v1/cars/{}/trips", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        let car1 = context.create_car("KAA 111A", "Honda", &engine).await;
        let car2 = context.create_car("KBB 222B", "Toyota", &engine).await;
        let driver = context.create_driver("alice").await;
        let trip = context.create_trip(&driver, &car1).await;
        context.create_trip(&driver, &car2).await;

        let response = OneShotBuilder::new(context.app(), route(car1.id))
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Trip>>()
            .await;
        assert_eq!(vec![trip], response);
    }

    #[tokio::test]
    async fn test_unknown_car() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Trip>>()
            .await;
        assert!(response.is_empty());
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(Uuid::new_v4()),
        bearer = TestContext::setup().await.token()
    );
}
