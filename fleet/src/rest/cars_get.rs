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

//! API to list cars.

use crate::driver::Driver;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use fleet_core::rest::{EmptyBody, RestError};
use serde::Deserialize;

/// Query parameters for this API.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CarsQuery {
    /// Only return cars of this brand.  Empty means all brands.
    brand: Option<String>,

    /// Whether to load the details of the engine of each car.
    #[serde(rename = "isEngine")]
    is_engine: bool,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(query): Query<CarsQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let brand = query.brand.filter(|b| !b.is_empty());
    let cars = driver.list_cars(brand, query.is_engine).await?;
    Ok(Json(cars))
}

#[cfg(test)]
mod tests {
    use crate::model::{Car, Engine};
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/cars".to_owned())
    }

    /// Returns a copy of `car` with only the identifier of its engine.
    fn without_engine(car: &Car) -> Car {
        let mut car = car.clone();
        car.engine = Engine::with_id(car.engine.engine_id);
        car
    }

    #[tokio::test]
    async fn test_all() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        let car1 = context.create_car("KBB 222B", "Toyota", &engine).await;
        let car2 = context.create_car("KAA 111A", "Honda", &engine).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Car>>()
            .await;
        assert_eq!(vec![without_engine(&car2), without_engine(&car1)], response);
    }

    #[tokio::test]
    async fn test_brand_and_engine() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        context.create_car("KBB 222B", "Toyota", &engine).await;
        let car = context.create_car("KAA 111A", "Honda", &engine).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query([("brand", "Honda"), ("isEngine", "true")])
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Car>>()
            .await;
        assert_eq!(vec![car], response);
    }

    #[tokio::test]
    async fn test_empty_brand_is_ignored() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        context.create_car("KBB 222B", "Toyota", &engine).await;
        context.create_car("KAA 111A", "Honda", &engine).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query([("brand", "")])
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Car>>()
            .await;
        assert_eq!(2, response.len());
    }

    #[tokio::test]
    async fn test_bad_is_engine() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_query([("isEngine", "maybe")])
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_text("Failed to deserialize query string")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(),
        bearer = TestContext::setup().await.token()
    );
}
