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

//! API to update the specifications of an engine.

use crate::driver::Driver;
use crate::model::EngineRequest;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use fleet_core::model::parse_id;
use fleet_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Json(request): Json<EngineRequest>,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_id("engine", &id)?;
    let engine = driver.update_engine(id, request).await?;
    Ok(Json(engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Engine;
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_json;
    use uuid::Uuid;

    fn route(id: Uuid) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/v1/engines/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;

        let request = EngineRequest { displacement: 3000, no_of_cylinders: 8, car_range: 450 };
        let response = OneShotBuilder::new(context.app(), route(engine.engine_id))
            .with_bearer_auth(context.token())
            .send_json(request)
            .await
            .expect_json::<Engine>()
            .await;
        let exp_engine = Engine {
            engine_id: engine.engine_id,
            displacement: 3000,
            no_of_cylinders: 8,
            car_range: 450,
        };
        assert_eq!(exp_engine, response);
        assert_eq!(exp_engine, context.driver().get_engine(engine.engine_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        let request = EngineRequest { displacement: 3000, no_of_cylinders: 8, car_range: 450 };
        OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_bearer_auth(context.token())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_invalid() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;

        let request = EngineRequest { displacement: 3000, no_of_cylinders: 8, car_range: -5 };
        OneShotBuilder::new(context.app(), route(engine.engine_id))
            .with_bearer_auth(context.token())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("car range must be greater than 0")
            .await;
        assert_eq!(engine, context.driver().get_engine(engine.engine_id).await.unwrap());
    }

    test_payload_must_be_json!(
        TestContext::setup().await.into_app(),
        route(Uuid::new_v4()),
        bearer = TestContext::setup().await.token()
    );
}
