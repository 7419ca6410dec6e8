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

//! API to list all engines.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use fleet_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let engines = driver.list_engines().await?;
    Ok(Json(engines))
}

#[cfg(test)]
mod tests {
    use crate::model::Engine;
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_empty;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/engines".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let engine1 = context.create_engine().await;
        let engine2 = context.create_engine().await;
        let mut exp_engines = vec![engine1, engine2];
        exp_engines.sort_by_key(|e| e.engine_id);

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Engine>>()
            .await;
        assert_eq!(exp_engines, response);
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<Vec<Engine>>()
            .await;
        assert!(response.is_empty());
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(),
        bearer = TestContext::setup().await.token()
    );
}
