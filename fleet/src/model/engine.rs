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

//! The `Engine` entity.

use fleet_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An engine that powers zero or more cars.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub(crate) struct Engine {
    /// Identifier of the engine.
    pub(crate) engine_id: Uuid,

    /// Displacement in cubic centimeters.
    pub(crate) displacement: i64,

    /// Number of cylinders.
    pub(crate) no_of_cylinders: i64,

    /// Range of a car powered by this engine, in kilometers.
    pub(crate) car_range: i64,
}

impl Engine {
    /// Creates an engine named `engine_id` from the values in `request`.
    pub(crate) fn from_request(engine_id: Uuid, request: &EngineRequest) -> Self {
        Self {
            engine_id,
            displacement: request.displacement,
            no_of_cylinders: request.no_of_cylinders,
            car_range: request.car_range,
        }
    }

    /// Creates a placeholder engine that only carries its identifier.  Used when an entity refers
    /// to an engine without having loaded its details.
    pub(crate) fn with_id(engine_id: Uuid) -> Self {
        Self { engine_id, ..Default::default() }
    }
}

/// Payload to create or update an engine.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Clone, serde::Serialize))]
#[serde(default)]
pub(crate) struct EngineRequest {
    /// Displacement in cubic centimeters.
    pub(crate) displacement: i64,

    /// Number of cylinders.
    pub(crate) no_of_cylinders: i64,

    /// Range of a car powered by this engine, in kilometers.
    pub(crate) car_range: i64,
}

impl EngineRequest {
    /// Checks that all engine specifications are positive.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        validate_specs(self.displacement, self.no_of_cylinders, self.car_range)
    }
}

/// Checks that the `displacement`, `no_of_cylinders` and `car_range` of an engine are positive.
pub(super) fn validate_specs(
    displacement: i64,
    no_of_cylinders: i64,
    car_range: i64,
) -> ModelResult<()> {
    if displacement <= 0 {
        return Err(ModelError("displacement must be greater than 0".to_owned()));
    }
    if no_of_cylinders <= 0 {
        return Err(ModelError("number of cylinders must be greater than 0".to_owned()));
    }
    if car_range <= 0 {
        return Err(ModelError("car range must be greater than 0".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_request_ok() {
        let request = EngineRequest { displacement: 1500, no_of_cylinders: 4, car_range: 600 };
        request.validate().unwrap();
    }

    #[test]
    fn test_engine_request_not_positive() {
        for (displacement, no_of_cylinders, car_range, exp_error) in [
            (0, 4, 600, "displacement must be greater than 0"),
            (-1, 4, 600, "displacement must be greater than 0"),
            (1500, 0, 600, "number of cylinders must be greater than 0"),
            (1500, 4, -600, "car range must be greater than 0"),
        ] {
            let request = EngineRequest { displacement, no_of_cylinders, car_range };
            assert_eq!(ModelError(exp_error.to_owned()), request.validate().unwrap_err());
        }
    }

    #[test]
    fn test_engine_partial_json() {
        let id = Uuid::new_v4();
        let engine: Engine =
            serde_json::from_str(&format!(r#"{{"engine_id": "{}"}}"#, id)).unwrap();
        assert_eq!(Engine::with_id(id), engine);
    }
}
