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


//! Generic types shared by the domain models of every service.
//!
//! Models describe concepts of the domain and should carry as little logic as possible.  The only
//! logic that belongs here is the validation of untrusted input, which must fail with a
//! `ModelError` so that the higher layers can report it as a bad request.

use uuid::Uuid;

/// Model errors.  These are always validation problems with the input data.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Parses an untrusted `id` of the entity named `what` into a `Uuid`.
pub fn parse_id(what: &str, id: &str) -> ModelResult<Uuid> {
    Uuid::parse_str(id).map_err(|e| ModelError(format!("Invalid {} id '{}': {}", what, id, e)))
}
