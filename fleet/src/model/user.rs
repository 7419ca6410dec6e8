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

//! The `User` entity.

use crate::model::Password;
use fleet_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user of the service.  The password hash is kept separately and never leaves the database
/// layer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct User {
    /// Identifier of the user.
    pub(crate) id: Uuid,

    /// Login name.  Unique across all users.
    pub(crate) username: String,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Contact email address.
    pub(crate) email: String,

    /// Contact phone number.
    pub(crate) phone_number: String,

    /// Free-form role of the user within the organization.
    pub(crate) role: String,

    /// Whether the user can log in.
    pub(crate) active: bool,

    /// Username that created this user.
    pub(crate) created_by: String,

    /// Deletion time, if the user was soft-deleted.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) deleted_at: Option<OffsetDateTime>,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Last modification time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,
}

/// Payload to create a user.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
pub(crate) struct UserRequest {
    /// Login name.
    pub(crate) username: String,

    /// Password in plain text.
    pub(crate) password: Password,

    /// Same as `password`, to catch typos.
    pub(crate) confirm_password: Password,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Contact email address.
    pub(crate) email: String,

    /// Contact phone number.
    pub(crate) phone_number: String,

    /// Free-form role of the user.
    pub(crate) role: String,
}

impl UserRequest {
    /// Checks that the password and its confirmation match.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        check_confirmation(&self.password, &self.confirm_password)
    }
}

/// Payload to update the profile of a user.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
pub(crate) struct UserUpdateRequest {
    /// Login name.
    pub(crate) username: String,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Contact email address.
    pub(crate) email: String,

    /// Contact phone number.
    pub(crate) phone_number: String,

    /// Free-form role of the user.
    pub(crate) role: String,
}

/// Payload to change the password of a user.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
pub(crate) struct UpdatePasswordRequest {
    /// Current password, which must match the stored one.
    pub(crate) previous_password: Password,

    /// New password.
    pub(crate) password: Password,

    /// Same as `password`, to catch typos.
    pub(crate) confirm_password: Password,
}

impl UpdatePasswordRequest {
    /// Checks that the new password and its confirmation match.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        check_confirmation(&self.password, &self.confirm_password)
    }
}

/// Fails if `password` and `confirm_password` differ.
fn check_confirmation(password: &Password, confirm_password: &Password) -> ModelResult<()> {
    if password != confirm_password {
        return Err(ModelError("password and confirm password do not match".to_owned()));
    }
    Ok(())
}
