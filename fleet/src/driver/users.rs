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

//! Operations on users.

use crate::db;
use crate::driver::{Driver, found};
use crate::model::{UpdatePasswordRequest, User, UserRequest, UserUpdateRequest};
use fleet_core::driver::{DriverError, DriverResult};
use log::{info, warn};
use uuid::Uuid;

impl Driver {
    /// Creates a new active user on behalf of `actor` with the details in `request`.
    pub(crate) async fn create_user(self, actor: &str, request: UserRequest) -> DriverResult<User> {
        request.validate()?;
        let hash = request.password.hash(self.opts.bcrypt_cost)?;

        let now = self.clock.now_utc();
        let user = User {
            id: Uuid::new_v4(),
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            role: request.role,
            active: true,
            created_by: actor.to_owned(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let mut tx = self.db.begin().await?;
        db::create_user(tx.ex(), &user, &hash).await?;
        tx.commit().await?;

        info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Gets the user identified by `id`.
    pub(crate) async fn get_user(self, id: Uuid) -> DriverResult<User> {
        found("User", db::get_user(&mut self.db.ex().await?, id).await?)
    }

    /// Gets the user named `username`.
    pub(crate) async fn get_user_by_username(self, username: &str) -> DriverResult<User> {
        found("User", db::get_user_by_username(&mut self.db.ex().await?, username).await?)
    }

    /// Gets all users that have not been deleted.
    pub(crate) async fn list_users(self) -> DriverResult<Vec<User>> {
        Ok(db::list_users(&mut self.db.ex().await?).await?)
    }

    /// Replaces the profile of the user identified by `id` with the details in `request`.
    pub(crate) async fn update_user(
        self,
        id: Uuid,
        request: UserUpdateRequest,
    ) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let mut user = found("User", db::get_user(tx.ex(), id).await?)?;
        user.username = request.username;
        user.first_name = request.first_name;
        user.last_name = request.last_name;
        user.email = request.email;
        user.phone_number = request.phone_number;
        user.role = request.role;
        user.updated_at = self.clock.now_utc();
        db::update_user(tx.ex(), &user).await?;
        tx.commit().await?;

        info!("Updated user {}", id);
        Ok(user)
    }

    /// Changes the password of the user identified by `id`.
    ///
    /// The previous password in `request` must match the stored one.
    pub(crate) async fn update_user_password(
        self,
        id: Uuid,
        request: UpdatePasswordRequest,
    ) -> DriverResult<User> {
        request.validate()?;

        let mut tx = self.db.begin().await?;
        let current = found("User", db::get_user_password(tx.ex(), id).await?)?;
        if !request.previous_password.verify(&current)? {
            warn!("Rejected password change for user {}: previous password mismatch", id);
            return Err(DriverError::InvalidInput("previous password is incorrect".to_owned()));
        }
        let hash = request.password.hash(self.opts.bcrypt_cost)?;
        db::update_user_password(tx.ex(), id, &hash, self.clock.now_utc()).await?;
        let user = found("User", db::get_user(tx.ex(), id).await?)?;
        tx.commit().await?;

        info!("Changed password of user {}", id);
        Ok(user)
    }

    /// Sets the `active` flag of the user identified by `id`.
    pub(crate) async fn toggle_user_status(self, id: Uuid, active: bool) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        db::set_user_active(tx.ex(), id, active, self.clock.now_utc()).await?;
        let user = found("User", db::get_user(tx.ex(), id).await?)?;
        tx.commit().await?;

        info!("Set user {} active={}", id, active);
        Ok(user)
    }

    /// Marks the user identified by `id` as deleted and returns its last state.
    pub(crate) async fn soft_delete_user(self, id: Uuid) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let user = found("User", db::get_user(tx.ex(), id).await?)?;
        db::soft_delete_user(tx.ex(), id, self.clock.now_utc()).await?;
        tx.commit().await?;

        info!("Deleted user {}", id);
        Ok(user)
    }
}
