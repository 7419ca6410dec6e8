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

//! Operations to authenticate users and to issue and check their bearer tokens.

use crate::db;
use crate::driver::Driver;
use crate::model::{Claims, Credentials, Password, TokenResponse};
use fleet_core::driver::{DriverError, DriverResult};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use time::Duration;

/// Lifetime of the tokens handed out by `issue_token`.
const TOKEN_LIFETIME: Duration = Duration::hours(24);

impl Driver {
    /// Checks that `username` names an active user whose password is `password`.
    pub(crate) async fn authenticate(self, username: &str, password: Password) -> DriverResult<()> {
        let hash = match db::get_login_password(&mut self.db.ex().await?, username).await? {
            Some(hash) => hash,
            None => {
                warn!("Login attempt for unknown or inactive user {}", username);
                return Err(DriverError::Unauthorized("Invalid username or password".to_owned()));
            }
        };

        if !password.verify(&hash)? {
            warn!("Login attempt with bad password for user {}", username);
            return Err(DriverError::Unauthorized("Invalid username or password".to_owned()));
        }
        Ok(())
    }

    /// Creates a signed token that identifies `username` for the next 24 hours.
    pub(crate) fn issue_token(&self, username: &str) -> DriverResult<String> {
        let iat = self.clock.unix_timestamp();
        let claims =
            Claims { sub: username.to_owned(), iat, exp: iat + TOKEN_LIFETIME.whole_seconds() };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.opts.jwt_secret.as_bytes()),
        )
        .map_err(|e| DriverError::BackendError(format!("Cannot sign token: {}", e)))
    }

    /// Checks that `token` was issued by us and has not expired yet, and returns the name of the
    /// user it identifies.
    pub(crate) fn verify_token(&self, token: &str) -> DriverResult<String> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.opts.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            DriverError::Unauthorized("Invalid token".to_owned())
        })?;

        if self.clock.unix_timestamp() >= data.claims.exp {
            warn!("Rejected expired bearer token for user {}", data.claims.sub);
            return Err(DriverError::Unauthorized("Token expired".to_owned()));
        }
        Ok(data.claims.sub)
    }

    /// Authenticates the user in `credentials` and hands out a token for them.
    pub(crate) async fn login(self, credentials: Credentials) -> DriverResult<TokenResponse> {
        let password = match Password::new(credentials.password) {
            Ok(password) => password,
            Err(e) => {
                warn!(
                    "Login attempt with unusable password for user {}: {}",
                    credentials.username, e
                );
                return Err(DriverError::Unauthorized("Invalid username or password".to_owned()));
            }
        };
        self.clone().authenticate(&credentials.username, password).await?;
        let token = self.issue_token(&credentials.username)?;
        info!("User {} logged in", credentials.username);
        Ok(TokenResponse { token })
    }
}
