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

//! Data types for the fleet service.
//!
//! Every entity lives in its own module together with the requests that create or modify it and
//! the validation rules that apply to those requests.

mod auth;
mod car;
mod driver;
mod engine;
mod trip;
mod user;

pub(crate) use auth::{Claims, Credentials, HashedPassword, Password, TokenResponse};
pub(crate) use car::{Car, CarRequest, CarStatus, FuelType};
pub(crate) use driver::{Driver, DriverRequest, DriverUpdateRequest, DriverUser};
pub(crate) use engine::{Engine, EngineRequest};
pub(crate) use trip::{Trip, TripRequest, TripStatus};
pub(crate) use user::{UpdatePasswordRequest, User, UserRequest, UserUpdateRequest};
