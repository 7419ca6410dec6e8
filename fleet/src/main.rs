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

//! Entry point to the fleet service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use fleet::db::init_schema;
use fleet::driver::AuthOptions;
use fleet::serve;
use fleet_core::db::Db;
use fleet_core::db::postgres::{PostgresDb, PostgresOptions};
use fleet_core::env::get_optional_var;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Port to listen on when `FLEET_PORT` is not set.
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = get_optional_var::<u16>("FLEET", "PORT").unwrap().unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let auth_opts = AuthOptions::from_env("FLEET").unwrap();
    let db_opts = PostgresOptions::from_env("PGSQL_PROD").unwrap();
    let db = Arc::new(PostgresDb::connect(db_opts).await.unwrap());
    init_schema(&mut db.ex().await.unwrap()).await.unwrap();

    let result = serve(addr, db.clone(), auth_opts).await;
    db.close().await;
    result.unwrap()
}
