#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate store_test;

pub mod config;
pub mod draw;
pub mod error;
pub mod logging;
pub mod model;
pub mod pairing;
pub mod store;

pub use config::Config;

/// Environment variable pointing the database tests at a MongoDB deployment.
#[cfg(test)]
pub(crate) const TEST_DB_URI_VAR: &str = "SECRET_SANTA_TEST_DB_URI";

/// Connect to the test deployment.
#[cfg(test)]
pub(crate) async fn test_db_client() -> mongodb::Client {
    let uri = std::env::var(TEST_DB_URI_VAR)
        .unwrap_or_else(|_| panic!("{TEST_DB_URI_VAR} must be set for database tests"));
    mongodb::Client::with_uri_str(&uri)
        .await
        .unwrap_or_else(|e| panic!("Could not connect to test database at \"{uri}\": {e}"))
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
pub(crate) fn test_db_name() -> String {
    let random: u32 = rand::random();
    format!("test{random}")
}
