//! Integration tests against a real FileMaker Server.
//!
//! These tests need a server with the `FMPHP_Sample` database published for
//! XML web publishing and are ignored by default. To run them, create a
//! `.env` file in the fmxml-lib directory with:
//!
//! ```env
//! FMS_URL=http://fms.example.com
//! FMS_USERNAME=web
//! FMS_PASSWORD=your-password
//! FMS_DATABASE=FMPHP_Sample
//! ```
//!
//! Then run: `cargo test -p fmxml-lib -- --ignored`

use std::env;

use fmxml_lib::FmsClient;
use fmxml_lib::api::command::Command;
use fmxml_lib::api::command::Max;
use fmxml_lib::api::command::SortOrder;

fn load_env() -> Option<(String, String, String, String)> {
    let _ = dotenvy::dotenv();

    let url = env::var("FMS_URL").ok()?;
    let username = env::var("FMS_USERNAME").ok()?;
    let password = env::var("FMS_PASSWORD").ok()?;
    let database = env::var("FMS_DATABASE").ok()?;

    Some((url, username, password, database))
}

fn live_client() -> FmsClient {
    let (url, username, password, database) =
        load_env().expect("Missing required environment variables. See module docs.");

    FmsClient::builder()
        .url(url)
        .credentials(username, password)
        .database(database)
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore = "requires a live server in .env file"]
async fn test_database_names() {
    let client = live_client();
    let names = client.database_names().await.expect("Failed to list databases");
    let database = client.database().unwrap().to_string();
    assert!(names.contains(&database), "{database} not in {names:?}");
}

#[tokio::test]
#[ignore = "requires a live server in .env file"]
async fn test_sorted_window() {
    let client = live_client();

    let mut find = client.find("English");
    find.add_sort_rule("Title", 1, Some(SortOrder::Ascend))
        .unwrap()
        .set_skip(5)
        .set_max(Max::Limit(4));
    let result = find.execute().await.expect("Find failed");

    assert!(result.records().len() <= 4);
    println!(
        "found {} of {}, fetched {}",
        result.found_count(),
        result.total_count(),
        result.fetch_size()
    );
}

#[tokio::test]
#[ignore = "requires a live server in .env file"]
async fn test_layout() {
    let client = live_client();

    let layout = client.layout("English").await.expect("Layout failed");
    assert_eq!(layout.name(), "English");
    assert!(!layout.field_names().is_empty());

    let again = client.layout("English").await.expect("Layout failed");
    assert!(std::sync::Arc::ptr_eq(&layout, &again));
}
