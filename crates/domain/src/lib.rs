//! # nexo-domain
//!
//! The nexo platform itself: energy cooperatives and their services, the
//! carbon and plant catalogues, news, culture, accounts and community
//! content. Each table has a serde model, a factory that produces rows its
//! store request accepts, and the form requests that validate user input
//! for it.
//!
//! ```ignore
//! let store = RecordStore::new();
//! DatabaseSeeder::manager().run_for_environment(&store, &Environment::Development)?;
//!
//! let request = requests::find("store_news_article", None).unwrap();
//! let data = handle(request.as_ref(), input, &ctx, Some(&store)).await?;
//! ```

pub mod factories;
pub mod models;
pub mod requests;
pub mod seeders;

pub use factories::registry;
pub use seeders::{DatabaseSeeder, SeedCounts};
