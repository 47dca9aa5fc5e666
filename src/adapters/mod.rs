//! Storage integrations for donor review.
//!
//! - [`database`] - Repository traits and the backend factory
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-memory implementation for local runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the store from the
//! business logic. Services depend only on the traits in
//! [`database::traits`], and the factory picks the implementation from
//! configuration:
//!
//! ```rust
//! use donor_review::adapters::database::Repositories;
//!
//! # async fn example() -> donor_review::domain::Result<()> {
//! let repos = Repositories::in_memory();
//! repos.database.ensure_schema().await?;
//! assert_eq!(repos.doctors.count().await?, 0);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
