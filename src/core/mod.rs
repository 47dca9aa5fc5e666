//! Core business logic for donor review.
//!
//! # Modules
//!
//! - [`service`] - Report approval, rejection, notes and queries
//! - [`directory`] - Doctor CRUD
//! - [`seed`] - Startup seed data
//!
//! # Example
//!
//! ```rust
//! use donor_review::adapters::database::Repositories;
//! use donor_review::core::service::DoctorService;
//! use donor_review::domain::DoctorId;
//!
//! # async fn example() -> donor_review::domain::Result<()> {
//! let repos = Repositories::in_memory();
//! let service = DoctorService::new(repos.reports.clone());
//!
//! let stats = service.get_doctor_statistics(DoctorId::new(1)).await?;
//! assert_eq!(stats.total_reports, 0);
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod seed;
pub mod service;

pub use directory::DoctorDirectory;
pub use seed::{apply_seed, SeedSummary};
pub use service::DoctorService;
