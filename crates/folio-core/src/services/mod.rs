//! Services - orchestrate the pure domain logic over the repository ports.

mod accounts;
mod authors;
mod blogs;
mod dashboard;
mod engagement;

pub use accounts::{AccountService, Registration, Session};
pub use authors::Authored;
pub use blogs::{BlogListing, BlogService};
pub use dashboard::{DashboardReport, DashboardService};
pub use engagement::{EngagementService, LikeOutcome};
