//! One client per OSDU service.

pub mod file;
pub mod policy;
pub mod schema;
pub mod search;
pub mod wellbore;

pub use file::FileClient;
pub use policy::PolicyClient;
pub use schema::SchemaClient;
pub use search::SearchClient;
pub use wellbore::{WellboreClient, WellboreCommon, WellboreV2Client, WellboreV3Client, WellboreVersion};
