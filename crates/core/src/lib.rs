pub mod config;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod patterns;

pub use config::AppConfig;
pub use domain::{
    CareerUrl, ExtractionMethod, Job, JobCandidate, JobHistoryEvent, JobHistoryKind, Site,
    SyncResult,
};
pub use error::CoreError;
