//! Schedule generation: rules, request validation, the service client
//! and the result payload

pub mod client;
pub mod error;
pub mod payload;
pub mod request;
pub mod rules;

pub use client::ScheduleClient;
pub use error::ServiceError;
pub use payload::{CellStatus, RowLike, SchedulePayload};
pub use request::{GenerateRequest, build_request};
pub use rules::ScheduleRules;
