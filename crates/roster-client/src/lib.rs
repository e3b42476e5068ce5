//! roster-client — upstream LMS access for roster balancing.
//!
//! Provides the paginated request client and the gateway operations the
//! reconciliation driver composes.
//!
//! # Architecture
//!
//! ```text
//! LmsGateway (RosterGateway)
//!   ├── get_course / list_students / list_sections   → RequestResult<T>
//!   ├── create_section / create_enrollment / delete  → Option<T>, failures logged
//!   └── ApiClient
//!       ├── endpoint()  base + path + per_page + params
//!       ├── fetch()     drain pages while Link has rel="next"
//!       └── page ceiling → RequestError::PageLimit
//! ```
//!
//! The `test-util` feature adds [`InMemoryGateway`], a mutex-backed
//! gateway with failure injection for driver and API tests.

pub mod client;
pub mod error;
pub mod gateway;
pub mod link;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use client::{ApiClient, Payload};
pub use error::{RequestError, RequestResult};
pub use gateway::{LmsGateway, RosterGateway};
pub use link::{LinkValue, next_link, parse_links};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{GatewayCall, InMemoryGateway};
pub use reqwest::Method;
