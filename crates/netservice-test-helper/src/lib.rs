//! Test doubles for netservice.
//!
//! [`MockNetworkService`] stands in for the real transport behind a
//! [`netservice::NetworkService`]:
//!
//! ```
//! use netservice::{JsonCodec, NetworkService, Url};
//! use netservice_test_helper::{MockNetworkService, MockOutput};
//!
//! # tokio_test::block_on(async {
//! let mock = MockNetworkService::with_outputs([MockOutput::json(&vec!["hello"])]);
//! let service = NetworkService::with_transport(mock);
//! let url = Url::parse("http://example.com/greetings").unwrap();
//!
//! let greetings: Vec<String> = service.get_decoded(&url, &[], &JsonCodec::new()).await.unwrap();
//! assert_eq!(greetings, ["hello"]);
//! # });
//! ```

pub mod mock;
pub mod setup;

pub use mock::{Delay, MockError, MockNetworkService, MockOutput};
pub use setup::init_tracing;
