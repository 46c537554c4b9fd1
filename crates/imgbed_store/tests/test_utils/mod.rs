//! Test utilities for store tests.
//!
//! Provides a scripted transport so the store can be exercised without network access.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockReply, MockTransport};
