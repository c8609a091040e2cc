//! Host injection surface adapters.
//!
//! The production host is the platform's accessibility service, which lives
//! outside this crate and implements [`crate::application::host::HostSurface`]
//! directly.  This module provides the recording [`mock::MockHost`] used by
//! the tests and by the replay binary.

pub mod mock;
