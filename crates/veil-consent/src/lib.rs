//! Veil Consent Model
//!
//! Categories a page embed can require, the state a consent provider
//! reports for them, and the gap between the two.
//!
//! | Category    | Granted when                   |
//! | Necessary   | Always                         |
//! | Preferences | Provider reports `preferences` |
//! | Statistics  | Provider reports `statistics`  |
//! | Marketing   | Provider reports `marketing`   |
//! | Other       | Never                          |

mod category;
mod error;
mod gap;
mod provider;
mod state;

pub use category::{ConsentCategory, RequiredConsent, IGNORE_SENTINEL};
pub use error::ConsentError;
pub use gap::{ConsentGap, GapOutcome, GapPolicy};
pub use provider::{ConsentProvider, MemoryProvider};
pub use state::ConsentState;

pub type Result<T> = std::result::Result<T, ConsentError>;
