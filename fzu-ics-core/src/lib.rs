//! FZU ICS Core Library
//!
//! This library converts weekly class-schedule records into recurring ICS
//! calendar events anchored to a term start date.

pub mod assemble;
pub mod error;
pub mod ics;
pub mod identity;
pub mod location;
pub mod period;
pub mod pipeline;
pub mod projector;
pub mod recurrence;
pub mod semester;
pub mod source;
pub mod types;
pub mod whole_week;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        ics::IcsCalendar,
        location::LocationNormalizer,
        pipeline::{Converter, TermOutput, TermSelection},
        source::{ScheduleSource, SnapshotSource},
        types::*,
    };
}
