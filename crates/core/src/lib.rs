pub mod date;
pub mod error;
pub mod money;
pub mod record;

pub use date::{
    logical_now, logical_today, seasonal_offset_hours, Clock, ExpenseDate, FixedClock, SystemClock,
};
pub use error::RecordError;
pub use money::Money;
pub use record::{DeletionDirective, DeletionScope, ParsedExpense, DELETE_PREFIX, FALLBACK_LABEL};
