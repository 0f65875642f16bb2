pub mod confirmation;
pub mod delivery;
pub mod reminder_sweep;

pub use confirmation::{ConfirmationNotifier, ConfirmationOutcome};
pub use delivery::{deliver, DeliveryOutcome, DeliveryStatus};
pub use reminder_sweep::{ReminderSweep, SweepReport};
