pub mod created;
pub mod send_reminders;
