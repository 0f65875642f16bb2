pub mod appointment;
pub mod default;
pub mod global_404;
pub mod ping;

pub use appointment::created::appointment_created_handler;
pub use appointment::send_reminders::send_reminders_handler;

pub use default::default_route_handler;

pub use global_404::global_404_handler;

pub use ping::ping_handler;
