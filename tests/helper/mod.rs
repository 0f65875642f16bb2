pub mod fakes;
pub mod helper;

pub use helper::appointment;
pub use helper::build_get_request;
pub use helper::build_post_request;
pub use helper::send;
pub use helper::TestApp;
