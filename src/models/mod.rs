pub mod appointment;
pub mod request_schema;
pub mod response_schema;

pub use appointment::*;
pub use request_schema::*;
pub use response_schema::*;
