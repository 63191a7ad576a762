mod callback;
mod introspection;
mod request;
mod response;

pub use self::callback::*;
pub use self::introspection::*;
pub use self::request::*;
pub use self::response::*;
