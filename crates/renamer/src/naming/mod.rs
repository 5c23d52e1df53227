//! Name composition and unique name resolution.

pub mod alpha;
pub mod compose;
pub mod request;
pub mod resolve;
pub mod side;

pub use alpha::alpha_index;
pub use compose::compose;
pub use request::{IndexMode, MAX_PADDING, NameRequest, SearchReplace};
pub use resolve::{DEFAULT_MAX_RETRIES, FromFn, Layered, NameUniverse, Resolver};
pub use side::Side;
