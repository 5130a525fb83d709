pub mod exchange;
pub mod field;
pub mod location;
pub mod profiles;
pub mod recommendation;
pub mod rotation;

pub use exchange::*;
pub use field::*;
pub use location::*;
pub use profiles::*;
pub use recommendation::*;
pub use rotation::*;
