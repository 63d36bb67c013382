/*
[INPUT]:  Lens API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod address;
pub mod enums;
pub mod handle;
pub mod outcome;
pub mod requests;
pub mod responses;

pub use address::*;
pub use enums::*;
pub use handle::*;
pub use outcome::*;
pub use requests::*;
pub use responses::*;
