pub mod domain;
pub mod errors;
pub mod locks;
pub mod pipeline;
pub mod traits;
