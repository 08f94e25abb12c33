pub mod builder;
pub mod defaults;
pub mod runtime;
pub mod stages;
pub mod streams;
pub mod traits;
