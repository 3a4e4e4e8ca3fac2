pub mod service;

pub use service::RegisterInput;
