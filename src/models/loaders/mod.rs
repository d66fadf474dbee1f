pub mod payload_loader;

pub use payload_loader::load_payloads;
