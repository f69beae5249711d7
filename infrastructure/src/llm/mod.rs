//! Language model gateways

pub mod openai;

pub use openai::OpenAiCompatibleGateway;
