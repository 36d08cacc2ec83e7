//! HTTP adapters for the external services behind `swell-core`'s provider
//! traits: OpenAI chat completions for forecast text and Loops transactional
//! email for delivery.

mod http;
pub mod loops;
pub mod openai;
pub mod prompt;
pub mod retry;

pub use loops::LoopsClient;
pub use openai::OpenAiClient;
pub use retry::RetryPolicy;
