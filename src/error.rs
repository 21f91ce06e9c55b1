// Crate-wide error type.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("No OpenAI API key (set OPENAI_API_KEY or add it to .env)")]
    MissingApiKey, // Fatal at startup
    #[error("Invalid config value for {name}: {value:?}")]
    InvalidConfig { name: &'static str, value: String },
    #[error("PNG export error: {0}")]
    Encode(#[from] image::ImageError), // Serialising the bitmap failed
    #[error("Gateway request error: {0}")]
    Gateway(#[from] reqwest::Error), // Network, TLS, HTTP status, bad JSON
    #[error("Gateway response error: {0}")]
    MalformedResponse(String), // 200 OK but no usable answer
    #[error("Solve job was cancelled")]
    Cancelled,
}
