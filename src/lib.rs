// Draw a math expression, send a snapshot to a vision model, see the answer
// painted next to it.

pub mod app;
pub mod config;
pub mod draw;
pub mod error;
pub mod gateway;
pub mod input;
pub mod job;
pub mod ledger;
pub mod logging;
pub mod raster;
pub mod surface;
pub mod toolbar;
pub mod types;

pub use app::{App, InputEvent, Status};
pub use config::Config;
pub use error::Error;
pub use gateway::{OpenAiGateway, Solver};
