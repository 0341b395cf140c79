// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod parser;
pub mod runtime;
pub mod session;
pub mod tone;

pub use controller::{SessionController, TickOutcome};
pub use error::ValidationError;
pub use parser::{parse_word_list, WordList};
pub use session::{Phase, Session};
