#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
//! Process bootstrap shared by `glossary-server` and `glossary-gateway`.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{LoggingConfig, load_layered, render_config};
pub use logging::init_logging;
pub use shutdown::cancel_on_ctrl_c;
