//! Bubble-style viewer and PNG exporter for exported chat transcripts.
//!
//! Data flows one way: [`types`] parses and normalizes the export,
//! [`view`] holds the immutable filter/pagination state, [`layout`] turns
//! messages into positioned shapes, and [`ui`] / [`export`] paint those shapes
//! into a window or an image.

pub mod config;
pub mod export;
pub mod layout;
pub mod types;
pub mod ui;
pub mod view;

pub use config::{ConfigError, ViewerConfig};
pub use export::{ExportError, ExportOptions};
pub use types::{
    LoadError, MediaDescriptor, Message, MessageKind, RawFragment, RawMessage, RawText,
    Transcript, UNKNOWN_CHAT,
};
pub use view::{PageNav, ViewState};

/// Filter used when `RUST_LOG` is unset
/// cosmic_text logs every font fallback at info
pub const DEFAULT_LOG_FILTER: &str = "info,cosmic_text=warn";

/// Install env_logger and a panic hook that routes panics through `log`.
/// Safe to call more than once.
pub fn init_logging() {
    let initialized = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .format_timestamp_millis()
    .try_init()
    .is_ok();

    if initialized {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            log::error!("PANIC: {}", panic_info);
            default_hook(panic_info);
        }));
    }
}
