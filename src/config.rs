use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use crate::apps::{AppId, SizeTable};
use crate::layout::CellScale;
use crate::locale::Locale;

/// Startup settings for a desktop session. The binary builds this from
/// its command line; tests use `Default`.
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub locale: Locale,
    /// Applications opened, in order, before the first frame.
    pub open: Vec<AppId>,
    pub scale: CellScale,
    pub sizes: SizeTable,
    /// Poll interval of the event loop, which is also the frame tick.
    pub tick: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            open: Vec::new(),
            scale: CellScale::default(),
            sizes: SizeTable::default(),
            tick: Duration::from_millis(16),
            log_file: None,
            log_level: Level::INFO,
        }
    }
}
