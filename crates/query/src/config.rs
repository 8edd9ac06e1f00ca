//! Query-side configuration loaded from environment variables.

/// Pagination limits with sensible defaults.
///
/// Reads from environment variables:
/// - `LEDGER_DEFAULT_PAGE_SIZE`: page size when the caller does not pick one
///   (default: `10`)
/// - `LEDGER_MAX_PAGE_SIZE`: hard cap on requested page sizes (default:
///   `100`)
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl QueryConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_page_size: std::env::var("LEDGER_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_page_size),
            max_page_size: std::env::var("LEDGER_MAX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_page_size),
        }
    }

    /// Clamps a requested page size to the configured bounds; zero falls back
    /// to the default.
    pub fn clamp_size(&self, size: usize) -> usize {
        if size == 0 {
            self.default_page_size
        } else {
            size.min(self.max_page_size)
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
