use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The Provider could not be reached.
    #[error("transport error calling {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status or a body that does not decode as an envelope.
    #[error("protocol error calling {operation}: {message}")]
    Protocol {
        operation: &'static str,
        message: String,
    },

    /// The envelope decoded but carries status ERROR.
    #[error("provider rejected {operation}: {code}: {message}")]
    Provider {
        operation: &'static str,
        code: String,
        message: String,
    },

    #[error("{0}")]
    MarketplaceNotConfigured(String),

    #[error("pagination for {marketplace} exceeded {max_pages} pages")]
    PageLimitExceeded { marketplace: String, max_pages: usize },

    #[error("sync queue is closed")]
    QueueClosed,
}

impl SyncError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, SyncError::MarketplaceNotConfigured(_))
    }
}
