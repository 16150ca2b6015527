use micro_cgi_message::codec::Limits;

/// Size of the chunks the request body is read in.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Settings of a [`Gateway`](crate::Gateway).
///
/// ```
/// use micro_cgi_gateway::GatewayConfig;
/// use micro_cgi_message::codec::Limits;
///
/// let config = GatewayConfig::default()
///     .with_limits(Limits::default().with_max_body_bytes(64 * 1024))
///     .with_read_buffer_size(4096);
///
/// assert_eq!(config.limits().max_body_bytes(), 64 * 1024);
/// assert_eq!(config.read_buffer_size(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    limits: Limits,
    read_buffer_size: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { limits: Limits::default(), read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }
}

impl GatewayConfig {
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Zero is bumped to one byte.
    #[must_use]
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size.max(1);
        self
    }
}
