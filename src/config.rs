//! Construction-time configuration.

use crate::tick::Tick;

/// Timeout budget used when none is configured, in timer ticks.
pub const DEFAULT_TIMEOUT: u16 = 50;

/// Optional protocol features.
///
/// Both peers of a link must agree on these.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Capabilities {
    /// Stamp outgoing frames with a sequence id and drop received repeats.
    pub id_filtering: bool,
    /// Request a resend after receive errors and honor the peer's requests.
    pub resend: bool,
}

impl Capabilities {
    /// Neither id filtering nor resends.
    pub const NONE: Self = Self {
        id_filtering: false,
        resend: false,
    };

    /// Both id filtering and resends.
    pub const ALL: Self = Self {
        id_filtering: true,
        resend: true,
    };
}

/// Configuration of a [`Transceiver`](crate::Transceiver).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config<T> {
    capabilities: Capabilities,
    timeout: T,
}

impl<T> Config<T>
where
    T: Tick,
{
    /// Creates a configuration.
    #[must_use]
    pub const fn new(capabilities: Capabilities, timeout: T) -> Self {
        Self {
            capabilities,
            timeout,
        }
    }

    /// Returns the enabled capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Returns the timeout budget in timer ticks.
    #[must_use]
    pub const fn timeout(&self) -> T {
        self.timeout
    }

    /// Enables or disables sequence id filtering.
    #[must_use]
    pub fn with_id_filtering(mut self, enabled: bool) -> Self {
        self.capabilities.id_filtering = enabled;
        self
    }

    /// Enables or disables the resend protocol.
    #[must_use]
    pub fn with_resend(mut self, enabled: bool) -> Self {
        self.capabilities.resend = enabled;
        self
    }

    /// Sets the timeout budget in timer ticks.
    #[must_use]
    pub fn with_timeout(mut self, timeout: T) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn set_timeout(&mut self, timeout: T) {
        self.timeout = timeout;
    }
}

impl<T> Default for Config<T>
where
    T: Tick,
{
    fn default() -> Self {
        Self::new(Capabilities::NONE, T::from(DEFAULT_TIMEOUT))
    }
}
