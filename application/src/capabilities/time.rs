//! `get_current_utc_time`

use crate::ports::capability::{Capability, CapabilityError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orchestra_domain::{BoundArguments, CapabilityDescriptor};
use tokio_util::sync::CancellationToken;

pub const NAME: &str = "get_current_utc_time";

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Returns the current UTC time as an RFC 1123 string,
/// e.g. `Wed, 01 Jan 2025 00:00:00 GMT`.
pub struct GetCurrentUtcTime {
    descriptor: CapabilityDescriptor,
    clock: Clock,
}

impl GetCurrentUtcTime {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(NAME, "Retrieves the current time in UTC"),
            clock: Box::new(clock),
        }
    }
}

impl Default for GetCurrentUtcTime {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn format_rfc1123(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[async_trait]
impl Capability for GetCurrentUtcTime {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(
        &self,
        _args: &BoundArguments,
        cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError> {
        if cancellation.is_cancelled() {
            return Err(CapabilityError::Cancelled);
        }
        Ok(format_rfc1123((self.clock)()))
    }
}
