use crate::preview_pipeline::common::error::Result;
use crate::preview_pipeline::payload::EncodedPayload;

/// Receiver of pushed payloads. Fire-and-forget: implementations must not
/// block for long, the push thread waits on them.
pub trait Subscriber: Send + Sync {
    fn emit(&self, payload: &[u8], format: &str);
}

/// Produces the payload for whatever frame is the latest at call time.
pub trait PayloadSource: Send + Sync {
    fn render_latest(&self) -> Result<EncodedPayload>;
}
