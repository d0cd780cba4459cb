use as_any::AsAny;

use r2k_core::CallRef;
use r2k_frames::enums::release_cause::ReleaseCause;

/// Telephony side of the stack, called by the channel pool.
///
/// The opposite direction, network to radio, is served by the `call_*` methods
/// of [`super::pool::ChannelPool`].
pub trait CallControlUp: Send + AsAny {
    /// Offer an outgoing call from `subscriber` to the network. Returns the call reference
    /// that identifies it from now on, or the cause why it cannot be placed.
    fn setup(&mut self, subscriber: &str, dialed: &str) -> Result<CallRef, ReleaseCause>;

    /// The paged handset is ringing
    fn alerting(&mut self, callref: CallRef);

    /// The paged handset answered
    fn answer(&mut self, callref: CallRef);

    fn release(&mut self, callref: CallRef, cause: ReleaseCause);

    /// Audio received from the handset during a connected call
    fn audio(&mut self, _callref: CallRef, _samples: &[i16]) {}
}
