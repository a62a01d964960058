//! A minimal relayer moving packets and acknowledgements between mock chains.
//!
//! Proofs and light clients are out of the picture: a packet committed on one `MockContext` is
//! handed as is to the transfer callbacks of another one.

use tracing::debug;

use crate::applications::transfer::error::Error;
use crate::applications::transfer::module::{
    on_acknowledgement_packet, on_recv_packet, on_timeout_packet,
};
use crate::applications::transfer::msgs::transfer::MsgTransfer;
use crate::applications::transfer::relay::send_transfer::send_transfer;
use crate::core::ics04_channel::context::ChannelKeeper;
use crate::core::ics04_channel::handler::write_acknowledgement;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::handler::{HandlerOutputBuilder, ModuleOutputBuilder};
use crate::mock::context::MockContext;
use crate::prelude::*;

/// Submits `msg` to `ctx` and returns the packet it committed.
pub fn transfer(ctx: &mut MockContext, msg: MsgTransfer) -> Result<Packet, Error> {
    let before = ctx.clone();
    let mut output = HandlerOutputBuilder::new();
    let sequence = send_transfer(ctx, &mut output, msg)?;

    // an unwinding transfer may leave over another channel than the one in the message
    ctx.sent_packets()
        .find(|packet| {
            packet.sequence == sequence
                && before
                    .sent_packet(&packet.source_port, &packet.source_channel, sequence)
                    .is_none()
        })
        .cloned()
        .ok_or_else(|| Error::invalid_request(format!("no packet sent with sequence {}", sequence)))
}

/// Delivers `packet` to the chain at its destination.
///
/// Returns the acknowledgement written by the destination, or `None` if the funds were forwarded
/// and the acknowledgement is pending. An error acknowledgement discards every write of the
/// callback, as a host chain does.
pub fn deliver_packet(dst: &mut MockContext, packet: &Packet) -> Result<Option<Acknowledgement>, Error> {
    let snapshot = dst.clone();
    let mut output = ModuleOutputBuilder::new();

    let ack = match on_recv_packet(dst, &mut output, packet)? {
        Some(ack) => ack,
        None => {
            debug!(sequence = %packet.sequence, "acknowledgement deferred");
            return Ok(None);
        }
    };

    if !ack.is_successful() {
        *dst = snapshot;
    }

    let ack = Acknowledgement::from(ack);
    let result = write_acknowledgement::process(dst, packet.clone(), ack.clone())
        .map_err(Error::ics04_channel)?
        .result;
    dst.store_write_ack_result(result)
        .map_err(Error::ics04_channel)?;

    Ok(Some(ack))
}

/// Delivers the acknowledgement of `packet` back to the chain that sent it.
pub fn deliver_acknowledgement(
    src: &mut MockContext,
    packet: &Packet,
    ack: &Acknowledgement,
) -> Result<(), Error> {
    on_acknowledgement_packet(src, &mut ModuleOutputBuilder::new(), packet, ack)
}

/// Tells the chain that sent `packet` that it timed out.
pub fn deliver_timeout(src: &mut MockContext, packet: &Packet) -> Result<(), Error> {
    on_timeout_packet(src, &mut ModuleOutputBuilder::new(), packet)
}

/// Delivers `packet` from `src` to `dst` and, unless the destination deferred it, the
/// acknowledgement back to `src`.
pub fn relay(
    src: &mut MockContext,
    dst: &mut MockContext,
    packet: &Packet,
) -> Result<Option<Acknowledgement>, Error> {
    let ack = deliver_packet(dst, packet)?;
    if let Some(ack) = &ack {
        deliver_acknowledgement(src, packet, ack)?;
    }
    Ok(ack)
}
