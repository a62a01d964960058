use crate::core::ics04_channel::channel::{Counterparty, State};
use crate::core::ics04_channel::events::SendPacket;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics04_channel::{context::ChannelReader, error::Error};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::handler::{HandlerOutput, HandlerResult};
use crate::prelude::*;
use crate::timestamp::Expiry;

#[derive(Clone, Debug)]
pub struct SendPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub seq_number: Sequence,
    pub packet: Packet,
}

/// Validates an outbound packet against the source channel end. The caller stores the result
/// through `ChannelKeeper::store_send_packet_result`.
pub fn send_packet(ctx: &impl ChannelReader, packet: Packet) -> HandlerResult<SendPacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    if source_channel_end.state_matches(&State::Closed) {
        return Err(Error::channel_closed(packet.source_channel));
    }

    let counterparty = Counterparty::new(
        packet.destination_port.clone(),
        Some(packet.destination_channel.clone()),
    );

    if !source_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.destination_port.clone(),
            packet.destination_channel,
        ));
    }

    if packet.data.is_empty() {
        return Err(Error::zero_packet_data());
    }

    if packet.has_no_timeout() {
        return Err(Error::missing_timeout());
    }

    let latest_height = ctx.counterparty_latest_height(&packet.source_port, &packet.source_channel);
    if !packet.timeout_height.is_zero() && packet.timeout_height <= latest_height {
        return Err(Error::low_packet_height(
            latest_height,
            packet.timeout_height,
        ));
    }

    let latest_timestamp =
        ctx.counterparty_latest_timestamp(&packet.source_port, &packet.source_channel);
    if let Expiry::Expired = latest_timestamp.check_expiry(&packet.timeout_timestamp) {
        return Err(Error::low_packet_timestamp(
            latest_timestamp,
            packet.timeout_timestamp,
        ));
    }

    let next_seq_send = ctx.get_next_sequence_send(&packet.source_port, &packet.source_channel)?;

    if packet.sequence != next_seq_send {
        return Err(Error::invalid_packet_sequence(
            packet.sequence,
            next_seq_send,
        ));
    }

    output.log("success: packet send");

    output.emit(SendPacket {
        packet: packet.clone(),
    });

    let result = SendPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel.clone(),
        seq: packet.sequence,
        seq_number: next_seq_send.increment(),
        packet,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::send_packet::send_packet;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_packet;
    use crate::core::ics04_channel::packet::Packet;
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::mock::context::MockContext;
    use crate::prelude::*;
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn send_packet_processing() {
        struct Test {
            name: String,
            packet: Packet,
            want_pass: bool,
        }

        let ctx = MockContext::default().with_channel(
            PortId::transfer(),
            ChannelId::new(0),
            PortId::transfer(),
            ChannelId::new(1),
            "ics20-1",
        );

        let good = get_dummy_packet(1, b"data".to_vec());

        let mut wrong_sequence = good.clone();
        wrong_sequence.sequence = 7.into();

        let mut no_timeout = good.clone();
        no_timeout.timeout_height = Height::zero();
        no_timeout.timeout_timestamp = Timestamp::none();

        let mut wrong_counterparty = good.clone();
        wrong_counterparty.destination_channel = ChannelId::new(9);

        let mut unknown_channel = good.clone();
        unknown_channel.source_channel = ChannelId::new(5);

        let mut empty_data = good.clone();
        empty_data.data = vec![];

        let tests: Vec<Test> = vec![
            Test {
                name: "Good parameters".to_string(),
                packet: good,
                want_pass: true,
            },
            Test {
                name: "Sequence mismatch".to_string(),
                packet: wrong_sequence,
                want_pass: false,
            },
            Test {
                name: "Missing timeout".to_string(),
                packet: no_timeout,
                want_pass: false,
            },
            Test {
                name: "Counterparty mismatch".to_string(),
                packet: wrong_counterparty,
                want_pass: false,
            },
            Test {
                name: "Unknown channel".to_string(),
                packet: unknown_channel,
                want_pass: false,
            },
            Test {
                name: "Empty data".to_string(),
                packet: empty_data,
                want_pass: false,
            },
        ]
        .into_iter()
        .collect();

        for test in tests {
            let res = send_packet(&ctx, test.packet.clone());
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "send_packet: test passed but was supposed to fail for test: {}, \nparams {:?}",
                        test.name,
                        test.packet.clone(),
                    );
                    assert_eq!(proto_output.events.len(), 1);
                    assert_eq!(proto_output.result.seq_number, 2.into());
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "send_packet: did not pass test: {}, \nparams {:?} error: {:?}",
                        test.name,
                        test.packet.clone(),
                        e,
                    );
                }
            }
        }
    }

    #[test]
    fn expired_timeout_height_is_rejected() {
        let ctx = MockContext::default()
            .with_channel(
                PortId::transfer(),
                ChannelId::new(0),
                PortId::transfer(),
                ChannelId::new(1),
                "ics20-1",
            )
            .with_counterparty_height(Height::new(0, 10));

        let packet = get_dummy_packet(1, b"data".to_vec());
        let err = send_packet(&ctx, packet).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::LowPacketHeight(_)));
    }
}
