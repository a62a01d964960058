//! The packet callbacks the channel layer invokes on the transfer application.
//!
//! Callbacks return `Err` only for fatal errors, which must halt the host. Ordinary failures of
//! an inbound packet are turned into an error acknowledgement. When the returned
//! acknowledgement is an error, the host must discard the state written by the callback.

use tracing::{error, warn};

use crate::applications::transfer::acknowledgement::TokenTransferAcknowledgement;
use crate::applications::transfer::context::TokenTransferContext;
use crate::applications::transfer::error::Error;
use crate::applications::transfer::events::{AckEvent, AckStatusEvent, RecvEvent, TimeoutEvent};
use crate::applications::transfer::packet::{decode_packet_data, PacketDataV2};
use crate::applications::transfer::relay::forwarding::{
    forward_packet, handle_forwarded_packet_acknowledgement, handle_forwarded_packet_timeout,
};
use crate::applications::transfer::relay::on_ack_packet::process_ack_packet;
use crate::applications::transfer::relay::on_recv_packet::process_recv_packet;
use crate::applications::transfer::relay::on_timeout_packet::process_timeout_packet;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement as GenericAcknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::handler::ModuleOutputBuilder;
use crate::prelude::*;

fn decode_channel_packet_data(
    ctx: &impl TokenTransferContext,
    port_id: &PortId,
    channel_id: &ChannelId,
    packet: &Packet,
) -> Result<PacketDataV2, Error> {
    let channel_end = ctx
        .channel_end(port_id, channel_id)
        .map_err(Error::ics04_channel)?;
    decode_packet_data(channel_end.version(), &packet.data)
}

fn halt_if_fatal(err: Error) -> Result<TokenTransferAcknowledgement, Error> {
    if err.is_fatal() {
        error!("{}", err);
        Err(err)
    } else {
        warn!("rejecting packet: {}", err);
        Ok(TokenTransferAcknowledgement::from_error(err))
    }
}

/// Processes a received packet.
///
/// Returns the acknowledgement to write, or `None` if the funds were forwarded: the
/// acknowledgement is then written once the forwarded packet is settled.
pub fn on_recv_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
) -> Result<Option<TokenTransferAcknowledgement>, Error> {
    let data = match decode_channel_packet_data(
        ctx,
        &packet.destination_port,
        &packet.destination_channel,
        packet,
    ) {
        Ok(data) => data,
        Err(e) => return halt_if_fatal(e).map(Some),
    };

    let result = match process_recv_packet(ctx, output, packet, &data) {
        Ok(received_coins) if data.has_forwarding() => {
            forward_packet(ctx, output, packet, &data, received_coins).map(|_| None)
        }
        Ok(_) => Ok(Some(TokenTransferAcknowledgement::success())),
        Err(e) => Err(e),
    };

    let ack = match result {
        Ok(ack) => ack,
        Err(e) => Some(halt_if_fatal(e)?),
    };

    let recv_event = RecvEvent {
        sender: data.sender,
        receiver: data.receiver,
        tokens: data.tokens,
        memo: data.memo,
        forwarding_hops: data.forwarding.hops,
        success: ack.as_ref().map_or(true, |ack| ack.is_successful()),
        error: match &ack {
            Some(TokenTransferAcknowledgement::Error(err)) => Some(err.clone()),
            _ => None,
        },
    };
    output.emit(recv_event);

    Ok(ack)
}

/// Processes the acknowledgement of a packet sent by this chain, refunding the sender if the
/// counterparty rejected it.
pub fn on_acknowledgement_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
    acknowledgement: &GenericAcknowledgement,
) -> Result<(), Error> {
    let data = decode_channel_packet_data(ctx, &packet.source_port, &packet.source_channel, packet)?;

    let acknowledgement = TokenTransferAcknowledgement::try_from(acknowledgement)?;

    process_ack_packet(ctx, packet, &data, &acknowledgement).map_err(log_fatal)?;

    if let Some(forwarded_packet) =
        ctx.get_forwarded_packet(&packet.source_port, &packet.source_channel, packet.sequence)
    {
        handle_forwarded_packet_acknowledgement(
            ctx,
            output,
            packet,
            &forwarded_packet,
            &data,
            &acknowledgement,
        )?;
    }

    let ack_event = AckEvent {
        sender: data.sender,
        receiver: data.receiver,
        tokens: data.tokens,
        memo: data.memo,
        forwarding_hops: data.forwarding.hops,
        acknowledgement: acknowledgement.clone(),
    };
    output.emit(ack_event);
    output.emit(AckStatusEvent { acknowledgement });

    Ok(())
}

/// Processes the timeout of a packet sent by this chain, refunding the sender.
pub fn on_timeout_packet<Ctx: TokenTransferContext>(
    ctx: &mut Ctx,
    output: &mut ModuleOutputBuilder,
    packet: &Packet,
) -> Result<(), Error> {
    let data = decode_channel_packet_data(ctx, &packet.source_port, &packet.source_channel, packet)?;

    process_timeout_packet(ctx, packet, &data).map_err(log_fatal)?;

    if let Some(forwarded_packet) =
        ctx.get_forwarded_packet(&packet.source_port, &packet.source_channel, packet.sequence)
    {
        handle_forwarded_packet_timeout(ctx, output, packet, &forwarded_packet, &data)?;
    }

    let timeout_event = TimeoutEvent {
        refund_receiver: data.sender,
        refund_tokens: data.tokens,
        memo: data.memo,
        forwarding_hops: data.forwarding.hops,
    };
    output.emit(timeout_event);

    Ok(())
}

fn log_fatal(err: Error) -> Error {
    if err.is_fatal() {
        error!("{}", err);
    }
    err
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::applications::transfer::amount::Amount;
    use crate::applications::transfer::coin::Coin;
    use crate::applications::transfer::context::TokenTransferReader;
    use crate::applications::transfer::denom::Denom;
    use crate::applications::transfer::error::ErrorDetail;
    use crate::applications::transfer::packet::{create_packet_data_bytes, ForwardingPacketData};
    use crate::applications::transfer::params::Params;
    use crate::applications::transfer::token::Token;
    use crate::applications::transfer::{V1, V2};
    use crate::core::ics04_channel::packet::test_utils::get_dummy_packet;
    use crate::core::ics04_channel::Version;
    use crate::mock::context::MockContext;
    use crate::signer::Signer;

    fn sender() -> Signer {
        Signer::new("cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng")
    }

    fn receiver() -> Signer {
        Signer::new("cosmos1x54ltnyg88k0ejmk8ytwrhd3ltm84xehrnlslf")
    }

    /// The receiving end of the dummy packet, transfer/channel-1.
    fn receiving_chain(version: &str) -> MockContext {
        MockContext::default().with_channel(
            PortId::transfer(),
            ChannelId::new(1),
            PortId::transfer(),
            ChannelId::new(0),
            version,
        )
    }

    /// The sending end of the dummy packet, transfer/channel-0.
    fn sending_chain(version: &str) -> MockContext {
        MockContext::default().with_channel(
            PortId::transfer(),
            ChannelId::new(0),
            PortId::transfer(),
            ChannelId::new(1),
            version,
        )
    }

    fn packet(version: &str, tokens: &[Token]) -> Packet {
        let data = create_packet_data_bytes(
            &Version::new(version),
            &sender(),
            &receiver(),
            "",
            tokens,
            &[],
        )
        .unwrap();
        get_dummy_packet(1, data)
    }

    #[test]
    fn recv_writes_success_ack() {
        let mut ctx = receiving_chain(V1);
        let mut output = ModuleOutputBuilder::new();
        let packet = packet(V1, &[Token::new(Denom::native("uatom"), "10")]);

        let ack = on_recv_packet(&mut ctx, &mut output, &packet).unwrap();
        assert_eq!(ack, Some(TokenTransferAcknowledgement::success()));

        let voucher = Denom::from_path("transfer/channel-1/uatom").ibc_denom();
        assert_eq!(ctx.balance(&receiver(), &voucher), Amount::from(10u64));

        let recv_event = output.events().last().unwrap();
        assert_eq!(recv_event.kind, "fungible_token_packet");
        assert_eq!(recv_event.attribute("success"), Some("true"));
    }

    #[test]
    fn recv_rejections_become_error_acks() {
        struct Test {
            name: &'static str,
            ctx: MockContext,
            packet: Packet,
        }

        let tokens = [Token::new(Denom::native("uatom"), "10")];

        let tests = vec![
            Test {
                name: "receives disabled",
                ctx: receiving_chain(V2).with_params(Params::new(true, false)),
                packet: packet(V2, &tokens),
            },
            Test {
                name: "version mismatch",
                ctx: receiving_chain(V1),
                packet: packet(V2, &tokens),
            },
            Test {
                name: "garbage data",
                ctx: receiving_chain(V2),
                packet: get_dummy_packet(1, b"garbage".to_vec()),
            },
            Test {
                name: "unknown channel",
                ctx: MockContext::default(),
                packet: packet(V2, &tokens),
            },
        ];

        for test in tests {
            let mut ctx = test.ctx;
            let mut output = ModuleOutputBuilder::new();
            let ack = on_recv_packet(&mut ctx, &mut output, &test.packet)
                .unwrap()
                .unwrap();
            assert!(!ack.is_successful(), "{}", test.name);
        }
    }

    #[test]
    fn recv_halts_on_fatal_errors() {
        // claims to return uatom that was never escrowed here
        let mut ctx = receiving_chain(V2);
        let packet = packet(V2, &[Token::new(Denom::from_path("transfer/channel-0/uatom"), "10")]);

        let err = on_recv_packet(&mut ctx, &mut ModuleOutputBuilder::new(), &packet).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn error_ack_refunds() {
        let tokens = [Token::new(Denom::native("uatom"), "10")];
        let packet = packet(V2, &tokens);

        // the sender escrowed 10uatom when sending
        let mut ctx = sending_chain(V2).with_balance(&sender(), Coin::new("uatom", 10u64));
        let escrow = ctx
            .get_channel_escrow_address(&PortId::transfer(), &ChannelId::new(0))
            .unwrap();
        crate::applications::transfer::relay::escrow_coin(
            &mut ctx,
            &sender(),
            &escrow,
            &Coin::new("uatom", 10u64),
        )
        .unwrap();

        let success = GenericAcknowledgement::from(TokenTransferAcknowledgement::success());
        let mut output = ModuleOutputBuilder::new();
        on_acknowledgement_packet(&mut ctx, &mut output, &packet, &success).unwrap();
        assert!(ctx.balance(&sender(), "uatom").is_zero());
        assert_eq!(
            output.events().last().unwrap().attribute("success"),
            Some("AQ==")
        );

        let error = GenericAcknowledgement::from(TokenTransferAcknowledgement::from_error(
            Error::receive_disabled(),
        ));
        let mut output = ModuleOutputBuilder::new();
        on_acknowledgement_packet(&mut ctx, &mut output, &packet, &error).unwrap();
        assert_eq!(ctx.balance(&sender(), "uatom"), Amount::from(10u64));
        assert!(ctx.get_total_escrow_for_denom("uatom").is_zero());
        assert!(output.events().last().unwrap().attribute("error").is_some());
    }

    #[test]
    fn timeout_refunds_burnt_vouchers_by_minting() {
        // a voucher that arrived over channel-0 was burned when sent back over it
        let voucher = Denom::from_path("transfer/channel-0/uosmo");
        let packet = packet(V1, &[Token::new(voucher.clone(), "10")]);
        let mut ctx = sending_chain(V1);

        let mut output = ModuleOutputBuilder::new();
        on_timeout_packet(&mut ctx, &mut output, &packet).unwrap();

        assert_eq!(
            ctx.balance(&sender(), &voucher.ibc_denom()),
            Amount::from(10u64)
        );
        assert_eq!(ctx.supply(&voucher.ibc_denom()), Amount::from(10u64));
        assert_eq!(output.events().last().unwrap().kind, "timeout");
    }

    #[test]
    fn refund_to_blocked_sender_fails() {
        let packet = packet(V1, &[Token::new(Denom::native("uatom"), "10")]);
        let mut ctx = sending_chain(V1).with_blocked_account(&sender());

        let err = on_timeout_packet(&mut ctx, &mut ModuleOutputBuilder::new(), &packet).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnauthorizedReceive(_)));
    }

    #[test]
    fn malformed_ack_is_rejected() {
        let packet = packet(V1, &[Token::new(Denom::native("uatom"), "10")]);
        let mut ctx = sending_chain(V1);
        let ack = GenericAcknowledgement::try_from(b"\x01".to_vec()).unwrap();

        let err = on_acknowledgement_packet(&mut ctx, &mut ModuleOutputBuilder::new(), &packet, &ack)
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::AckDeserialization(_)));
    }

    #[test]
    fn forwarding_defers_the_ack() {
        let hop = crate::applications::transfer::Hop::new(PortId::transfer(), ChannelId::new(2));
        let data = PacketDataV2 {
            tokens: vec![Token::new(Denom::native("uatom"), "10")],
            sender: sender(),
            receiver: receiver(),
            memo: String::new(),
            forwarding: ForwardingPacketData::new("", vec![hop]),
        };
        let packet = Packet {
            timeout_timestamp: crate::timestamp::Timestamp::from_nanoseconds(1_000),
            ..get_dummy_packet(1, serde_json::to_vec(&data).unwrap())
        };

        let mut ctx = receiving_chain(V2).with_channel(
            PortId::transfer(),
            ChannelId::new(2),
            PortId::transfer(),
            ChannelId::new(9),
            V2,
        );
        let ack = on_recv_packet(&mut ctx, &mut ModuleOutputBuilder::new(), &packet).unwrap();
        assert_eq!(ack, None);

        let forwarded = ctx
            .get_forwarded_packet(&PortId::transfer(), &ChannelId::new(2), 1u64.into())
            .unwrap();
        assert_eq!(forwarded, packet);

        let outbound = ctx
            .sent_packet(&PortId::transfer(), &ChannelId::new(2), 1u64.into())
            .unwrap();
        let outbound_data = decode_packet_data(&Version::new(V2), &outbound.data).unwrap();
        assert_eq!(outbound_data.receiver, receiver());
        assert_eq!(
            outbound_data.tokens[0].denom,
            Denom::from_path("transfer/channel-1/uatom")
        );
        assert_eq!(outbound.timeout_timestamp, packet.timeout_timestamp);

        // the voucher went on: escrowed by the module account on the outbound channel
        let voucher = Denom::from_path("transfer/channel-1/uatom").ibc_denom();
        let escrow = ctx
            .get_channel_escrow_address(&PortId::transfer(), &ChannelId::new(2))
            .unwrap();
        assert_eq!(ctx.balance(&escrow, &voucher), Amount::from(10u64));
        assert!(ctx.balance(&ctx.get_module_account(), &voucher).is_zero());
    }
}
