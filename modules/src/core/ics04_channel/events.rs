//! Events the channel layer emits on behalf of applications.

use crate::events::ModuleEvent;
use crate::prelude::*;

use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::Packet;

pub const CHANNEL_MODULE_NAME: &str = "ibc_channel";

pub const SEND_PACKET_EVENT: &str = "send_packet";
pub const WRITE_ACK_EVENT: &str = "write_acknowledgement";

const PKT_SEQ_ATTRIBUTE_KEY: &str = "packet_sequence";
const PKT_DATA_ATTRIBUTE_KEY: &str = "packet_data";
const PKT_SRC_PORT_ATTRIBUTE_KEY: &str = "packet_src_port";
const PKT_SRC_CHANNEL_ATTRIBUTE_KEY: &str = "packet_src_channel";
const PKT_DST_PORT_ATTRIBUTE_KEY: &str = "packet_dst_port";
const PKT_DST_CHANNEL_ATTRIBUTE_KEY: &str = "packet_dst_channel";
const PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY: &str = "packet_timeout_height";
const PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "packet_timeout_timestamp";
const PKT_ACK_ATTRIBUTE_KEY: &str = "packet_ack";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendPacket {
    pub packet: Packet,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    pub packet: Packet,
    pub ack: Acknowledgement,
}

fn packet_event(kind: &str, packet: &Packet) -> ModuleEvent {
    ModuleEvent::new(kind, CHANNEL_MODULE_NAME)
        .with_attribute((PKT_SEQ_ATTRIBUTE_KEY, packet.sequence))
        .with_attribute((
            PKT_DATA_ATTRIBUTE_KEY,
            String::from_utf8_lossy(&packet.data),
        ))
        .with_attribute((PKT_SRC_PORT_ATTRIBUTE_KEY, &packet.source_port))
        .with_attribute((PKT_SRC_CHANNEL_ATTRIBUTE_KEY, &packet.source_channel))
        .with_attribute((PKT_DST_PORT_ATTRIBUTE_KEY, &packet.destination_port))
        .with_attribute((PKT_DST_CHANNEL_ATTRIBUTE_KEY, &packet.destination_channel))
        .with_attribute((PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY, packet.timeout_height))
        .with_attribute((
            PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
            packet.timeout_timestamp.nanoseconds(),
        ))
}

impl From<SendPacket> for ModuleEvent {
    fn from(ev: SendPacket) -> Self {
        packet_event(SEND_PACKET_EVENT, &ev.packet)
    }
}

impl From<WriteAcknowledgement> for ModuleEvent {
    fn from(ev: WriteAcknowledgement) -> Self {
        packet_event(WRITE_ACK_EVENT, &ev.packet).with_attribute((
            PKT_ACK_ATTRIBUTE_KEY,
            String::from_utf8_lossy(ev.ack.as_bytes()),
        ))
    }
}
