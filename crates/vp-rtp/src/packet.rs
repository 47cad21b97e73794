//! An RTP packet: fixed header plus payload bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::header::RtpHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpPacket {
    pub header: RtpHeader,
    pub payload: Bytes,
}

impl RtpPacket {
    pub fn new(header: RtpHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    pub fn serialize(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.header.size() + self.payload.len());
        self.header.serialize(&mut buf);
        buf.put_slice(&self.payload);
        buf
    }

    pub fn parse(mut data: Bytes) -> Result<Self> {
        let header = RtpHeader::parse(&mut data)?;
        Ok(Self { header, payload: data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_with_payload() {
        let header = RtpHeader::new(96, 42, 1920, 0x1122_3344);
        let payload = Bytes::from_static(&[1, 2, 3, 4, 5]);
        let packet = RtpPacket::new(header, payload);
        let serialized = packet.serialize().freeze();
        let parsed = RtpPacket::parse(serialized).unwrap();
        assert_eq!(parsed, packet);
    }
}
