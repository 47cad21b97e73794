//! RTP fixed header, RFC 3550 §5.1.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, RtpError};

/// Minimum size of the fixed RTP header (no CSRCs, no extension).
pub const FIXED_HEADER_SIZE: usize = 12;

/// The fixed 12-byte RTP header plus optional CSRC list and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeader {
    pub version: u8,
    pub padding: bool,
    pub extension: bool,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
    pub csrc: Vec<u32>,
    /// Raw `(profile, data)` of a single RTP header extension (RFC 3550 §5.3.1).
    pub extension_data: Option<(u16, Vec<u8>)>,
}

impl RtpHeader {
    pub fn new(payload_type: u8, sequence_number: u16, timestamp: u32, ssrc: u32) -> Self {
        Self {
            version: 2,
            padding: false,
            extension: false,
            marker: false,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
            csrc: Vec::new(),
            extension_data: None,
        }
    }

    /// Total serialized size in bytes.
    pub fn size(&self) -> usize {
        FIXED_HEADER_SIZE
            + self.csrc.len() * 4
            + self
                .extension_data
                .as_ref()
                .map(|(_, data)| 4 + data.len().div_ceil(4) * 4)
                .unwrap_or(0)
    }

    pub fn serialize_to_vec(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.size());
        self.serialize(&mut buf);
        buf.to_vec()
    }

    pub fn serialize(&self, buf: &mut BytesMut) {
        let mut b0 = (self.version & 0x3) << 6;
        if self.padding {
            b0 |= 0x20;
        }
        if self.extension {
            b0 |= 0x10;
        }
        b0 |= (self.csrc.len() as u8) & 0x0F;
        buf.put_u8(b0);

        let mut b1 = self.payload_type & 0x7F;
        if self.marker {
            b1 |= 0x80;
        }
        buf.put_u8(b1);

        buf.put_u16(self.sequence_number);
        buf.put_u32(self.timestamp);
        buf.put_u32(self.ssrc);

        for csrc in &self.csrc {
            buf.put_u32(*csrc);
        }

        if let Some((profile, data)) = &self.extension_data {
            buf.put_u16(*profile);
            let words = data.len().div_ceil(4);
            buf.put_u16(words as u16);
            buf.put_slice(data);
            for _ in 0..(words * 4 - data.len()) {
                buf.put_u8(0);
            }
        }
    }

    pub fn parse(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < FIXED_HEADER_SIZE {
            return Err(RtpError::BufferTooSmall { needed: FIXED_HEADER_SIZE, available: buf.remaining() });
        }

        let b0 = buf.get_u8();
        let version = (b0 >> 6) & 0x3;
        if version != 2 {
            return Err(RtpError::UnsupportedVersion(version));
        }
        let padding = b0 & 0x20 != 0;
        let extension = b0 & 0x10 != 0;
        let csrc_count = (b0 & 0x0F) as usize;

        let b1 = buf.get_u8();
        let marker = b1 & 0x80 != 0;
        let payload_type = b1 & 0x7F;

        let sequence_number = buf.get_u16();
        let timestamp = buf.get_u32();
        let ssrc = buf.get_u32();

        if buf.remaining() < csrc_count * 4 {
            return Err(RtpError::MalformedHeader(format!(
                "truncated CSRC list: need {} bytes, have {}",
                csrc_count * 4,
                buf.remaining()
            )));
        }
        let mut csrc = Vec::with_capacity(csrc_count);
        for _ in 0..csrc_count {
            csrc.push(buf.get_u32());
        }

        let extension_data = if extension {
            if buf.remaining() < 4 {
                return Err(RtpError::MalformedHeader("truncated extension header".into()));
            }
            let profile = buf.get_u16();
            let words = buf.get_u16() as usize;
            if buf.remaining() < words * 4 {
                return Err(RtpError::MalformedHeader(format!(
                    "truncated extension data: need {} bytes, have {}",
                    words * 4,
                    buf.remaining()
                )));
            }
            let mut data = vec![0u8; words * 4];
            buf.copy_to_slice(&mut data);
            Some((profile, data))
        } else {
            None
        };

        Ok(Self {
            version,
            padding,
            extension,
            marker,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
            csrc,
            extension_data,
        })
    }
}
