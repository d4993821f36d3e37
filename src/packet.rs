//! Packet serial frame encoding and reply decoding.
//!
//! Outbound frames look like
//!
//! ```text
//! [address, command, value, checksum, payload..., payload checksum]
//! ```
//!
//! where both checksums are 7-bit additive sums and the trailing payload
//! checksum is omitted when the payload is empty. Replies are fixed 9-byte
//! frames with the same layout and a command byte of [`CMD_REPLY`].

use crate::types::{
    CMD_GET, CMD_REPLY, CMD_SET, Packet, REPLY_LEN, ReplyCheck, Result, SabertoothError,
};

/// Checksum of the three header bytes
pub fn header_checksum(address: u8, command: u8, value: u8) -> u8 {
    address.wrapping_add(command).wrapping_add(value) & 0x7F
}

/// Checksum of a payload
pub fn payload_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)) & 0x7F
}

/// Build a complete frame around `payload`.
pub fn make_frame(address: u8, command: u8, value: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(frame_len(payload.len()));
    frame.extend_from_slice(&[address, command, value, header_checksum(address, command, value)]);
    if !payload.is_empty() {
        frame.extend_from_slice(payload);
        frame.push(payload_checksum(payload));
    }
    frame
}

/// Length of a frame carrying `payload_len` payload bytes
pub fn frame_len(payload_len: usize) -> usize {
    match payload_len {
        0 => 4,
        n => 4 + n + 1,
    }
}

/// Build a SET frame.
///
/// A negative `value` is sent as its magnitude with `set_type + 1` as the
/// sub-opcode. The magnitude is split into two 7-bit groups, low group first;
/// bits above 13 are dropped, so callers must keep `|value| <= 16383`.
pub fn set_frame(
    address: u8,
    set_type: u8,
    target_type: u8,
    target_number: u8,
    value: i16,
) -> Vec<u8> {
    let (opcode, magnitude) = if value < 0 {
        (set_type.wrapping_add(1), value.unsigned_abs())
    } else {
        (set_type, value as u16)
    };
    let payload = [
        (magnitude & 0x7F) as u8,
        ((magnitude >> 7) & 0x7F) as u8,
        target_type,
        target_number,
    ];
    make_frame(address, CMD_SET, opcode, &payload)
}

/// Build a GET frame querying `source_type`/`source_number`.
pub fn get_frame(address: u8, get_type: u8, source_type: u8, source_number: u8) -> Vec<u8> {
    make_frame(address, CMD_GET, get_type, &[source_type, source_number])
}

/// Decode a reply frame, checking only the reply marker.
pub fn decode_reply(data: &[u8; REPLY_LEN]) -> Result<Packet> {
    decode_reply_checked(data, ReplyCheck::Lenient)
}

/// Decode a reply frame with the given level of verification.
pub fn decode_reply_checked(data: &[u8; REPLY_LEN], check: ReplyCheck) -> Result<Packet> {
    if data[1] != CMD_REPLY {
        return Err(SabertoothError::Protocol("unexpected command type".into()));
    }

    if check == ReplyCheck::Strict
        && (data[3] != header_checksum(data[0], data[1], data[2])
            || data[8] != payload_checksum(&data[4..8]))
    {
        return Err(SabertoothError::Protocol("reply checksum mismatch".into()));
    }

    let mut target = data[2];
    let mut value = (data[4] as i16).wrapping_add((data[5] as i16) << 7);
    if target & 1 == 1 {
        value = value.wrapping_neg();
        target -= 1;
    }

    Ok(Packet {
        address: data[0],
        target,
        value,
        target_type: data[6],
        number: data[7],
    })
}
