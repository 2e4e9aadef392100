//! Low-level helpers shared by the codecs.

pub mod bit_pack;
pub mod varint;
