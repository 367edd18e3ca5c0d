//! Header-at-a-time decoding and encoding: reads or writes exactly one
//! initial byte plus its trailing argument bytes, without looking at
//! whatever payload follows. [`crate::codec::tree`] calls this once per
//! item while walking the input.

use crate::buffer::{Endian, InputBuffer, OutputBuffer};
use crate::error::ErrorKind;
use crate::wire::{ArgForm, InitByte, MajorType};

/// One decoded initial byte: its major type, its argument value (already
/// widened to `u64` regardless of how many trailing bytes it took), and the
/// form that argument was actually encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeader {
    pub major: MajorType,
    pub argument: u64,
    pub arg_form: ArgForm,
}

/// Decode one header, accepting any of the four argument forms (minimal or
/// not). Used for general-purpose decoding, where tolerating a non-minimal
/// encoding costs nothing and over-long forms are at worst wasteful, never
/// ambiguous.
pub fn decode_header(input: &mut impl InputBuffer) -> Result<DecodedHeader, ErrorKind> {
    let init = InitByte::new(input.read_u8()?);
    let arg_form = ArgForm::from_remainder(init.remainder())?;
    let argument = match arg_form {
        ArgForm::Inline(v) => v as u64,
        ArgForm::Next1 => input.read_u8()? as u64,
        ArgForm::Next2 => input.read_u16(Endian::Big)? as u64,
        ArgForm::Next4 => input.read_u32(Endian::Big)? as u64,
        ArgForm::Next8 => input.read_u64(Endian::Big)?,
        // indefinite-length items (the stop-code outside a nested break) are
        // out of scope; every item this engine decodes carries a definite
        // length or argument.
        ArgForm::Reserved => return Err(ErrorKind::MalformedMessage),
    };
    Ok(DecodedHeader {
        major: init.major(),
        argument,
        arg_form,
    })
}

/// Decode one header, additionally rejecting any argument encoded in a
/// longer-than-necessary form (RFC 8949 §4.2's "preferred serialization").
/// Used by the strict/canonical decode path.
pub fn decode_header_strict(input: &mut impl InputBuffer) -> Result<DecodedHeader, ErrorKind> {
    let header = decode_header(input)?;
    if ArgForm::smallest_for(header.argument) != header.arg_form {
        return Err(ErrorKind::MalformedArgument);
    }
    Ok(header)
}

/// Encode a header for `argument` under `major`, always choosing the
/// smallest argument form that represents it (this engine only ever emits
/// preferred-serialization output).
pub fn encode_header(
    output: &mut impl OutputBuffer,
    major: MajorType,
    argument: u64,
) -> Result<(), ErrorKind> {
    let form = ArgForm::smallest_for(argument);
    output.write_u8(InitByte::pack(major, form.remainder_code()))?;
    match form {
        ArgForm::Inline(_) => Ok(()),
        ArgForm::Next1 => output.write_u8(argument as u8),
        ArgForm::Next2 => output.write_u16(argument as u16, Endian::Big),
        ArgForm::Next4 => output.write_u32(argument as u32, Endian::Big),
        ArgForm::Next8 => output.write_u64(argument, Endian::Big),
        ArgForm::Reserved => unreachable!("smallest_for never returns Reserved"),
    }
}
