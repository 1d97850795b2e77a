use super::{pad, Argument, Error};
use num_enum::{FromPrimitive, IntoPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[derive(FromPrimitive, IntoPrimitive)]
pub enum TypeTag {
    Int32 = b'i',
    Int64 = b'h',
    Float32 = b'f',
    Float64 = b'd',
    String = b's',
    Symbol = b'S',
    Blob = b'b',
    Char = b'c',
    True = b'T',
    False = b'F',
    TimeTag = b't',
    Rgba = b'r',
    Midi = b'm',
    Nil = b'N',
    Impulse = b'I',
    ArrayOpen = b'[',
    ArrayClose = b']',
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl TypeTag {
    fn as_char(self) -> char {
        char::from(u8::from(self))
    }
}

/// Decode the argument data following a type tag string. `tags` excludes the
/// leading comma.
pub fn decode(tags: &[u8], mut data: &[u8], full_data: &[u8]) -> Result<Vec<Argument>, Error> {
    let mut args = Vec::with_capacity(tags.len());
    for (i, raw_tag) in tags.iter().enumerate() {
        let tag = TypeTag::from(*raw_tag);
        let (arg, rest) = match tag {
            TypeTag::Int32 => {
                let (v, rest) = pad::peel_i32(data, full_data)?;
                (Argument::Int32(v), rest)
            }
            TypeTag::Int64 => {
                let (b, rest) = pad::peel_array::<8>(data, full_data)?;
                (Argument::Int64(i64::from_be_bytes(b)), rest)
            }
            TypeTag::Float32 => {
                let (b, rest) = pad::peel_array::<4>(data, full_data)?;
                (Argument::Float32(f32::from_be_bytes(b)), rest)
            }
            TypeTag::Float64 => {
                let (b, rest) = pad::peel_array::<8>(data, full_data)?;
                (Argument::Float64(f64::from_be_bytes(b)), rest)
            }
            TypeTag::String | TypeTag::Symbol => {
                let (s, rest) = pad::peel_string(data, full_data)?;
                (Argument::String(s), rest)
            }
            TypeTag::Blob => {
                let (blob, rest) = pad::peel_blob(data, full_data)?;
                (Argument::Blob(blob), rest)
            }
            TypeTag::Char => {
                let (v, rest) = pad::peel_i32(data, full_data)?;
                let c = char::from_u32(v as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                (Argument::Char(c), rest)
            }
            TypeTag::True => (Argument::Bool(true), data),
            TypeTag::False => (Argument::Bool(false), data),
            TypeTag::TimeTag => (Argument::Unknown(tag.as_char()), pad::peel(data, 8, full_data)?.1),
            TypeTag::Rgba | TypeTag::Midi => {
                (Argument::Unknown(tag.as_char()), pad::peel(data, 4, full_data)?.1)
            }
            TypeTag::Nil | TypeTag::Impulse => (Argument::Unknown(tag.as_char()), data),
            TypeTag::ArrayOpen | TypeTag::ArrayClose => continue,
            TypeTag::Unknown(_) => {
                // Width of an unrecognized tag is unknown, so nothing after
                // it can be located in the data.
                args.extend(
                    tags[i..]
                        .iter()
                        .filter(|t| !matches!(**t, b'[' | b']'))
                        .map(|t| Argument::Unknown(char::from(*t))),
                );
                break;
            }
        };
        args.push(arg);
        data = rest;
    }
    Ok(args)
}
