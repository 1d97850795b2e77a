//! OSC packets
//!
//! Decodes OSC 1.0 datagrams into `Packet`s. A datagram carries either one
//! message or a bundle. Bundles are flattened: every message they contain,
//! at any nesting depth, becomes its own `Packet` flagged with `is_bundle`.
//!
//! Only decoding is provided. Nothing here builds outgoing traffic.

mod args;
mod pad;

use std::fmt;

pub use args::TypeTag;

/// A single decoded argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    String(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Blob(Vec<u8>),
    Char(char),
    Bool(bool),
    /// Argument whose type tag has no value representation here. Holds the tag.
    Unknown(char),
}

impl Argument {
    pub fn type_name(&self) -> &'static str {
        match self {
            Argument::String(_) => "string",
            Argument::Int32(_) => "int32",
            Argument::Int64(_) => "int64",
            Argument::Float32(_) => "float32",
            Argument::Float64(_) => "float64",
            Argument::Blob(_) => "blob",
            Argument::Char(_) => "char",
            Argument::Bool(_) => "bool",
            Argument::Unknown(_) => "unknown",
        }
    }

    /// Long form of the value, as shown by the inspector.
    pub fn detail(&self) -> String {
        match self {
            Argument::String(s) => s.clone(),
            Argument::Blob(blob) if blob.is_empty() => "(empty)".to_string(),
            Argument::Blob(blob) => blob
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" "),
            Argument::Unknown(tag) => format!("type tag '{}'", tag),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::String(s) => write!(f, "\"{}\"", s),
            Argument::Int32(v) => write!(f, "{}", v),
            Argument::Int64(v) => write!(f, "{}", v),
            Argument::Float32(v) => write!(f, "{}", v),
            Argument::Float64(v) => write!(f, "{}", v),
            Argument::Blob(blob) => write!(f, "blob[{}]", blob.len()),
            Argument::Char(c) => write!(f, "'{}'", c),
            Argument::Bool(b) => write!(f, "{}", b),
            Argument::Unknown(tag) => write!(f, "?{}", tag),
        }
    }
}

/// One decoded message. Never modified after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub address: String,
    pub arguments: Vec<Argument>,
    /// Sender endpoint, `host:port`.
    pub source: String,
    /// True if the message arrived inside a bundle.
    pub is_bundle: bool,
}

impl Packet {
    pub fn new(address: impl Into<String>, arguments: Vec<Argument>, source: impl Into<String>) -> Packet {
        Packet {
            address: address.into(),
            arguments,
            source: source.into(),
            is_bundle: false,
        }
    }

    /// Address followed by the compact form of every argument.
    pub fn summary(&self) -> String {
        let mut line = self.address.clone();
        for arg in &self.arguments {
            line.push(' ');
            line.push_str(&arg.to_string());
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Empty,
    InvalidAddress(Vec<u8>),
    UnterminatedString(Vec<u8>),
    Truncated(Vec<u8>),
    InvalidBlobSize(Vec<u8>),
    InvalidElementSize(Vec<u8>),
    BundleTooDeep(Vec<u8>),
}

const BUNDLE_TAG: &[u8] = b"#bundle\0";
const BUNDLE_TIMETAG_SIZE: usize = 8;
const MAX_BUNDLE_DEPTH: usize = 8;

/// Decode a whole datagram received from `source`.
pub fn decode(raw: &[u8], source: &str) -> Result<Vec<Packet>, Error> {
    if raw.is_empty() {
        return Err(Error::Empty);
    }
    let mut packets = Vec::new();
    decode_element(raw, raw, source, 0, &mut packets)?;
    Ok(packets)
}

fn decode_element(
    raw: &[u8],
    full_data: &[u8],
    source: &str,
    depth: usize,
    out: &mut Vec<Packet>,
) -> Result<(), Error> {
    if !raw.starts_with(BUNDLE_TAG) {
        let mut packet = decode_message(raw, full_data, source)?;
        packet.is_bundle = depth > 0;
        out.push(packet);
        return Ok(());
    }

    if depth >= MAX_BUNDLE_DEPTH {
        return Err(Error::BundleTooDeep(full_data.to_vec()));
    }
    let (_timetag, mut rest) = pad::peel(&raw[BUNDLE_TAG.len()..], BUNDLE_TIMETAG_SIZE, full_data)?;
    while !rest.is_empty() {
        let (size, tail) = pad::peel_i32(rest, full_data)?;
        let size = match usize::try_from(size) {
            Ok(size) if size <= tail.len() => size,
            _ => return Err(Error::InvalidElementSize(full_data.to_vec())),
        };
        let (element, tail) = tail.split_at(size);
        decode_element(element, full_data, source, depth + 1, out)?;
        rest = tail;
    }
    Ok(())
}

fn decode_message(raw: &[u8], full_data: &[u8], source: &str) -> Result<Packet, Error> {
    if raw.first() != Some(&b'/') {
        return Err(Error::InvalidAddress(full_data.to_vec()));
    }
    let (address, rest) = pad::peel_string(raw, full_data)?;
    // Messages from very old senders omit the type tag string entirely.
    let arguments = if rest.first() == Some(&b',') {
        let (tags, data) = pad::peel_cstr(rest, full_data)?;
        args::decode(&tags[1..], data, full_data)?
    } else {
        Vec::new()
    };
    Ok(Packet::new(address, arguments, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osc_string(s: &str) -> Vec<u8> {
        let mut out = s.as_bytes().to_vec();
        out.push(0);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }

    fn message(address: &str, tags: &str, data: &[u8]) -> Vec<u8> {
        let mut out = osc_string(address);
        out.extend(osc_string(&format!(",{}", tags)));
        out.extend(data);
        out
    }

    fn bundle(elements: &[Vec<u8>]) -> Vec<u8> {
        let mut out = osc_string("#bundle");
        out.extend(1u64.to_be_bytes());
        for element in elements {
            out.extend((element.len() as i32).to_be_bytes());
            out.extend(element);
        }
        out
    }

    #[test]
    fn decodes_scalar_arguments() {
        let mut data = Vec::new();
        data.extend(42i32.to_be_bytes());
        data.extend(1.5f32.to_be_bytes());
        data.extend(osc_string("hello"));
        data.extend((-7i64).to_be_bytes());
        data.extend(2.25f64.to_be_bytes());
        data.extend(('x' as i32).to_be_bytes());
        let raw = message("/foo/bar", "ifshdcTF", &data);

        let packets = decode(&raw, "10.0.0.2:57120").unwrap();
        assert_eq!(packets.len(), 1);
        let pkt = &packets[0];
        assert_eq!(pkt.address, "/foo/bar");
        assert_eq!(pkt.source, "10.0.0.2:57120");
        assert!(!pkt.is_bundle);
        assert_eq!(
            pkt.arguments,
            vec![
                Argument::Int32(42),
                Argument::Float32(1.5),
                Argument::String("hello".into()),
                Argument::Int64(-7),
                Argument::Float64(2.25),
                Argument::Char('x'),
                Argument::Bool(true),
                Argument::Bool(false),
            ]
        );
    }

    #[test]
    fn decodes_padded_blob() {
        let mut data = Vec::new();
        data.extend(3i32.to_be_bytes());
        data.extend([1u8, 2, 3, 0]);
        data.extend(9i32.to_be_bytes());
        let raw = message("/blob", "bi", &data);

        let pkt = &decode(&raw, "src").unwrap()[0];
        assert_eq!(pkt.arguments, vec![Argument::Blob(vec![1, 2, 3]), Argument::Int32(9)]);
    }

    #[test]
    fn message_without_type_tags_has_no_arguments() {
        let raw = osc_string("/legacy");
        let pkt = &decode(&raw, "src").unwrap()[0];
        assert_eq!(pkt.address, "/legacy");
        assert!(pkt.arguments.is_empty());
    }

    #[test]
    fn known_width_tags_are_skipped_as_unknown() {
        let mut data = Vec::new();
        data.extend([0u8; 8]);
        data.extend([0xffu8; 4]);
        data.extend(5i32.to_be_bytes());
        let raw = message("/misc", "trNi", &data);

        let pkt = &decode(&raw, "src").unwrap()[0];
        assert_eq!(
            pkt.arguments,
            vec![
                Argument::Unknown('t'),
                Argument::Unknown('r'),
                Argument::Unknown('N'),
                Argument::Int32(5),
            ]
        );
    }

    #[test]
    fn unrecognized_tag_marks_the_rest_unknown() {
        let mut data = Vec::new();
        data.extend(1i32.to_be_bytes());
        data.extend([0u8; 12]);
        let raw = message("/odd", "iQ[i]f", &data);

        let pkt = &decode(&raw, "src").unwrap()[0];
        assert_eq!(
            pkt.arguments,
            vec![
                Argument::Int32(1),
                Argument::Unknown('Q'),
                Argument::Unknown('i'),
                Argument::Unknown('f'),
            ]
        );
    }

    #[test]
    fn array_brackets_are_flattened() {
        let mut data = Vec::new();
        data.extend(1i32.to_be_bytes());
        data.extend(2i32.to_be_bytes());
        let raw = message("/arr", "[ii]", &data);

        let pkt = &decode(&raw, "src").unwrap()[0];
        assert_eq!(pkt.arguments, vec![Argument::Int32(1), Argument::Int32(2)]);
    }

    #[test]
    fn nested_bundles_are_flattened_in_order() {
        let a = message("/a", "i", &1i32.to_be_bytes());
        let b = message("/b", "", &[]);
        let c = message("/c", "T", &[]);
        let raw = bundle(&[a, bundle(&[b, c])]);

        let packets = decode(&raw, "src").unwrap();
        let addresses: Vec<&str> = packets.iter().map(|p| p.address.as_str()).collect();
        assert_eq!(addresses, vec!["/a", "/b", "/c"]);
        assert!(packets.iter().all(|p| p.is_bundle));
    }

    #[test]
    fn empty_bundle_yields_nothing() {
        assert!(decode(&bundle(&[]), "src").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_datagrams() {
        assert_eq!(decode(&[], "src"), Err(Error::Empty));
        assert!(matches!(decode(b"nope\0\0\0\0", "src"), Err(Error::InvalidAddress(_))));
        assert!(matches!(decode(b"/open", "src"), Err(Error::UnterminatedString(_))));

        let truncated = message("/short", "i", &[0, 0]);
        assert!(matches!(decode(&truncated, "src"), Err(Error::Truncated(_))));

        let mut oversized = osc_string("#bundle");
        oversized.extend(0u64.to_be_bytes());
        oversized.extend(64i32.to_be_bytes());
        oversized.extend(osc_string("/x"));
        assert!(matches!(decode(&oversized, "src"), Err(Error::InvalidElementSize(_))));
    }

    #[test]
    fn deep_bundle_nesting_is_rejected() {
        let mut raw = message("/deep", "", &[]);
        for _ in 0..=MAX_BUNDLE_DEPTH {
            raw = bundle(&[raw]);
        }
        assert!(matches!(decode(&raw, "src"), Err(Error::BundleTooDeep(_))));
    }

    #[test]
    fn formats_arguments_for_list_and_inspector() {
        let pkt = Packet::new(
            "/mix",
            vec![
                Argument::Int32(3),
                Argument::String("on".into()),
                Argument::Blob(vec![0xde, 0xad]),
                Argument::Char('k'),
                Argument::Unknown('m'),
            ],
            "src",
        );
        assert_eq!(pkt.summary(), "/mix 3 \"on\" blob[2] 'k' ?m");
        assert_eq!(pkt.arguments[2].detail(), "de ad");
        assert_eq!(pkt.arguments[2].type_name(), "blob");
        assert_eq!(pkt.arguments[4].detail(), "type tag 'm'");
    }
}
