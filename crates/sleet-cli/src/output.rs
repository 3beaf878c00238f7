use std::io::{self, Write};

use anyhow::Context;
use clap::ValueEnum;
use serde_json::json;
use sleet::SleetId;

/// How generated IDs are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Decimal integer.
    Decimal,
    /// `0x`-prefixed, zero-padded hexadecimal.
    Hex,
    /// Standard base64 of the decimal string.
    Base64,
    /// The 8 big-endian bytes as space separated hex pairs.
    Bytes,
    /// One JSON object per line with the decoded fields.
    Json,
}

/// How IDs passed to `inspect` are encoded.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Decimal,
    Base64,
}

impl InputFormat {
    pub fn decode(self, input: &str) -> anyhow::Result<SleetId> {
        let id = match self {
            Self::Decimal => input.trim().parse(),
            Self::Base64 => SleetId::from_base64(input.trim()),
        };
        id.with_context(|| format!("cannot decode {input:?} as {self:?}"))
    }
}

pub fn write_id<W>(w: &mut W, id: SleetId, format: OutputFormat) -> io::Result<()>
where
    W: Write,
{
    match format {
        OutputFormat::Decimal => writeln!(w, "{id}"),
        OutputFormat::Hex => writeln!(w, "{:#018x}", id.to_raw()),
        OutputFormat::Base64 => writeln!(w, "{}", id.to_base64()),
        OutputFormat::Bytes => {
            let bytes = id.to_be_bytes();
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{b:02x}")?;
            }
            writeln!(w)
        }
        OutputFormat::Json => writeln!(w, "{}", fields(id)),
    }
}

/// Writes the decoded fields of `id` on one line.
pub fn write_inspection<W>(w: &mut W, id: SleetId) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        w,
        "id={id} unix_millis={} time={} region_id={} node_id={} sequence={}",
        id.unix_millis(),
        id.time(),
        id.region_id(),
        id.node_id(),
        id.sequence()
    )
}

fn fields(id: SleetId) -> serde_json::Value {
    // The id goes out as a string; JSON numbers lose precision above 2^53.
    json!({
        "id": id.to_string(),
        "unix_millis": id.unix_millis(),
        "region_id": id.region_id(),
        "node_id": id.node_id(),
        "sequence": id.sequence(),
    })
}
