//! Barcode decoding capability.
//!
//! A frame is whatever the capture device produced. For keyboard-wedge and
//! serial scanners, which already decode in hardware, that is one text line
//! per symbol, optionally prefixed with an AIM symbology identifier.

use crate::errors::AppResult;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub symbology: String,
    pub text: String,
}

impl DecodedSymbol {
    pub fn new(symbology: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            symbology: symbology.into(),
            text: text.into(),
        }
    }
}

/// Frame → zero or more decoded symbols. Stateless between calls.
pub trait Decoder {
    fn decode(&self, frame: &[u8]) -> AppResult<Vec<DecodedSymbol>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WedgeDecoder;

fn aim_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\]([A-Za-z])([0-9A-Za-z])(.*)$").expect("static AIM regex is valid")
    })
}

/// Symbology name for an AIM code character and modifier.
fn symbology_for(code: char, modifier: char) -> String {
    let name = match (code, modifier) {
        ('A', _) => "CODE39",
        ('C', _) => "CODE128",
        ('E', '4') => "EAN8",
        ('E', _) => "EAN13",
        ('F', _) => "CODABAR",
        ('G', _) => "CODE93",
        ('I', _) => "I25",
        ('L', _) => "PDF417",
        ('Q', _) => "QRCODE",
        ('d', _) => "DATAMATRIX",
        ('e', _) => "DATABAR",
        ('z', _) => "AZTEC",
        _ => return format!("AIM-]{code}{modifier}"),
    };
    name.to_string()
}

impl Decoder for WedgeDecoder {
    fn decode(&self, frame: &[u8]) -> AppResult<Vec<DecodedSymbol>> {
        let text = String::from_utf8_lossy(frame);
        let mut out = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let symbol = match aim_prefix().captures(line) {
                Some(caps) => {
                    let code = caps[1].chars().next().unwrap_or('?');
                    let modifier = caps[2].chars().next().unwrap_or('?');
                    let payload = caps[3].trim();
                    if payload.is_empty() {
                        continue;
                    }
                    DecodedSymbol::new(symbology_for(code, modifier), payload)
                }
                None => DecodedSymbol::new("UNKNOWN", line),
            };
            out.push(symbol);
        }

        Ok(out)
    }
}
