pub mod decoder;

pub use decoder::{DecodedSymbol, Decoder, WedgeDecoder};
