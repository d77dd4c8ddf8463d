use std::io::{BufRead, Cursor};
use crate::keys::KeyError;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// One labelled block of PEM armour and its decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    pub label: String,
    pub contents: Vec<u8>,
}

impl PemBlock {
    pub fn new(label: &str, contents: Vec<u8>) -> Self {
        Self { label: label.to_string(), contents }
    }

    /// Decode the first PEM block in `text`. Anything before the BEGIN line is skipped.
    pub fn decode(text: &str) -> Result<PemBlock, KeyError> {
        let mut cur = Cursor::new(text.as_bytes());
        let mut line = String::new();
        let mut label: Option<String> = None;
        let mut body = String::new();
        let mut closed = false;
        while let Ok(n) = cur.read_line(&mut line) {
            if n == 0 { break; }
            let trimmed = line.trim();
            match &label {
                None => {
                    if let Some(rest) = trimmed.strip_prefix(BEGIN) {
                        let name = rest.strip_suffix(DASHES)
                            .ok_or_else(|| KeyError::Decode("malformed BEGIN line".to_string()))?;
                        label = Some(name.to_string());
                    }
                }
                Some(name) => {
                    if let Some(rest) = trimmed.strip_prefix(END) {
                        if rest.strip_suffix(DASHES) != Some(name.as_str()) {
                            return Err(KeyError::Decode(format!("END line does not match `{}'", name)));
                        }
                        closed = true;
                        break;
                    }
                    body.push_str(trimmed);
                }
            }
            line.clear();
        }
        let label = label.ok_or_else(|| KeyError::Decode("no PEM block found".to_string()))?;
        if !closed {
            return Err(KeyError::Decode(format!("missing END line for `{}'", label)));
        }
        let contents = base64::decode(&body)
            .map_err(|e| KeyError::Decode(format!("bad base64 payload: {}", e)))?;
        Ok(PemBlock { label, contents })
    }

    /// Decode and require the given label.
    pub fn decode_labeled(text: &str, label: &str) -> Result<PemBlock, KeyError> {
        let block = PemBlock::decode(text)?;
        if block.label != label {
            return Err(KeyError::Decode(format!("expected `{}' block, got `{}'", label, block.label)));
        }
        Ok(block)
    }
}
