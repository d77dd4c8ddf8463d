use crate::keys::BASE64_SPLIT;
use crate::keys::pem_reader::PemBlock;

impl PemBlock {
    /// Armour the block: header, base64 body wrapped at 64 columns, footer.
    /// Every line, the footer included, ends with `\n`.
    pub fn encode(&self) -> String {
        let body = base64::encode(&self.contents);
        let mut out = String::with_capacity(body.len() + body.len() / BASE64_SPLIT + 2 * self.label.len() + 40);
        out.push_str(&format!("-----BEGIN {}-----\n", self.label));
        for chunk in body.as_bytes().chunks(BASE64_SPLIT) {
            // base64 output is ASCII, so any byte split is a char boundary
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out.push_str(&format!("-----END {}-----\n", self.label));
        out
    }
}

pub fn encode_pem(label: &str, contents: &[u8]) -> String {
    PemBlock::new(label, contents.to_vec()).encode()
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use crate::keys::PemBlock;
    use crate::keys::pem_writer::encode_pem;

    #[test]
    fn test_line_wrap() {
        let text = encode_pem("TEST", &[0xab; 100]);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "-----BEGIN TEST-----");
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 136 - 64);
        assert_eq!(lines[3], "-----END TEST-----");
        assert!(text.ends_with("-----\n"));
    }

    #[test]
    fn test_read_back() -> Result<(), Box<dyn Error>> {
        let data = (0..=255u8).collect::<Vec<_>>();
        let block = PemBlock::decode(&encode_pem("EC PRIVATE KEY", &data))?;
        assert_eq!(block.label, "EC PRIVATE KEY");
        assert_eq!(block.contents, data);
        Ok(())
    }
}
