//! URI-Safe LZ Compression
//!
//! LZW-style dictionary coder emitting 6 bits per output character from a
//! 64 symbol alphabet that needs no percent-encoding. The bit layout is the
//! one used by `lz-string`'s `compressToEncodedURIComponent`, so tokens from
//! links shared before this engine existed still decode.
//!
//! Input is processed as UTF-16 code units.

use std::collections::{HashMap, HashSet};

use crate::error::LzError;

/// Output uses the first 64 symbols; `$` is still accepted on input
const ALPHABET: &[u8; 65] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";
const BITS_PER_CHAR: u32 = 6;
/// Mask of the highest bit in one output character
const RESET_MASK: u32 = 1 << (BITS_PER_CHAR - 1);
/// Decoder refuses code widths beyond this
const MAX_CODE_BITS: u32 = 24;
/// Decoder gives up once the output passes this many UTF-16 code units
pub const MAX_DECOMPRESSED_LEN: usize = 1 << 20;

/// Stream markers shared by both directions
const CHAR_8BIT: u32 = 0;
const CHAR_16BIT: u32 = 1;
const END_OF_STREAM: u32 = 2;

fn symbol_value(symbol: char) -> Option<u32> {
    let byte = u8::try_from(symbol).ok()?;
    ALPHABET.iter().position(|&b| b == byte).map(|p| p as u32)
}

// ========================
// Compression
// ========================

#[derive(Default)]
struct BitWriter {
    out: String,
    val: u32,
    position: u32,
}

impl BitWriter {
    /// Write `num_bits` of `value`, least significant bit first
    fn write(&mut self, mut value: u32, num_bits: u32) {
        for _ in 0..num_bits {
            self.val = (self.val << 1) | (value & 1);
            self.advance();
            value >>= 1;
        }
    }

    fn advance(&mut self) {
        if self.position == BITS_PER_CHAR - 1 {
            self.out.push(ALPHABET[self.val as usize] as char);
            self.position = 0;
            self.val = 0;
        } else {
            self.position += 1;
        }
    }

    fn finish(mut self) -> String {
        loop {
            self.val <<= 1;
            if self.position == BITS_PER_CHAR - 1 {
                self.out.push(ALPHABET[self.val as usize] as char);
                break;
            }
            self.position += 1;
        }
        self.out
    }
}

struct Compressor {
    dictionary: HashMap<Vec<u16>, u32>,
    /// Single units seen but not yet emitted literally
    pending: HashSet<Vec<u16>>,
    dict_size: u32,
    enlarge_in: u32,
    num_bits: u32,
    writer: BitWriter,
}

impl Compressor {
    fn new() -> Self {
        Self {
            dictionary: HashMap::new(),
            pending: HashSet::new(),
            dict_size: 3,
            enlarge_in: 2,
            num_bits: 2,
            writer: BitWriter::default(),
        }
    }

    fn grow(&mut self) {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.num_bits;
            self.num_bits += 1;
        }
    }

    fn emit(&mut self, w: &[u16]) {
        if self.pending.remove(w) {
            let unit = u32::from(w[0]);
            if unit < 256 {
                self.writer.write(CHAR_8BIT, self.num_bits);
                self.writer.write(unit, 8);
            } else {
                self.writer.write(CHAR_16BIT, self.num_bits);
                self.writer.write(unit, 16);
            }
            self.grow();
        } else {
            let code = self.dictionary.get(w).copied().unwrap_or_default();
            self.writer.write(code, self.num_bits);
        }
        self.grow();
    }

    fn run(mut self, input: &str) -> String {
        let mut w: Vec<u16> = Vec::new();

        for unit in input.encode_utf16() {
            let single = vec![unit];
            if !self.dictionary.contains_key(&single) {
                self.dictionary.insert(single.clone(), self.dict_size);
                self.dict_size += 1;
                self.pending.insert(single);
            }

            let mut wc = w.clone();
            wc.push(unit);
            if self.dictionary.contains_key(&wc) {
                w = wc;
                continue;
            }

            self.emit(&w);
            self.dictionary.insert(wc, self.dict_size);
            self.dict_size += 1;
            w = vec![unit];
        }

        if !w.is_empty() {
            self.emit(&w);
        }

        self.writer.write(END_OF_STREAM, self.num_bits);
        self.writer.finish()
    }
}

/// Compress into the URI-safe alphabet
pub fn compress_to_uri(input: &str) -> String {
    Compressor::new().run(input)
}

// ========================
// Decompression
// ========================

struct BitReader {
    values: Vec<u32>,
    val: u32,
    mask: u32,
    index: usize,
}

impl BitReader {
    fn new(values: Vec<u32>) -> Self {
        let val = values.first().copied().unwrap_or(0);
        Self {
            values,
            val,
            mask: RESET_MASK,
            index: 1,
        }
    }

    fn exhausted(&self) -> bool {
        self.index > self.values.len()
    }

    /// Read `num_bits`, least significant bit first; zeros past the end
    fn read(&mut self, num_bits: u32) -> u32 {
        let mut bits = 0;
        for shift in 0..num_bits {
            let set = self.val & self.mask != 0;
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = RESET_MASK;
                self.val = self.values.get(self.index).copied().unwrap_or(0);
                self.index += 1;
            }
            if set {
                bits |= 1 << shift;
            }
        }
        bits
    }
}

/// Invert [`compress_to_uri`]
///
/// Spaces are read as `+`: form decoding of a query string turns a
/// literal `+` into a space.
pub fn decompress_from_uri(input: &str) -> Result<String, LzError> {
    decompress_with_limit(input, MAX_DECOMPRESSED_LEN)
}

fn decompress_with_limit(input: &str, limit: usize) -> Result<String, LzError> {
    let values = input
        .chars()
        .map(|symbol| {
            let symbol = if symbol == ' ' { '+' } else { symbol };
            symbol_value(symbol).ok_or(LzError::InvalidCharacter(symbol))
        })
        .collect::<Result<Vec<u32>, LzError>>()?;

    let mut reader = BitReader::new(values);
    // slots 0..3 are reserved for the stream markers
    let mut dictionary: Vec<Vec<u16>> = vec![Vec::new(); 3];
    let mut enlarge_in: u32 = 4;
    let mut num_bits: u32 = 3;

    let first = match reader.read(2) {
        CHAR_8BIT => reader.read(8) as u16,
        CHAR_16BIT => reader.read(16) as u16,
        END_OF_STREAM => return Ok(String::new()),
        _ => return Err(LzError::Corrupt),
    };
    let mut w = vec![first];
    let mut result = w.clone();
    dictionary.push(w.clone());

    loop {
        if reader.exhausted() {
            return Err(LzError::Truncated);
        }
        if num_bits > MAX_CODE_BITS {
            return Err(LzError::Corrupt);
        }

        let mut code = reader.read(num_bits) as usize;
        match code as u32 {
            CHAR_8BIT | CHAR_16BIT => {
                let width = if code as u32 == CHAR_8BIT { 8 } else { 16 };
                dictionary.push(vec![reader.read(width) as u16]);
                code = dictionary.len() - 1;
                enlarge_in -= 1;
            }
            END_OF_STREAM => return String::from_utf16(&result).map_err(|_| LzError::InvalidUtf16),
            _ => {}
        }

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }

        let entry = if code < dictionary.len() {
            dictionary[code].clone()
        } else if code == dictionary.len() {
            let mut entry = w.clone();
            entry.push(w[0]);
            entry
        } else {
            return Err(LzError::Corrupt);
        };

        if result.len() + entry.len() > limit {
            return Err(LzError::TooLarge(limit));
        }
        result.extend_from_slice(&entry);
        let mut next = w;
        next.push(entry[0]);
        dictionary.push(next);
        enlarge_in -= 1;
        w = entry;

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_alphabet_is_uri_safe() {
        let token = compress_to_uri(r#"[{"id":"tier-s","name":"S","items":[["a b","Crème brûlée"]]}]"#);
        assert!(!token.is_empty());
        assert!(token.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_round_trip_repetitive_and_unicode() {
        let inputs = [
            "a",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "abababababababababababababababababababababa",
            "Crème brûlée 🍰 and 寿司",
            r#"[{"id":"tier-s","name":"S","items":[["games-zelda.png","Zelda"],["games-mario.png","Mario"]]}]"#,
        ];
        for input in inputs {
            let token = compress_to_uri(input);
            assert_eq!(decompress_from_uri(&token).unwrap(), input, "input {:?}", input);
        }
    }

    #[test]
    fn test_compresses_repetition() {
        let input = "tier-a".repeat(100);
        assert!(compress_to_uri(&input).len() < input.len() / 4);
    }

    #[test]
    fn test_space_reads_as_plus() {
        // any '+' in the token must survive being read back as a space
        let input = (0..200).map(|i| char::from(b'!' + (i % 90) as u8)).collect::<String>();
        let token = compress_to_uri(&input);
        let mangled = token.replace('+', " ");
        assert_eq!(decompress_from_uri(&mangled).unwrap(), input);
    }

    #[test]
    fn test_empty_input_round_trips() {
        let token = compress_to_uri("");
        assert_eq!(token, "Q");
        assert_eq!(decompress_from_uri(&token).unwrap(), "");
    }

    #[test]
    fn test_matches_lz_string_output() {
        // produced by lz-string's compressToEncodedURIComponent
        assert_eq!(compress_to_uri("Hello, world!"), "BIUwNmD2A0AEDukBOYAmBCIA");
        assert_eq!(decompress_from_uri("BIUwNmD2A0AEDukBOYAmBCIA").unwrap(), "Hello, world!");
        assert_eq!(decompress_from_uri("Q").unwrap(), "");
    }

    /// One literal `a`, then `steps` codes each naming the slot about to be
    /// created, so every step emits one unit more than the last
    fn self_referencing_token(steps: usize) -> String {
        let mut writer = BitWriter::default();
        writer.write(CHAR_8BIT, 2);
        writer.write(u32::from(b'a'), 8);

        let mut next_slot: u32 = 4;
        let mut enlarge_in: u32 = 4;
        let mut num_bits: u32 = 3;
        for _ in 0..steps {
            writer.write(next_slot, num_bits);
            next_slot += 1;
            enlarge_in -= 1;
            if enlarge_in == 0 {
                enlarge_in = 1 << num_bits;
                num_bits += 1;
            }
        }
        writer.write(END_OF_STREAM, num_bits);
        writer.finish()
    }

    #[test]
    fn test_self_referencing_codes_expand() {
        // 1 + 2 + ... + 21
        let decoded = decompress_from_uri(&self_referencing_token(20)).unwrap();
        assert_eq!(decoded, "a".repeat(231));
    }

    #[test]
    fn test_output_size_is_capped() {
        let token = self_referencing_token(200);
        assert!(decompress_with_limit(&token, 30_000).is_ok());
        assert_eq!(decompress_with_limit(&token, 10_000), Err(LzError::TooLarge(10_000)));

        // a short link that would otherwise expand past a million units
        let token = self_referencing_token(1_500);
        assert!(token.len() < 4_096);
        assert_eq!(decompress_from_uri(&token), Err(LzError::TooLarge(MAX_DECOMPRESSED_LEN)));
    }

    #[test]
    fn test_rejects_foreign_characters() {
        assert_eq!(decompress_from_uri("abc%20"), Err(LzError::InvalidCharacter('%')));
        assert_eq!(decompress_from_uri("é"), Err(LzError::InvalidCharacter('é')));
    }

    #[test]
    fn test_truncated_stream_fails() {
        let input = "a fairly long piece of text that will not fit in one symbol";
        let token = compress_to_uri(input);
        let truncated = &token[..token.len() / 2];
        assert_ne!(decompress_from_uri(truncated).ok().as_deref(), Some(input));
    }
}
