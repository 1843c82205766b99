//! Line-by-line decoder driven by a spec.
//!
//! Each line is cut into consecutive slices, one per column, `width`
//! characters each, starting at character 0:
//!
//! ```text
//! name(10)  valid(1) count(3)
//! "foo       1  5"  =>  ["foo", 1, 5]
//! ```
//!
//! Characters past the spec's total width are never read.

use crate::data::DataFile;
use crate::decode::row::{FieldPolicy, Row, Value};
use crate::error::DecodeError;
use crate::spec::{Column, Spec};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::num::IntErrorKind;
use tracing::warn;

/// Where a decoder is in its single forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// No line requested yet.
    Idle,
    Decoding,
    /// Input exhausted cleanly.
    EndOfStream,
    /// A fatal error was returned; nothing more will be produced.
    Failed,
}

/// Lazy row iterator over one data file.
///
/// Yields `Ok(Row)` per line, then `None` at end of input. A fatal error is
/// yielded once as `Err` and followed by `None`. Not restartable.
pub struct RowDecoder<'s, R> {
    spec: &'s Spec,
    lines: Lines<R>,
    line_no: u64,
    policy: FieldPolicy,
    state: DecodeState,
}

impl<'s> RowDecoder<'s, BufReader<File>> {
    /// Open the data file's path for decoding.
    pub fn open(df: &DataFile<'s>, policy: FieldPolicy) -> io::Result<Self> {
        let file = File::open(df.path())?;
        Ok(Self::new(df.spec, BufReader::new(file), policy))
    }
}

impl<'s, R: BufRead> RowDecoder<'s, R> {
    pub fn new(spec: &'s Spec, reader: R, policy: FieldPolicy) -> Self {
        Self {
            spec,
            lines: reader.lines(),
            line_no: 0,
            policy,
            state: DecodeState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DecodeState {
        self.state
    }
}

impl<R: BufRead> Iterator for RowDecoder<'_, R> {
    type Item = Result<Row, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            DecodeState::EndOfStream | DecodeState::Failed => return None,
            DecodeState::Idle | DecodeState::Decoding => self.state = DecodeState::Decoding,
        }

        let line = match self.lines.next() {
            None => {
                self.state = DecodeState::EndOfStream;
                return None;
            }
            Some(Err(source)) => {
                self.state = DecodeState::Failed;
                return Some(Err(DecodeError::Io {
                    line: self.line_no + 1,
                    source,
                }));
            }
            Some(Ok(line)) => line,
        };
        self.line_no += 1;

        let row = decode_line(self.spec, &line, self.line_no, self.policy);
        if row.is_err() {
            self.state = DecodeState::Failed;
        }
        Some(row)
    }
}

/// Decode one line against `spec`.
pub fn decode_line(
    spec: &Spec,
    line: &str,
    line_no: u64,
    policy: FieldPolicy,
) -> Result<Row, DecodeError> {
    let mut values = Vec::with_capacity(spec.columns.len());
    let mut rest = line;
    let mut start = 0usize;

    for col in &spec.columns {
        let end = start + col.width;
        let (field, tail) = split_at_char(rest, col.width).ok_or_else(|| {
            DecodeError::RowTooShort {
                line: line_no,
                column: col.name.clone(),
                needed: end,
                actual: line.chars().count(),
            }
        })?;

        values.push(coerce(col, field.trim(), line_no, policy)?);
        rest = tail;
        start = end;
    }

    Ok(Row {
        line: line_no,
        values,
    })
}

fn coerce(col: &Column, field: &str, line_no: u64, policy: FieldPolicy) -> Result<Value, DecodeError> {
    if !col.datatype.is_numeric() {
        return Ok(Value::Text(field.to_string()));
    }

    match field.parse::<i64>() {
        Ok(i) => Ok(Value::Integer(i)),
        Err(e) => match policy {
            FieldPolicy::Substitute => {
                // Out-of-range numbers saturate; anything else loads 0.
                let substitute = match e.kind() {
                    IntErrorKind::PosOverflow => i64::MAX,
                    IntErrorKind::NegOverflow => i64::MIN,
                    _ => 0,
                };
                warn!(
                    "line {}: column {:?} expected int, got {:?}; loading {}",
                    line_no, col.name, field, substitute
                );
                Ok(Value::Integer(substitute))
            }
            FieldPolicy::Reject => Err(DecodeError::InvalidField {
                line: line_no,
                column: col.name.clone(),
                raw: field.to_string(),
            }),
        },
    }
}

/// Split after `n` characters, or `None` if `s` has fewer than `n`.
fn split_at_char(s: &str, n: usize) -> Option<(&str, &str)> {
    let mut seen = 0;
    for (idx, _) in s.char_indices() {
        if seen == n {
            return Some(s.split_at(idx));
        }
        seen += 1;
    }
    (seen == n).then_some((s, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Datatype;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    fn spec() -> Spec {
        Spec::new(
            "testformat1",
            vec![
                Column::new("name", 10, Datatype::Text),
                Column::new("valid", 1, Datatype::Boolean),
                Column::new("count", 3, Datatype::Integer),
            ],
        )
    }

    #[test]
    fn decodes_fixed_width_fields() {
        let row = decode_line(&spec(), "foo       1  5", 1, FieldPolicy::Substitute).unwrap();
        assert_eq!(
            row.values,
            vec![Value::from("foo"), Value::Integer(1), Value::Integer(5)]
        );
    }

    #[test]
    fn signed_and_trailing_content() {
        let row = decode_line(&spec(), "Barzane   0-12 trailing", 2, FieldPolicy::Reject).unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(
            row.values,
            vec![Value::from("Barzane"), Value::Integer(0), Value::Integer(-12)]
        );
    }

    #[test]
    fn widths_count_characters() {
        let row = decode_line(&spec(), "Zoë äöü   1 42", 1, FieldPolicy::Reject).unwrap();
        assert_eq!(
            row.values,
            vec![Value::from("Zoë äöü"), Value::Integer(1), Value::Integer(42)]
        );
    }

    #[test]
    fn short_line_fails() {
        let err = decode_line(&spec(), "foo       1 ", 7, FieldPolicy::Substitute).unwrap_err();
        match err {
            DecodeError::RowTooShort {
                line,
                column,
                needed,
                actual,
            } => {
                assert_eq!(line, 7);
                assert_eq!(column, "count");
                assert_eq!(needed, 14);
                assert_eq!(actual, 12);
            }
            other => panic!("expected RowTooShort, got {:?}", other),
        }
    }

    #[test]
    fn exact_width_line_is_enough() {
        assert!(decode_line(&spec(), "abcdefghij0123", 1, FieldPolicy::Reject).is_ok());
        assert!(decode_line(&spec(), "abcdefghij012", 1, FieldPolicy::Reject).is_err());
    }

    #[test]
    fn bad_number_substitutes_zero() {
        let row = decode_line(&spec(), "foo       x  5", 1, FieldPolicy::Substitute).unwrap();
        assert_eq!(
            row.values,
            vec![Value::from("foo"), Value::Integer(0), Value::Integer(5)]
        );
    }

    #[test]
    fn overflowing_number_saturates() {
        let spec = Spec::new(
            "wide",
            vec![Column::new("n", 23, Datatype::Integer)],
        );
        let big = decode_line(&spec, "12345678901234567890123", 1, FieldPolicy::Substitute).unwrap();
        assert_eq!(big.values, vec![Value::Integer(i64::MAX)]);

        let small = decode_line(&spec, "-1234567890123456789012", 2, FieldPolicy::Substitute).unwrap();
        assert_eq!(small.values, vec![Value::Integer(i64::MIN)]);

        assert!(matches!(
            decode_line(&spec, "12345678901234567890123", 3, FieldPolicy::Reject),
            Err(DecodeError::InvalidField { line: 3, .. })
        ));
    }

    #[test]
    fn bad_number_rejected_when_strict() {
        let err = decode_line(&spec(), "foo       1 ab", 3, FieldPolicy::Reject).unwrap_err();
        match err {
            DecodeError::InvalidField { line, column, raw } => {
                assert_eq!(line, 3);
                assert_eq!(column, "count");
                assert_eq!(raw, "ab");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn iterates_lines_then_ends() {
        let spec = spec();
        let input = Cursor::new("Foonyor   1  1\r\nBarzane   0-12\nQuuxitude 1103\n");
        let mut decoder = RowDecoder::new(&spec, input, FieldPolicy::Reject);
        assert_eq!(decoder.state(), DecodeState::Idle);

        let rows: Vec<Row> = decoder.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].line, 3);
        assert_eq!(
            rows[2].values,
            vec![Value::from("Quuxitude"), Value::Integer(1), Value::Integer(103)]
        );
        assert_eq!(decoder.state(), DecodeState::EndOfStream);
        assert!(decoder.next().is_none());
    }

    #[test]
    fn stops_after_first_failure() {
        let spec = spec();
        let input = Cursor::new("Foonyor   1  1\nshort\nQuuxitude 1103\n");
        let mut decoder = RowDecoder::new(&spec, input, FieldPolicy::Reject);

        assert!(decoder.next().unwrap().is_ok());
        assert!(matches!(
            decoder.next(),
            Some(Err(DecodeError::RowTooShort { line: 2, .. }))
        ));
        assert_eq!(decoder.state(), DecodeState::Failed);
        assert!(decoder.next().is_none());
    }

    #[test]
    fn blank_trailing_line_fails_the_file() {
        let spec = spec();
        let input = Cursor::new("Foonyor   1  1\n\n");
        let items: Vec<Result<Row, DecodeError>> =
            RowDecoder::new(&spec, input, FieldPolicy::Substitute).collect();

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(DecodeError::RowTooShort {
                line: 2,
                needed: 10,
                actual: 0,
                ..
            })
        ));
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("disk went away"));
            }
            self.served = true;
            let line = b"Foonyor   1  1\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn read_fault_is_reported() {
        let spec = spec();
        let reader = BufReader::new(FailingReader { served: false });
        let mut decoder = RowDecoder::new(&spec, reader, FieldPolicy::Reject);

        assert!(decoder.next().unwrap().is_ok());
        assert!(matches!(
            decoder.next(),
            Some(Err(DecodeError::Io { line: 2, .. }))
        ));
        assert!(decoder.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_a_read_fault() {
        let spec = spec();
        let input = Cursor::new(b"Foonyor \xff 1  1\n".to_vec());
        let mut decoder = RowDecoder::new(&spec, input, FieldPolicy::Reject);
        assert!(matches!(decoder.next(), Some(Err(DecodeError::Io { .. }))));
    }
}
