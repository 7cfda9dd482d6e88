use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::edition1::Grib1Message;
use crate::edition2::Grib2Message;
use crate::error::{GribError, ParseError};
use crate::helpers::{read_as, read_u24};
use crate::message::Message;

const MAGIC: &[u8] = b"GRIB";
const TRAILER: &[u8] = b"7777";
/// Some producers pad between messages with zeros; at most this many are
/// skipped per message.
const MAX_PADDING: usize = 256;

/// Returns an iterator over the GRIB messages of a seekable byte stream.
///
/// Each message is read into memory exactly once. The first framing or
/// parsing failure is yielded as an error and terminates the iterator.
pub fn read<R: Read + Seek>(reader: R) -> MessageStream<R> {
    MessageStream {
        reader,
        source: None,
        done: false,
    }
}

/// Opens a file and returns an iterator over its GRIB messages, with the
/// path recorded on each message for diagnostics.
pub fn read_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<MessageStream<BufReader<File>>, GribError> {
    let source = path.as_ref().display().to_string();
    let f = File::open(path.as_ref()).map_err(ParseError::from)?;
    Ok(MessageStream {
        reader: BufReader::new(f),
        source: Some(source),
        done: false,
    })
}

/// A lazy sequence of GRIB messages framed out of a byte stream.
pub struct MessageStream<R> {
    reader: R,
    source: Option<String>,
    done: bool,
}

impl<R: Read + Seek> MessageStream<R> {
    /// Skips up to [`MAX_PADDING`] leading zero octets, leaving the
    /// stream at the first non-zero octet within that window.
    fn strip_zeros(&mut self) -> Result<(), ParseError> {
        let mut buf = [0u8; MAX_PADDING];
        let n = read_up_to(&mut self.reader, &mut buf)?;
        let leading = buf[..n].iter().take_while(|&&b| b == 0).count();
        let rest = (n - leading) as i64;
        self.reader.seek(SeekFrom::Current(-rest))?;
        Ok(())
    }

    fn try_read_message(&mut self) -> Result<Option<Message>, GribError> {
        self.strip_zeros()?;

        let start = self.reader.stream_position().map_err(ParseError::from)?;
        let mut magic = [0u8; 4];
        let n = read_up_to(&mut self.reader, &mut magic)?;
        if n == 0 {
            return Ok(None);
        }
        if &magic[..n] != MAGIC {
            return Err(ParseError::NotGrib.into());
        }

        let mut header = [0u8; 4];
        checkread(&mut self.reader, &mut header)?;
        let edition = header[3];
        let length = match edition {
            1 => u64::from(read_u24(&header, 0)),
            2 => {
                let mut continuation = [0u8; 8];
                checkread(&mut self.reader, &mut continuation)?;
                read_as!(u64, continuation, 0)
            }
            n => return Err(ParseError::UnknownEdition(n).into()),
        };
        let length = usize::try_from(length)
            .map_err(|_| ParseError::ReadError(format!("message length {length} too large")))?;

        self.reader
            .seek(SeekFrom::Start(start))
            .map_err(ParseError::from)?;
        let mut data = vec![0u8; length];
        checkread(&mut self.reader, &mut data)?;
        if data.len() < TRAILER.len() || &data[data.len() - TRAILER.len()..] != TRAILER {
            return Err(ParseError::EndSectionMismatch.into());
        }

        let buf = data.into_boxed_slice();
        let message = match edition {
            1 => Message::Edition1(Grib1Message::from_bytes(buf, self.source.clone())?),
            _ => Message::Edition2(Grib2Message::from_bytes(buf, self.source.clone())?),
        };
        Ok(Some(message))
    }
}

impl<R: Read + Seek> Iterator for MessageStream<R> {
    type Item = Result<Message, GribError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.try_read_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ParseError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn checkread<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ParseError> {
    reader.read_exact(buf).map_err(ParseError::from)
}
