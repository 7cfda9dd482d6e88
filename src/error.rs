use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GribError {
    ParseError(ParseError),
    DecodeError(DecodeError),
    NotSupported(String),
    InvalidValueError(String),
}

impl Error for GribError {}

impl From<ParseError> for GribError {
    fn from(e: ParseError) -> Self {
        Self::ParseError(e)
    }
}

impl From<DecodeError> for GribError {
    fn from(e: DecodeError) -> Self {
        Self::DecodeError(e)
    }
}

impl From<BuildError> for GribError {
    fn from(e: BuildError) -> Self {
        Self::ParseError(e.into())
    }
}

impl Display for GribError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "{e}"),
            Self::DecodeError(e) => write!(f, "{e}"),
            Self::NotSupported(s) => write!(f, "not supported: {s}"),
            Self::InvalidValueError(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    ReadError(String),
    NotGrib,
    UnknownEdition(u8),
    EndSectionMismatch,
    UnexpectedEndOfFile,
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::ReadError(s) => write!(f, "Read error: {s}"),
            Self::NotGrib => write!(f, "not a GRIB message"),
            Self::UnknownEdition(n) => write!(f, "unknown edition number '{n}'"),
            Self::EndSectionMismatch => write!(f, "end-of-message marker not found"),
            Self::UnexpectedEndOfFile => write!(f, "unexpected end of file"),
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEndOfFile
        } else {
            Self::ReadError(e.to_string())
        }
    }
}

impl From<BuildError> for ParseError {
    fn from(e: BuildError) -> Self {
        Self::ReadError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildError {
    SectionSizeTooSmall(usize),
    SectionOutOfBounds(usize),
}

impl Error for BuildError {}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::SectionSizeTooSmall(i) => write!(f, "Section size is too small: {i}"),
            Self::SectionOutOfBounds(i) => {
                write!(f, "Section extends beyond the end of the message: {i}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodeError {
    LengthMismatch,
}

impl Error for DecodeError {}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::LengthMismatch => write!(f, "Length mismatch during decoding"),
        }
    }
}
