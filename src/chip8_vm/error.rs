use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackFault {
    Overflow,
    Underflow,
}

#[derive(Debug)]
pub enum Chip8Error {
    Io(std::io::Error),
    LoadTooLarge { size: usize, max: usize },
    StackFault(StackFault),
    MemoryFault(usize),
    InvalidScale {
        logical: (usize, usize),
        output: (usize, usize),
    },
    InvalidArgument(&'static str),
    Presentation(String),
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::LoadTooLarge { size, max } => {
                write!(f, "program too large: {size} bytes (max {max})")
            }
            Self::StackFault(StackFault::Overflow) => {
                write!(f, "call instruction with full stack")
            }
            Self::StackFault(StackFault::Underflow) => {
                write!(f, "return instruction with empty stack")
            }
            Self::MemoryFault(address) => {
                write!(f, "address outside of memory: 0x{address:03x}")
            }
            Self::InvalidScale { logical, output } => write!(
                f,
                "output {}x{} is not a positive integer multiple of {}x{}",
                output.0, output.1, logical.0, logical.1
            ),
            Self::InvalidArgument(argument) => write!(f, "invalid argument: {argument}"),
            Self::Presentation(message) => write!(f, "presentation error: {message}"),
        }
    }
}

impl std::error::Error for Chip8Error {}

impl From<std::io::Error> for Chip8Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
