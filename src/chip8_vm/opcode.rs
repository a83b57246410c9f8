/// A fetched instruction word split into the fields every handler reads.
///
/// `address` is the instruction class (top nibble), not a memory address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub address: u8,
    pub nnn: u16,
    pub n: u8,
    pub x: usize,
    pub y: usize,
    pub kk: u8,
}

pub fn decode(word: u16) -> Opcode {
    Opcode {
        address: (word >> 12) as u8,
        nnn: word & 0x0FFF,
        n: (word & 0x000F) as u8,
        x: ((word >> 8) & 0x000F) as usize,
        y: ((word >> 4) & 0x000F) as usize,
        kk: (word & 0x00FF) as u8,
    }
}
