use crate::error::BlobDefect;

/**
    Bounds-checked forward cursor over an immutable byte slice.

    Every read either returns exactly the requested bytes or fails with
    [`BlobDefect::Truncated`], reporting the total length that would have
    been required.
*/
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], BlobDefect> {
        let end = self.pos.checked_add(len).ok_or(BlobDefect::Truncated {
            expected: usize::MAX,
            actual: self.data.len(),
        })?;
        let out = self.data.get(self.pos..end).ok_or(BlobDefect::Truncated {
            expected: end,
            actual: self.data.len(),
        })?;
        self.pos = end;
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, BlobDefect> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16_le(&mut self) -> Result<u16, BlobDefect> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32, BlobDefect> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /**
        Fail unless every byte has been consumed.
    */
    pub fn finish(self) -> Result<(), BlobDefect> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(BlobDefect::TrailingBytes(n)),
        }
    }
}
