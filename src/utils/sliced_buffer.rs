/*!
# Sliced Buffers

Storage behind [`CsrGraph`](crate::repr::CsrGraph): one flat `buffer` holding every run
back to back, and a non-decreasing `offsets` array where run `i` is
`buffer[offsets[i]..offsets[i + 1]]`.

### Invariants
Checked once in [`SlicedBuffer::new`]:

1. `offsets.len() >= 2` and `offsets[0] == 0`
2. `offsets` is non-decreasing
3. the last offset equals `buffer.len()`

Lookups by index therefore never need to re-check the range of a run. [`SlicedBuffer::get`]
is the total variant and returns `None` for run indices past the end.
*/

use std::ops::Index;

use stream_bitset::PrimIndex;

/// Flat buffer partitioned into consecutive runs.
#[derive(Debug, Clone)]
pub struct SlicedBuffer<T, I>
where
    I: PrimIndex,
{
    buffer: Vec<T>,
    offsets: Vec<I>,
}

impl<T, I: PrimIndex> Default for SlicedBuffer<T, I> {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            offsets: vec![I::zero()],
        }
    }
}

impl<T, I> SlicedBuffer<T, I>
where
    I: PrimIndex,
{
    /// Constructs a new `SlicedBuffer` with `offsets.len() - 1` runs.
    ///
    /// # Panics
    /// Panics if `offsets` is empty, does not start at zero, is not sorted,
    /// or does not end at `buffer.len()`.
    pub fn new(buffer: Vec<T>, offsets: Vec<I>) -> Self {
        assert!(!offsets.is_empty());
        assert!(offsets[0] == I::zero());
        assert!(offsets.is_sorted());
        assert_eq!(offsets[offsets.len() - 1].to_usize(), Some(buffer.len()));

        Self { buffer, offsets }
    }

    /// Returns the number of runs.
    ///
    /// # Examples
    /// ```
    /// use utraverse::utils::sliced_buffer::SlicedBuffer;
    ///
    /// let sb = SlicedBuffer::new(vec![1u32, 2, 4, 5, 6, 7, 8], vec![0u32, 2, 4, 7]);
    /// assert_eq!(sb.len(), 3);
    /// ```
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns *true* if there are no runs
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total number of entries over all runs.
    #[inline(always)]
    pub fn number_of_entries(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the length of run `u`, or `0` if there is no such run.
    ///
    /// # Examples
    /// ```
    /// use utraverse::utils::sliced_buffer::SlicedBuffer;
    ///
    /// let sb = SlicedBuffer::new(vec![1u32, 2, 4, 5, 6, 7, 8], vec![0u32, 2, 4, 7]);
    /// assert_eq!(sb.size_of(2u8), 3);
    /// assert_eq!(sb.size_of(3u8), 0);
    /// ```
    #[inline(always)]
    pub fn size_of<Idx: PrimIndex>(&self, u: Idx) -> usize {
        self.get(u).map_or(0, <[T]>::len)
    }

    /// Returns run `u`, or `None` if `u` is out of range.
    ///
    /// # Examples
    /// ```
    /// use utraverse::utils::sliced_buffer::SlicedBuffer;
    ///
    /// let sb = SlicedBuffer::new(vec![1u32, 2, 4, 5, 6, 7, 8], vec![0u32, 2, 4, 7]);
    /// assert_eq!(sb.get(1u32), Some(&[4u32, 5][..]));
    /// assert_eq!(sb.get(7u32), None);
    /// ```
    #[inline(always)]
    pub fn get<Idx: PrimIndex>(&self, u: Idx) -> Option<&[T]> {
        let u = u.to_usize()?;
        if u >= self.len() {
            return None;
        }

        let start = self.offsets[u].to_usize()?;
        let end = self.offsets[u + 1].to_usize()?;

        // valid range within `buffer` by the invariants established in `new`
        Some(unsafe { self.buffer.get_unchecked(start..end) })
    }

    /// Returns a reference to the complete buffer.
    #[inline(always)]
    pub fn raw_buffer_slice(&self) -> &[T] {
        &self.buffer
    }

    /// Returns a reference to the offsets array (`len() + 1` entries).
    #[inline(always)]
    pub fn raw_offset_slice(&self) -> &[I] {
        &self.offsets
    }
}

impl<T, I, Idx> Index<Idx> for SlicedBuffer<T, I>
where
    I: PrimIndex,
    Idx: PrimIndex,
{
    type Output = [T];

    /// # Panics
    /// Panics if `idx` is out of range.
    #[inline(always)]
    fn index(&self, idx: Idx) -> &Self::Output {
        match self.get(idx) {
            Some(run) => run,
            None => panic!("run index out of range ({} runs)", self.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_runs() {
        let sb: SlicedBuffer<u32, u32> = SlicedBuffer::new(vec![9], vec![0, 0, 1, 1]);
        assert_eq!(sb.len(), 3);
        assert!(sb[0u32].is_empty());
        assert_eq!(&sb[1u32], &[9]);
        assert!(sb[2u32].is_empty());
        assert_eq!(sb.number_of_entries(), 1);

        let empty: SlicedBuffer<u32, u32> = SlicedBuffer::default();
        assert!(empty.is_empty());
        assert_eq!(empty.get(0u32), None);
    }

    #[test]
    #[should_panic]
    fn rejects_unsorted_offsets() {
        SlicedBuffer::new(vec![1u32, 2, 3], vec![0u32, 2, 1, 3]);
    }

    #[test]
    #[should_panic]
    fn rejects_short_buffer() {
        SlicedBuffer::new(vec![1u32, 2], vec![0u32, 3]);
    }
}
