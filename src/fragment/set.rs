//! Offset-ordered storage for accepted response fragments.

use bytes::Bytes;

use super::ResourceExhausted;

/// One slice of a response payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    offset: u16,
    count: u16,
    payload: Bytes,
}

impl Fragment {
    /// Wrap `payload` as the bytes found at `offset`.
    ///
    /// Returns `None` when the payload length does not fit the 16-bit
    /// `count` field.
    #[must_use]
    pub fn new(offset: u16, payload: Bytes) -> Option<Self> {
        let count = u16::try_from(payload.len()).ok()?;
        Some(Self {
            offset,
            count,
            payload,
        })
    }

    /// Position of the first byte within the response.
    #[must_use]
    pub const fn offset(&self) -> u16 { self.offset }

    /// Number of payload bytes carried.
    #[must_use]
    pub const fn count(&self) -> u16 { self.count }

    /// Payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// One past the last byte covered, in response coordinates.
    #[must_use]
    pub const fn end(&self) -> usize { self.offset as usize + self.count as usize }
}

/// Result of filing a fragment into a [`FragmentSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The fragment is now held.
    Inserted,
    /// A fragment already starts at the same offset; the new one is dropped.
    Duplicate {
        /// Size of the fragment already held.
        prior_count: u16,
    },
    /// The fragment's range intersects a neighbour; the new one is dropped.
    Overlap {
        /// Offset of the colliding neighbour.
        existing_offset: u16,
        /// Size of the colliding neighbour.
        existing_count: u16,
    },
}

/// Fragments of one response, kept sorted by offset.
///
/// Offsets are unique and ranges never intersect. The set refuses to grow
/// beyond the capacity it was created with.
#[derive(Clone, Debug, Default)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
    capacity: usize,
}

impl FragmentSet {
    /// Create an empty set able to hold `capacity` fragments.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of fragments held.
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether no fragment has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.fragments.is_empty() }

    /// Iterate over the held fragments in offset order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> { self.fragments.iter() }

    /// File `fragment` at its sorted position.
    ///
    /// Duplicates and overlaps are classified first; only a fragment that
    /// would actually be stored counts against the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceExhausted::TooManyFragments`] when a new fragment
    /// arrives while the set is full.
    pub fn insert(&mut self, fragment: Fragment) -> Result<Insertion, ResourceExhausted> {
        let at = self
            .fragments
            .partition_point(|held| held.offset < fragment.offset);

        if let Some(held) = self.fragments.get(at)
            && held.offset == fragment.offset
        {
            return Ok(Insertion::Duplicate {
                prior_count: held.count,
            });
        }

        let before = at.checked_sub(1).and_then(|i| self.fragments.get(i));
        if let Some(prev) = before
            && prev.end() > usize::from(fragment.offset)
        {
            return Ok(Self::overlap(prev));
        }
        if let Some(next) = self.fragments.get(at)
            && fragment.end() > usize::from(next.offset)
        {
            return Ok(Self::overlap(next));
        }

        if self.fragments.len() >= self.capacity {
            return Err(ResourceExhausted::TooManyFragments {
                limit: self.capacity,
            });
        }
        self.fragments.insert(at, fragment);
        Ok(Insertion::Inserted)
    }

    /// Length of the response if the held fragments cover `[0, end)` with no
    /// gaps, `None` otherwise.
    #[must_use]
    pub fn contiguous_len(&self) -> Option<usize> {
        let first = self.fragments.first()?;
        if first.offset != 0 {
            return None;
        }
        self.fragments
            .windows(2)
            .all(|pair| pair[0].end() == usize::from(pair[1].offset))
            .then(|| self.fragments.last().map_or(0, Fragment::end))
    }

    const fn overlap(existing: &Fragment) -> Insertion {
        Insertion::Overlap {
            existing_offset: existing.offset,
            existing_count: existing.count,
        }
    }
}
