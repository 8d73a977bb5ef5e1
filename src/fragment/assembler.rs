//! Final concatenation of a complete fragment set.

use bytes::{Bytes, BytesMut};

use super::{CompletionState, FragmentSet};

/// A reassembled response body and the status word of its last fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledResponse {
    status: u16,
    data: Bytes,
    fragment_count: usize,
}

impl AssembledResponse {
    /// Status word carried by the terminal fragment.
    #[must_use]
    pub const fn status(&self) -> u16 { self.status }

    /// Response payload.
    #[must_use]
    pub fn data(&self) -> &Bytes { &self.data }

    /// Consume the response and return its payload.
    #[must_use]
    pub fn into_data(self) -> Bytes { self.data }

    /// Number of packets the response was reassembled from.
    #[must_use]
    pub const fn fragment_count(&self) -> usize { self.fragment_count }
}

/// Stateless joiner for complete fragment sets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Concatenate `fragments` once the response is complete.
    ///
    /// A response is complete when the terminal fragment has been accepted
    /// and the held fragments cover every byte from offset zero to the end of
    /// the terminal fragment. Returns `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use ntp_mode6::fragment::{CompletionState, Fragment, FragmentSet, ResponseAssembler};
    ///
    /// let mut set = FragmentSet::with_capacity(4);
    /// set.insert(Fragment::new(4, Bytes::from_static(b"efgh")).expect("fits"))
    ///     .expect("room");
    /// set.insert(Fragment::new(0, Bytes::from_static(b"abcd")).expect("fits"))
    ///     .expect("room");
    ///
    /// let done = CompletionState::terminal(0x0615);
    /// let response = ResponseAssembler::assemble(&set, done).expect("complete");
    /// assert_eq!(response.data().as_ref(), b"abcdefgh");
    /// assert_eq!(response.status(), 0x0615);
    /// ```
    #[must_use]
    pub fn assemble(fragments: &FragmentSet, completion: CompletionState) -> Option<AssembledResponse> {
        if !completion.last_fragment_seen() {
            return None;
        }
        let len = fragments.contiguous_len()?;
        let mut data = BytesMut::with_capacity(len);
        for fragment in fragments.iter() {
            data.extend_from_slice(fragment.payload());
        }
        Some(AssembledResponse {
            status: completion.status(),
            data: data.freeze(),
            fragment_count: fragments.len(),
        })
    }
}
