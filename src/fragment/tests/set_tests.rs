//! Tests for ordered fragment storage.

use bytes::Bytes;
use rstest::rstest;

use crate::fragment::{Fragment, FragmentSet, Insertion, ResourceExhausted};

fn piece(offset: u16, len: usize) -> Fragment {
    Fragment::new(offset, Bytes::from(vec![0xaa; len])).expect("length fits u16")
}

fn offsets(set: &FragmentSet) -> Vec<u16> { set.iter().map(Fragment::offset).collect() }

#[test]
fn fragments_are_kept_in_offset_order() {
    let mut set = FragmentSet::with_capacity(8);
    for offset in [8, 0, 16, 4] {
        assert_eq!(set.insert(piece(offset, 4)), Ok(Insertion::Inserted));
    }
    assert_eq!(offsets(&set), vec![0, 4, 8, 16]);
}

#[test]
fn duplicate_offset_is_reported_and_not_stored() {
    let mut set = FragmentSet::with_capacity(4);
    set.insert(piece(0, 4)).expect("room");
    assert_eq!(
        set.insert(piece(0, 8)),
        Ok(Insertion::Duplicate { prior_count: 4 })
    );
    assert_eq!(set.len(), 1);
    assert_eq!(set.iter().next().map(Fragment::count), Some(4));
}

#[rstest]
#[case::runs_into_next(2, 4, 4, 4)]
#[case::starts_inside_previous(6, 4, 4, 4)]
#[case::swallows_next(1, 12, 4, 4)]
fn overlapping_ranges_are_rejected(
    #[case] offset: u16,
    #[case] len: usize,
    #[case] existing_offset: u16,
    #[case] existing_count: u16,
) {
    let mut set = FragmentSet::with_capacity(4);
    set.insert(piece(4, 4)).expect("room");
    assert_eq!(
        set.insert(piece(offset, len)),
        Ok(Insertion::Overlap {
            existing_offset,
            existing_count,
        })
    );
    assert_eq!(set.len(), 1);
}

#[test]
fn adjacent_ranges_do_not_overlap() {
    let mut set = FragmentSet::with_capacity(4);
    set.insert(piece(4, 4)).expect("room");
    assert_eq!(set.insert(piece(0, 4)), Ok(Insertion::Inserted));
    assert_eq!(set.insert(piece(8, 4)), Ok(Insertion::Inserted));
    assert_eq!(set.contiguous_len(), Some(12));
}

#[rstest]
#[case::duplicate(piece(0, 4), Ok(Insertion::Duplicate { prior_count: 4 }))]
#[case::overlap(
    piece(2, 4),
    Ok(Insertion::Overlap { existing_offset: 0, existing_count: 4 })
)]
#[case::new_fragment(piece(8, 4), Err(ResourceExhausted::TooManyFragments { limit: 2 }))]
fn full_set_only_rejects_fragments_it_would_store(
    #[case] fragment: Fragment,
    #[case] expected: Result<Insertion, ResourceExhausted>,
) {
    let mut set = FragmentSet::with_capacity(2);
    set.insert(piece(0, 4)).expect("room");
    set.insert(piece(4, 4)).expect("room");
    assert_eq!(set.insert(fragment), expected);
    assert_eq!(offsets(&set), vec![0, 4]);
}

#[rstest]
#[case::empty(&[], None)]
#[case::missing_start(&[(4, 4)], None)]
#[case::gap(&[(0, 4), (8, 4)], None)]
#[case::single_empty(&[(0, 0)], Some(0))]
#[case::gapless(&[(0, 4), (4, 2), (6, 10)], Some(16))]
fn contiguous_len_requires_gapless_cover_from_zero(
    #[case] pieces: &[(u16, usize)],
    #[case] expected: Option<usize>,
) {
    let mut set = FragmentSet::with_capacity(8);
    for &(offset, len) in pieces {
        set.insert(piece(offset, len)).expect("room");
    }
    assert_eq!(set.contiguous_len(), expected);
}
