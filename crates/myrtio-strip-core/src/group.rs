//! Pixel group member lists.
//!
//! A member list is a comma separated sequence of indices and inclusive
//! ranges, e.g. `"0, 2-4,7"`. Whitespace around numbers is ignored.

use heapless::Vec;

use crate::limits::MAX_GROUP_SIZE;

/// Ordered, bounded list of pixel indices within one strip.
pub type Group = Vec<u16, MAX_GROUP_SIZE>;

/// Parse a member list, keeping only indices below `pixel_count`.
///
/// Malformed items and reversed ranges contribute nothing. Parsing stops
/// once the group is full.
pub fn parse_members(spec: &str, pixel_count: usize) -> Group {
    let mut group = Group::new();
    for item in spec.split(',') {
        let Some((start, end)) = parse_item(item) else {
            continue;
        };
        for index in start..=end {
            if usize::from(index) >= pixel_count {
                break;
            }
            if group.push(index).is_err() {
                return group;
            }
        }
    }
    group
}

/// Keep the members of a stored group that are valid for `pixel_count`.
pub fn retain_members(members: &[u16], pixel_count: usize) -> Group {
    members
        .iter()
        .copied()
        .filter(|&index| usize::from(index) < pixel_count)
        .take(MAX_GROUP_SIZE)
        .collect()
}

fn parse_item(item: &str) -> Option<(u16, u16)> {
    match item.split_once('-') {
        Some((start, end)) => Some((parse_index(start)?, parse_index(end)?)),
        None => parse_index(item).map(|index| (index, index)),
    }
}

fn parse_index(raw: &str) -> Option<u16> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
