// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Natural ("alphanumeric") ordering of room numbers and names

use std::cmp::Ordering;

use crate::host::RoomInfo;

/// Run of digits or of non-digits
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

/// Compare two digit runs by value, without overflowing on long runs
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Compare strings so that embedded numbers sort by value: `"2" < "10"`, `"A9" < "A10"`
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let x_digits = x.starts_with(|c: char| c.is_ascii_digit());
                let y_digits = y.starts_with(|c: char| c.is_ascii_digit());
                let ord = if x_digits && y_digits {
                    compare_numeric(x, y)
                } else {
                    x.cmp(y)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Sort rooms by number, then by name
pub fn sort_rooms(rooms: &mut [RoomInfo]) {
    rooms.sort_by(|a, b| {
        compare_natural(&a.number, &b.number).then_with(|| compare_natural(&a.name, &b.name))
    });
}
