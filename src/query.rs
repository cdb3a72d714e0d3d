// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering and parsing of the `?k=v&k=v` query component.

use crate::percent;

/// An ordered, duplicate-preserving list of decoded query pairs.
pub type QueryPairs = Vec<(Vec<u8>, Vec<u8>)>;

/// Parses a raw (not yet percent-decoded) query string, as found after `?` and before any
/// `#` fragment. An absent `=` within a segment yields an empty value; empty input yields
/// an empty list.
pub fn parse(raw: &[u8]) -> QueryPairs {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b'&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.iter().position(|&b| b == b'=') {
            Some(eq) => (
                percent::decode_form(&segment[..eq]),
                percent::decode_form(&segment[eq + 1..]),
            ),
            None => (percent::decode_form(segment), Vec::new()),
        })
        .collect()
}

/// Renders decoded query pairs back into a wire-ready `k=v&k=v` string (without the
/// leading `?`). Values use the space-as-`+` form encoding. A pair with an empty value is
/// rendered as bare `k` (no trailing `=`), matching the request serialiser's convention.
pub fn render(pairs: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push(b'&');
        }
        out.extend_from_slice(&percent::encode_form(k));
        if !v.is_empty() {
            out.push(b'=');
            out.extend_from_slice(&percent::encode_form(v));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_plus_and_percent() {
        let pairs = parse(b"x=1&y=two%20words");
        assert_eq!(
            pairs,
            vec![
                (b"x".to_vec(), b"1".to_vec()),
                (b"y".to_vec(), b"two words".to_vec()),
            ]
        );
    }

    #[test]
    fn parse_absent_equals_is_empty_value() {
        assert_eq!(parse(b"flag"), vec![(b"flag".to_vec(), Vec::new())]);
    }

    #[test]
    fn parse_preserves_order_and_duplicates() {
        let pairs = parse(b"a=1&a=2&b=3");
        assert_eq!(
            pairs,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"a".to_vec(), b"2".to_vec()),
                (b"b".to_vec(), b"3".to_vec()),
            ]
        );
    }

    #[test]
    fn render_uses_plus_for_space_and_omits_bare_equals() {
        let rendered = render(&[
            (b"x".to_vec(), b"1".to_vec()),
            (b"y".to_vec(), b"two words".to_vec()),
        ]);
        assert_eq!(rendered, b"x=1&y=two+words");

        let rendered_empty_value = render(&[(b"flag".to_vec(), Vec::new())]);
        assert_eq!(rendered_empty_value, b"flag");
    }
}
