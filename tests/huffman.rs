use std::collections::HashSet;

use huffman_codec::CodingError;
use proptest::prelude::*;
use unicode_segmentation::*;

#[test]
fn empty_input_is_rejected() {
    assert_eq!(huffman_codec::encode(""), Err(CodingError::EmptyInput));
}

proptest! {
    #[test]
    fn frequencies(input in any::<String>()) {
        let freqs = huffman_codec::frequencies(input.as_str());
        let graphemes = UnicodeSegmentation::graphemes(input.as_str(), true).collect::<Vec<&str>>();
        // The sum of the frequencies of all the symbols is equal to the
        // length of the input.
        assert_eq!(freqs.iter().fold(0, |acc, ch| acc + ch.1), graphemes.len());
        let graphemes = graphemes.into_iter().collect::<HashSet<&str>>();
        // The cardinality of the frequencies vector is equal to that of the
        // set of the symbols of the input.
        assert_eq!(freqs.len(), graphemes.len());
        // All the elements of the set of the symbols of the input
        // are present in the frequencies vector.
        graphemes.iter().for_each(|&g| assert!(freqs.iter().any(|x| x.0 == g)));
        // The frequencies list is sorted in descending order.
        (1..freqs.len()).for_each(|i| assert!(freqs[i].1 <= freqs[i-1].1))
    }

    #[test]
    fn codes(input in ".+") {
        let tree = huffman_codec::build_tree(&huffman_codec::frequencies(&input)).unwrap();
        let codes = huffman_codec::code_table(&tree);
        // All the symbols in the input have a non-empty code.
        UnicodeSegmentation::graphemes(input.as_str(), true)
            .collect::<HashSet<&str>>()
            .iter()
            .for_each(|&g| assert!(!codes.get(g).unwrap().is_empty()));
        // Kraft's equality holds:
        // https://en.wikipedia.org/wiki/Kraft%E2%80%93McMillan_inequality
        let krafts_sum: f64 = codes.values().map(|c| 2f64.powi(-(c.len() as i32))).sum();
        if codes.len() == 1 {
            assert!((krafts_sum - 0.5).abs() < 1e-9);
        } else {
            assert!((krafts_sum - 1.0).abs() < 1e-9);
        }
        // The codes are instantaneously decodable if no code is a prefix of
        // another.
        codes.iter()
            .for_each(|(k1, v1)| codes.iter().for_each(|(k2, v2)| assert!(!v2.starts_with(v1.as_bitslice()) || k1 == k2)));
    }

    #[test]
    fn roundtrip(input in ".+") {
        let (tree, _codes, encoded) = huffman_codec::encode(&input).unwrap();
        prop_assert_eq!(huffman_codec::decode(&tree, &encoded).unwrap(), input);
    }

    #[test]
    fn truncated(input in ".+") {
        let distinct = UnicodeSegmentation::graphemes(input.as_str(), true).collect::<HashSet<&str>>();
        prop_assume!(distinct.len() >= 2);

        let (tree, codes, mut encoded) = huffman_codec::encode(&input).unwrap();
        let last = UnicodeSegmentation::graphemes(input.as_str(), true)
            .last()
            .unwrap();
        encoded.pop();
        let result = huffman_codec::decode(&tree, &encoded);
        if codes.get(last).unwrap().len() >= 2 {
            // The stream now ends mid-code, which must be reported, never
            // silently truncated.
            prop_assert!(matches!(result, Err(CodingError::MalformedBitstream(_))));
        } else {
            // A one-bit final code disappears entirely; what remains is a
            // valid stream for the input minus its last symbol.
            prop_assert_eq!(result.unwrap(), &input[..input.len() - last.len()]);
        }
    }
}
