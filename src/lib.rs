//! # Huffman codec
//!
//! `huffman-codec` is a crate to encode information with minimum-redundancy
//! prefix codes using the [Huffman coding](https://en.wikipedia.org/wiki/Huffman_coding)
//! algorithm.
//!
//! The pipeline is the classic three stages: count symbol [`frequencies`],
//! [`build_tree`] merges the two lightest pending subtrees until a single
//! root remains, and [`code_table`] labels each root-to-leaf path with bits
//! (left edge `0`, right edge `1`). [`encode_with`] concatenates the codes of
//! an input sequence; [`decode`] walks the same tree bit by bit to recover
//! the original text. The tree is the one artifact shared by both sides, so
//! a decode must use the tree the stream was encoded with.
//!
//! Ties between equal-weight subtrees are broken by creation order (see
//! [`build_tree`]), which makes the whole pipeline deterministic: identical
//! input always yields an identical tree, code table, and bitstream.
//!
//! ## References
//!
//! * _Huffman, D.A., 1952. A method for the construction of minimum-redundancy codes. Proceedings of the IRE, 40(9), pp.1098-1101._
//! * _Hamming, R.R., 1997. Art of doing science and engineering: Learning to learn. CRC Press._

use std::collections::{BinaryHeap, HashMap};

use bitvec::prelude::*;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Errors reported by the coding pipeline.
///
/// All operations here are pure functions over finite input; a failure is
/// always returned to the caller, never retried or swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodingError {
    /// No tree can be built from an empty input.
    #[error("cannot build a code from an empty input")]
    EmptyInput,
    /// The encoder was handed a symbol the code table has no entry for,
    /// which means the table was derived from different input.
    #[error("no code assigned to symbol {0:?}")]
    UnknownSymbol(String),
    /// The bitstream ran out in the middle of a code. Carries the trailing
    /// bits that could not be decoded.
    #[error("bitstream ends mid-code with {} undecodable trailing bit(s)", .0.len())]
    MalformedBitstream(Encoded),
}

/// An encoded bitstream is represented as a
/// [`bitvec::vec::BitVec`](https://docs.rs/bitvec/1.0.1/bitvec/vec/struct.BitVec.html),
/// a contiguous array of bits.
pub type Encoded = BitVec;

/// Mapping from a symbol
/// ([a Unicode grapheme cluster](http://www.unicode.org/reports/tr29/#Grapheme_Cluster_Boundaries))
/// to its code, the bit-string labeling its root-to-leaf path. Codes built
/// from a tree are prefix-free by construction: leaf paths cannot prefix one
/// another.
pub type CodeTable = HashMap<String, Encoded>;

const ZERO: bool = false;
const ONE: bool = true;

/// A Huffman tree: a strict binary tree whose leaves carry the symbols being
/// coded, weighted by frequency.
///
/// An internal node always owns exactly two children, so "leaf if and only
/// if no children" holds for every value of this type; a one-child node or a
/// leaf with children is unrepresentable. The decoder relies on that
/// invariant to recognize the end of one symbol's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    /// A leaf holds one symbol and its occurrence count.
    Leaf {
        /// The symbol this leaf codes for.
        symbol: String,
        /// Number of occurrences in the input the tree was built from.
        weight: usize,
    },
    /// An internal node aggregates the weights of its two subtrees.
    Node {
        /// Sum of the weights of all leaves below this node.
        weight: usize,
        /// Subtree reached by a `0` bit.
        left: Box<Tree>,
        /// Subtree reached by a `1` bit.
        right: Box<Tree>,
    },
}

impl Tree {
    /// Aggregate frequency of this subtree.
    pub fn weight(&self) -> usize {
        match self {
            Tree::Leaf { weight, .. } => *weight,
            Tree::Node { weight, .. } => *weight,
        }
    }
}

/// Creates and returns an ordered list of pairs of the symbols found in the
/// input with their count, ordered in decreasing frequency.
///
/// An empty input yields an empty list; [`build_tree`] is the stage that
/// rejects it.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// let freqs = huffman_codec::frequencies("huffman");
/// let mut iter = freqs.iter();
///
/// assert_eq!(iter.next(), Some(&("f", 2)));
/// assert_eq!(iter.next(), Some(&("a", 1)));
/// assert_eq!(iter.next(), Some(&("h", 1)));
/// assert_eq!(iter.next(), Some(&("m", 1)));
/// assert_eq!(iter.next(), Some(&("n", 1)));
/// assert_eq!(iter.next(), Some(&("u", 1)));
/// assert_eq!(iter.next(), None);
/// ```
pub fn frequencies(s: &str) -> Vec<(&str, usize)> {
    let mut freq = HashMap::new();

    for g in UnicodeSegmentation::graphemes(s, true) {
        *(freq.entry(g).or_insert(0)) += 1;
    }
    let mut symbols = freq.into_iter().collect::<Vec<(&str, usize)>>();
    symbols.sort_by(|a, b| {
        // The ordering by comparing the symbols here in case the
        // frequencies are equal is only to ensure that the algorithm
        // is deterministic, regardless of the order in which the
        // symbols appear in the input stream.
        b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
    });
    symbols
}

/// Builds the Huffman tree for a frequency list.
///
/// Maintains a min-priority queue of pending subtrees, initially one leaf
/// per symbol, and repeatedly merges the two lightest into an internal node
/// whose weight is their sum, until one root remains. The first subtree
/// popped becomes the left child, the second the right. Among all binary
/// prefix trees over these weights, the result minimizes the weighted path
/// length (sum over leaves of weight × depth).
///
/// Tie-break policy: entries of equal weight leave the queue in creation
/// order — leaves in the order the frequency list presents them, then merged
/// nodes in the order they were formed. Two runs over identical input
/// therefore produce identical trees.
///
/// A single-entry list yields the lone leaf as the root, with no internal
/// nodes; [`code_table`] still assigns that symbol a non-empty code.
///
/// # Errors
///
/// Returns [`CodingError::EmptyInput`] if the frequency list is empty.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use huffman_codec::*;
///
/// let tree = build_tree(&frequencies("aaaabbcc")).unwrap();
/// assert_eq!(tree.weight(), 8);
///
/// assert_eq!(build_tree(&[]), Err(CodingError::EmptyInput));
/// ```
pub fn build_tree(frequencies: &[(&str, usize)]) -> Result<Tree, CodingError> {
    if frequencies.is_empty() {
        return Err(CodingError::EmptyInput);
    }

    let mut heap = BinaryHeap::with_capacity(frequencies.len());
    for (seq, &(symbol, weight)) in frequencies.iter().enumerate() {
        heap.push(Pending {
            weight,
            seq,
            tree: Tree::Leaf {
                symbol: symbol.to_string(),
                weight,
            },
        });
    }

    let mut seq = frequencies.len();
    while heap.len() > 1 {
        let left = heap.pop().expect("checked with while loop condition");
        let right = heap.pop().expect("checked with while loop condition");
        let weight = left.weight + right.weight;
        heap.push(Pending {
            weight,
            seq,
            tree: Tree::Node {
                weight,
                left: Box::new(left.tree),
                right: Box::new(right.tree),
            },
        });
        seq += 1;
    }

    let root = heap.pop().expect("non-empty input leaves exactly one entry");
    Ok(root.tree)
}

/// Assigns every leaf symbol of `root` its code via depth-first traversal:
/// each left edge on the path appends a `0` bit, each right edge a `1`.
///
/// A root that is itself a leaf has no path to label; its symbol is pinned
/// to the single-bit code `0`, since an empty code could not be seen in a
/// bitstream. [`decode`] applies the same convention.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use bitvec::prelude::*;
/// use huffman_codec::*;
///
/// let tree = build_tree(&frequencies("aaaabbcc")).unwrap();
/// let codes = code_table(&tree);
/// assert_eq!(codes["a"], bitvec![0]);
/// assert_eq!(codes["b"], bitvec![1, 0]);
/// assert_eq!(codes["c"], bitvec![1, 1]);
/// ```
pub fn code_table(root: &Tree) -> CodeTable {
    let mut codes = CodeTable::new();
    match root {
        Tree::Leaf { symbol, .. } => {
            codes.insert(symbol.clone(), bitvec![0]);
        }
        Tree::Node { .. } => assign(root, &Encoded::new(), &mut codes),
    }
    codes
}

// Recursive path labeling. Whenever a leaf is reached, the prefix
// accumulated along the path from the root is that symbol's code.
fn assign(node: &Tree, prefix: &Encoded, codes: &mut CodeTable) {
    match node {
        Tree::Leaf { symbol, .. } => {
            codes.insert(symbol.clone(), prefix.clone());
        }
        Tree::Node { left, right, .. } => {
            let mut lprefix = prefix.clone();
            lprefix.push(ZERO);
            assign(left, &lprefix, codes);
            let mut rprefix = prefix.clone();
            rprefix.push(ONE);
            assign(right, &rprefix, codes);
        }
    }
}

/// Encodes an input by concatenating the code of each of its symbols, in
/// sequence order.
///
/// # Errors
///
/// Returns [`CodingError::UnknownSymbol`] if a symbol of the input has no
/// entry in `codes`. This cannot happen when the table was built from the
/// same input's frequencies; it signals a stale or foreign code table.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use bitvec::prelude::*;
/// use huffman_codec::*;
///
/// let tree = build_tree(&frequencies("baba")).unwrap();
/// let codes = code_table(&tree);
/// assert_eq!(encode_with("baba", &codes).unwrap(), bitvec![1, 0, 1, 0]);
///
/// assert_eq!(
///     encode_with("cab", &codes),
///     Err(CodingError::UnknownSymbol("c".to_string()))
/// );
/// ```
pub fn encode_with(s: &str, codes: &CodeTable) -> Result<Encoded, CodingError> {
    let mut encoded = Encoded::new();
    for g in UnicodeSegmentation::graphemes(s, true) {
        let code = codes
            .get(g)
            .ok_or_else(|| CodingError::UnknownSymbol(g.to_string()))?;
        encoded.extend_from_bitslice(code.as_bitslice());
    }
    Ok(encoded)
}

/// Runs the whole pipeline over one input: counts its frequencies, builds
/// the tree and code table from them, and encodes the input. Returns all
/// three, since the tree is needed again to [`decode`].
///
/// # Errors
///
/// Returns [`CodingError::EmptyInput`] for an empty input.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use bitvec::prelude::*;
/// use huffman_codec::*;
///
/// let (tree, codes, encoded) = encode("baba").unwrap();
/// assert_eq!(encoded, bitvec![1, 0, 1, 0]);
/// assert_eq!(codes.len(), 2);
/// assert_eq!(decode(&tree, &encoded).unwrap(), "baba");
/// ```
pub fn encode(s: &str) -> Result<(Tree, CodeTable, Encoded), CodingError> {
    let tree = build_tree(&frequencies(s))?;
    let codes = code_table(&tree);
    let encoded = encode_with(s, &codes)?;
    Ok((tree, codes, encoded))
}

/// Decodes a bitstream against the tree it was encoded with, by repeated
/// root-to-leaf traversal: a `0` bit moves left, a `1` bit moves right, and
/// reaching a leaf emits its symbol and resets the walk to the root.
///
/// A lone-leaf tree has no edges to walk; each `0` bit then stands for one
/// occurrence of the single symbol, matching the code [`code_table`] pins
/// for it.
///
/// # Errors
///
/// Returns [`CodingError::MalformedBitstream`] when the stream does not end
/// exactly at a leaf: it was truncated mid-code, is empty against a
/// multi-leaf tree, or holds a `1` bit against a lone-leaf tree. The payload
/// is the trailing bits that could not be decoded. No partial output is ever
/// returned.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use huffman_codec::*;
///
/// let (tree, _codes, encoded) = encode("huffman").unwrap();
/// assert_eq!(decode(&tree, &encoded).unwrap(), "huffman");
/// ```
///
/// Truncating a stream mid-code is reported, not silently dropped:
///
/// ```
/// use bitvec::prelude::*;
/// use huffman_codec::*;
///
/// let (tree, _codes, mut encoded) = encode("abacabad").unwrap();
/// encoded.pop();
/// assert_eq!(
///     decode(&tree, &encoded).expect_err("stream ends mid-code"),
///     CodingError::MalformedBitstream(bitvec![1, 1])
/// );
/// ```
pub fn decode(root: &Tree, encoded: &BitSlice) -> Result<String, CodingError> {
    if let Tree::Leaf { symbol, .. } = root {
        let mut decoded = String::new();
        for (i, bit) in encoded.iter().by_vals().enumerate() {
            if bit != ZERO {
                return Err(CodingError::MalformedBitstream(encoded[i..].to_bitvec()));
            }
            decoded.push_str(symbol);
        }
        return Ok(decoded);
    }

    // A multi-leaf tree can only have come from a non-empty input, so an
    // empty stream here is a truncation, not an empty message.
    if encoded.is_empty() {
        return Err(CodingError::MalformedBitstream(Encoded::new()));
    }

    let mut decoded = String::new();
    let mut current = root;
    let mut start = 0;
    for (i, bit) in encoded.iter().by_vals().enumerate() {
        current = match current {
            Tree::Node { left, right, .. } => {
                if bit == ZERO {
                    left
                } else {
                    right
                }
            }
            Tree::Leaf { .. } => {
                unreachable!("the walk resets to the root after every emitted symbol")
            }
        };
        if let Tree::Leaf { symbol, .. } = current {
            decoded.push_str(symbol);
            current = root;
            start = i + 1;
        }
    }
    if start != encoded.len() {
        return Err(CodingError::MalformedBitstream(encoded[start..].to_bitvec()));
    }
    Ok(decoded)
}

// A subtree waiting in the builder's priority queue, tagged with its
// creation sequence number.
struct Pending {
    weight: usize,
    seq: usize,
    tree: Tree,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Both fields compare flipped: BinaryHeap is a max-heap, and the
        // entry popped next must be the lightest one, oldest first among
        // equal weights.
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl Eq for Pending {}
