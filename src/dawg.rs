//! A compiled, read-only word list stored as a directed acyclic word graph.
//!
//! The graph is a flat array of 32-bit [`Edge`] records. Each run of
//! consecutive edges ending in one with the "last" flag is the sorted list
//! of outgoing transitions of one node; an edge's `children` field is the
//! array index of its target node's list, with `0` meaning "no children".
//! The root's list starts at the `start` index given in the file header.
//!
//! # File format
//!
//! ```text
//! "DAWG" <delim> <startIndex> <delim> <numBytes> <delim> <numBytes bytes of edges>
//! ```
//!
//! `startIndex` and `numBytes` are decimal ASCII; every edge is a big-endian
//! `u32` laid out as:
//!
//! | bits  | field                          |
//! |-------|--------------------------------|
//! | 0-4   | letter, `1 = a` .. `26 = z`    |
//! | 5     | last edge of its sibling list  |
//! | 6     | accept: the path is a word     |
//! | 7     | unused                         |
//! | 8-31  | index of the child list        |
//!
//! [`Dawg::to_bytes`] writes `:` as the delimiter; the reader accepts any
//! single byte.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::fmt::Display;

use crate::HashMap;
use crate::error::Error;
use crate::error::Result;
use crate::hash_code::HashCode;
use crate::hash_code::HashOrder;
use crate::hash_code::hash_code_iterable;
use crate::lexicon::scrub;
use crate::text;

/// The four bytes every DAWG file starts with.
pub const MAGIC: &[u8; 4] = b"DAWG";

/// Largest number of edges whose indices fit in the 24-bit child field.
pub const MAX_EDGES: usize = 1 << 24;

const LETTER_MASK: u32 = 0x1F;
const LAST_BIT: u32 = 1 << 5;
const ACCEPT_BIT: u32 = 1 << 6;
const CHILDREN_SHIFT: u32 = 8;

/// One packed transition of the graph.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Edge(u32);

impl Edge {
    fn new(letter: u8, last: bool, accept: bool, children: u32) -> Self {
        let mut bits = u32::from(letter) & LETTER_MASK;
        if last {
            bits |= LAST_BIT;
        }
        if accept {
            bits |= ACCEPT_BIT;
        }
        Self(bits | (children << CHILDREN_SHIFT))
    }

    /// Letter code, `1` for `a` through `26` for `z`.
    pub fn letter(self) -> u8 {
        (self.0 & LETTER_MASK) as u8
    }

    /// The letter as a lowercase ASCII character.
    pub fn char(self) -> char {
        char::from(b'a' + self.letter().saturating_sub(1))
    }

    /// Whether this edge ends its sibling list.
    pub fn is_last(self) -> bool {
        self.0 & LAST_BIT != 0
    }

    /// Whether the path ending with this edge spells a word.
    pub fn accepts(self) -> bool {
        self.0 & ACCEPT_BIT != 0
    }

    /// Index of the child list, `0` if there is none.
    pub fn children(self) -> usize {
        (self.0 >> CHILDREN_SHIFT) as usize
    }

    /// The raw 32-bit record.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Edge")
            .field("letter", &self.char())
            .field("last", &self.is_last())
            .field("accept", &self.accepts())
            .field("children", &self.children())
            .finish()
    }
}

#[inline]
fn letter_code(byte: u8) -> Option<u8> {
    let lower = byte.to_ascii_lowercase();
    lower.is_ascii_lowercase().then(|| lower - b'a' + 1)
}

/// A compiled lexicon.
///
/// # Examples
///
/// ```rust
/// use chainlex::Dawg;
///
/// let dawg = Dawg::from_words(["banana", "a", "aardvark", "ab"]).unwrap();
/// assert!(dawg.contains("aardvark"));
/// assert!(!dawg.contains("aard"));
/// assert!(dawg.contains_prefix("aard"));
///
/// let words: Vec<String> = dawg.iter().collect();
/// assert_eq!(words, ["a", "aardvark", "ab", "banana"]);
/// ```
#[derive(Clone, Default)]
pub struct Dawg {
    edges: Vec<Edge>,
    start: usize,
    words: usize,
}

impl Dawg {
    /// Creates a DAWG with no words.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a DAWG file held in memory.
    ///
    /// Every structural property the traversal relies on is checked, so a
    /// successfully loaded DAWG can never index out of bounds or loop.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
            return Err(Error::BadMagic);
        }

        let mut pos = MAGIC.len();
        skip_delimiter(bytes, &mut pos, "magic")?;
        let start = read_header_number(bytes, &mut pos, "start index")?;
        let num_bytes = read_header_number(bytes, &mut pos, "byte count")?;

        if num_bytes % 4 != 0 {
            return Err(Error::MalformedHeader {
                reason: format!("byte count {num_bytes} is not a multiple of 4"),
            });
        }
        let body = &bytes[pos..];
        if body.len() < num_bytes {
            return Err(Error::TruncatedEdges {
                expected: num_bytes,
                actual: body.len(),
            });
        }

        let edges: Vec<Edge> = body[..num_bytes]
            .chunks_exact(4)
            .map(|chunk| Edge(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])))
            .collect();

        if !edges.is_empty() && start >= edges.len() {
            return Err(Error::MalformedHeader {
                reason: format!("start index {start} outside {} edges", edges.len()),
            });
        }

        validate(&edges)?;
        let words = count_words(&edges, start)?;
        log::info!("loaded DAWG: {} words, {} edges", words, edges.len());

        Ok(Self {
            start: if edges.is_empty() { 0 } else { start },
            edges,
            words,
        })
    }

    /// Reads a DAWG file from `reader`.
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Reads a DAWG file from disk.
    #[cfg(feature = "std")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Builds a minimal DAWG holding `words`.
    ///
    /// Words are scrubbed first (trimmed, lower-cased); any that still
    /// contain a character outside `a-z` are skipped. Duplicates collapse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::Dawg;
    /// #
    /// // "bats", "cats" and "rats" share the whole "ats" tail.
    /// let dawg = Dawg::from_words(["cats", "bats", "rats"]).unwrap();
    /// assert_eq!(dawg.len(), 3);
    /// assert_eq!(dawg.edge_count(), 6);
    /// ```
    pub fn from_words<I>(words: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut sorted = BTreeSet::new();
        let mut rejected = 0usize;
        for word in words {
            match scrub(word.as_ref()) {
                Some(clean) => {
                    sorted.insert(clean);
                }
                None => {
                    log::trace!("skipping invalid word {:?}", word.as_ref());
                    rejected += 1;
                }
            }
        }
        if rejected > 0 {
            log::warn!("skipped {rejected} invalid words while building DAWG");
        }

        let edges = build_edges(&sorted)?;
        log::info!("built DAWG: {} words, {} edges", sorted.len(), edges.len());
        Ok(Self {
            edges,
            start: 0,
            words: sorted.len(),
        })
    }

    /// Serializes to the DAWG file format.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::Dawg;
    /// #
    /// let dawg = Dawg::from_words(["a", "ab"]).unwrap();
    /// let bytes = dawg.to_bytes();
    /// assert!(bytes.starts_with(b"DAWG:0:8:"));
    /// assert_eq!(Dawg::from_bytes(&bytes).unwrap(), dawg);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = format!("DAWG:{}:{}:", self.start, self.edges.len() * 4);
        let mut bytes = Vec::with_capacity(header.len() + self.edges.len() * 4);
        bytes.extend_from_slice(header.as_bytes());
        for edge in &self.edges {
            bytes.extend_from_slice(&edge.bits().to_be_bytes());
        }
        bytes
    }

    /// Writes the DAWG file format to `writer`.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Returns `true` if the DAWG holds no words.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Number of edge records.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The raw edge array.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Index of the root's first edge.
    pub fn start(&self) -> usize {
        self.start
    }

    fn find_edge(&self, list: usize, letter: u8) -> Option<Edge> {
        for &edge in &self.edges[list..] {
            if edge.letter() == letter {
                return Some(edge);
            }
            if edge.is_last() || edge.letter() > letter {
                return None;
            }
        }
        None
    }

    /// Follows `word` from the root and returns the edge for its last letter.
    fn trace_to_last_edge(&self, word: &str) -> Option<Edge> {
        if self.edges.is_empty() {
            return None;
        }
        let mut list = self.start;
        let mut edge: Option<Edge> = None;
        for byte in word.bytes() {
            if let Some(prev) = edge {
                list = prev.children();
                if list == 0 {
                    return None;
                }
            }
            edge = Some(self.find_edge(list, letter_code(byte)?)?);
        }
        edge
    }

    /// Returns `true` if `word` is in the DAWG. Case is ignored.
    pub fn contains(&self, word: &str) -> bool {
        self.trace_to_last_edge(word).is_some_and(Edge::accepts)
    }

    /// Returns `true` if some word starts with `prefix`. Case is ignored;
    /// the empty prefix always matches.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        prefix.is_empty() || self.trace_to_last_edge(prefix).is_some()
    }

    /// Iterates over the words in alphabetical order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            edges: &self.edges,
            start: self.start,
            path: Vec::new(),
            started: false,
            remaining: self.words,
        }
    }

    /// The alphabetically first word.
    pub fn first(&self) -> Option<String> {
        self.iter().next()
    }

    /// The alphabetically last word.
    pub fn last(&self) -> Option<String> {
        self.iter().last()
    }
}

fn skip_delimiter(bytes: &[u8], pos: &mut usize, after: &str) -> Result<()> {
    if *pos >= bytes.len() {
        return Err(Error::MalformedHeader {
            reason: format!("missing delimiter after {after}"),
        });
    }
    *pos += 1;
    Ok(())
}

fn read_header_number(bytes: &[u8], pos: &mut usize, field: &str) -> Result<usize> {
    while bytes.get(*pos).is_some_and(u8::is_ascii_whitespace) {
        *pos += 1;
    }
    match bytes.get(*pos) {
        Some(b'-') => {
            return Err(Error::MalformedHeader {
                reason: format!("negative {field}"),
            });
        }
        Some(b'+') => *pos += 1,
        _ => {}
    }

    let digits_start = *pos;
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(*pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(usize::from(b - b'0')))
            .ok_or_else(|| Error::MalformedHeader {
                reason: format!("{field} overflows"),
            })?;
        *pos += 1;
    }
    if *pos == digits_start {
        return Err(Error::MalformedHeader {
            reason: format!("missing {field}"),
        });
    }

    skip_delimiter(bytes, pos, field)?;
    Ok(value)
}

fn corrupt(index: usize, reason: impl Into<String>) -> Error {
    Error::CorruptEdge {
        index,
        reason: reason.into(),
    }
}

/// Checks letters, child offsets, list termination and sibling order.
fn validate(edges: &[Edge]) -> Result<()> {
    for (index, &edge) in edges.iter().enumerate() {
        if !(1..=26).contains(&edge.letter()) {
            return Err(corrupt(index, format!("letter code {} outside 1..=26", edge.letter())));
        }
        if edge.children() >= edges.len() {
            return Err(corrupt(
                index,
                format!("child index {} outside {} edges", edge.children(), edges.len()),
            ));
        }
        if !edge.is_last() {
            match edges.get(index + 1) {
                None => return Err(corrupt(index, "sibling list runs past the end")),
                Some(next) if next.letter() <= edge.letter() => {
                    return Err(corrupt(index + 1, "sibling letters out of order"));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Counts the words reachable from `start`, rejecting cyclic graphs.
///
/// Iterative post-order walk over child lists; `Active` marks lists on the
/// current path, so reaching one again means a cycle.
fn count_words(edges: &[Edge], start: usize) -> Result<usize> {
    if edges.is_empty() {
        return Ok(0);
    }

    let mut visit = vec![Visit::New; edges.len()];
    let mut counts = vec![0usize; edges.len()];
    let mut stack = vec![start];

    while let Some(&list) = stack.last() {
        match visit[list] {
            Visit::New => {
                visit[list] = Visit::Active;
                for (offset, edge) in edges[list..].iter().enumerate() {
                    let child = edge.children();
                    if child != 0 {
                        match visit[child] {
                            Visit::Active => {
                                return Err(corrupt(list + offset, "child list forms a cycle"));
                            }
                            Visit::New => stack.push(child),
                            Visit::Done => {}
                        }
                    }
                    if edge.is_last() {
                        break;
                    }
                }
            }
            Visit::Active => {
                let mut total = 0usize;
                for edge in &edges[list..] {
                    total = total.saturating_add(usize::from(edge.accepts()));
                    if edge.children() != 0 {
                        total = total.saturating_add(counts[edge.children()]);
                    }
                    if edge.is_last() {
                        break;
                    }
                }
                counts[list] = total;
                visit[list] = Visit::Done;
                stack.pop();
            }
            Visit::Done => {
                stack.pop();
            }
        }
    }

    Ok(counts[start])
}

/// Transition of the intermediate trie: `(letter, accept, child node)`.
type BuildEdge = (u8, bool, usize);

/// Builds the minimized edge array for sorted, scrubbed words.
///
/// Words go into a plain trie first. Node lists are then merged bottom-up by
/// signature (their letters, accept flags and already-merged children), and
/// the surviving lists are laid out with the root's list at index 0.
fn build_edges(words: &BTreeSet<String>) -> Result<Vec<Edge>> {
    let mut nodes: Vec<Vec<BuildEdge>> = vec![Vec::new()];
    for word in words {
        let mut node = 0;
        let bytes = word.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            let letter = byte - b'a' + 1;
            // Sorted input: a shared prefix always ends in the node's last edge.
            let slot = match nodes[node].last() {
                Some(&(l, _, _)) if l == letter => nodes[node].len() - 1,
                _ => {
                    let fresh = nodes.len();
                    nodes.push(Vec::new());
                    nodes[node].push((letter, false, fresh));
                    nodes[node].len() - 1
                }
            };
            if i + 1 == bytes.len() {
                nodes[node][slot].1 = true;
            }
            node = nodes[node][slot].2;
        }
    }

    // Children are always created after their parent, so walking the nodes
    // backwards canonicalizes every child before it is referenced.
    let mut canonical = vec![0usize; nodes.len()];
    let mut lists: Vec<Vec<(u8, bool, u32)>> = Vec::new();
    let mut registry: HashMap<Vec<(u8, bool, u32)>, usize> = HashMap::new();
    for node in (0..nodes.len()).rev() {
        let signature: Vec<(u8, bool, u32)> = nodes[node]
            .iter()
            .map(|&(letter, accept, child)| (letter, accept, canonical[child] as u32))
            .collect();
        let next_id = lists.len();
        canonical[node] = *registry.entry(signature.clone()).or_insert_with(|| {
            lists.push(signature);
            next_id
        });
    }

    let root = canonical[0];
    let order: Vec<usize> = core::iter::once(root)
        .chain((0..lists.len()).filter(|&id| id != root))
        .filter(|&id| !lists[id].is_empty())
        .collect();

    let total: usize = order.iter().map(|&id| lists[id].len()).sum();
    if total > MAX_EDGES {
        return Err(Error::TooManyEdges { count: total });
    }

    let mut offsets: Vec<Option<u32>> = vec![None; lists.len()];
    let mut next = 0u32;
    for &id in &order {
        offsets[id] = Some(next);
        next += lists[id].len() as u32;
    }

    let mut edges = Vec::with_capacity(total);
    for &id in &order {
        let list = &lists[id];
        for (i, &(letter, accept, child)) in list.iter().enumerate() {
            let children = offsets[child as usize].unwrap_or(0);
            edges.push(Edge::new(letter, i + 1 == list.len(), accept, children));
        }
    }
    Ok(edges)
}

impl PartialEq for Dawg {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words && self.iter().eq(other.iter())
    }
}

impl Eq for Dawg {}

impl Debug for Dawg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dawg")
            .field("words", &self.words)
            .field("edges", &self.edges.len())
            .field("start", &self.start)
            .finish()
    }
}

/// Writes the words as `{"a", "b", ...}` in alphabetical order.
impl Display for Dawg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        text::write_set(f, self.iter())
    }
}

impl HashCode for Dawg {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self.iter(), HashOrder::Sensitive)
    }
}

impl<'a> IntoIterator for &'a Dawg {
    type IntoIter = Iter<'a>;
    type Item = String;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Alphabetical iterator over the words of a [`Dawg`].
///
/// Walks the graph depth-first with an explicit stack of edge indices, one
/// per letter of the current word.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    edges: &'a [Edge],
    start: usize,
    path: Vec<usize>,
    started: bool,
    remaining: usize,
}

impl Iter<'_> {
    /// Moves to the next edge in depth-first order. Returns `false` once the
    /// walk is over.
    fn advance(&mut self) -> bool {
        let Some(&top) = self.path.last() else {
            return false;
        };
        let children = self.edges[top].children();
        if children != 0 {
            self.path.push(children);
            return true;
        }
        while let Some(index) = self.path.pop() {
            if !self.edges[index].is_last() {
                self.path.push(index + 1);
                return true;
            }
        }
        false
    }

    fn word(&self) -> String {
        self.path.iter().map(|&i| self.edges[i].char()).collect()
    }
}

impl Iterator for Iter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.started {
                self.started = true;
                if self.edges.is_empty() {
                    return None;
                }
                self.path.push(self.start);
            } else if !self.advance() {
                return None;
            }

            let &top = self.path.last()?;
            if self.edges[top].accepts() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(self.word());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl core::iter::FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    const SAMPLE: [&str; 7] = ["a", "ab", "aab", "aaab", "aardvark", "b", "banana"];

    fn raw(start: usize, edges: &[u32]) -> Vec<u8> {
        let mut bytes = format!("DAWG:{}:{}:", start, edges.len() * 4).into_bytes();
        for e in edges {
            bytes.extend_from_slice(&e.to_be_bytes());
        }
        bytes
    }

    fn edge(letter: char, last: bool, accept: bool, children: u32) -> u32 {
        Edge::new(letter as u8 - b'a' + 1, last, accept, children).bits()
    }

    #[test]
    fn sample_lexicon_queries() {
        let dawg = Dawg::from_words(SAMPLE).unwrap();
        assert_eq!(dawg.len(), 7);
        assert!(dawg.contains("aardvark"));
        assert!(!dawg.contains("aaardvark"));
        assert!(!dawg.contains_prefix("aardvarz"));
        assert!(dawg.contains_prefix(""));
        assert!(dawg.contains_prefix("banan"));
        assert!(!dawg.contains("banan"));
        assert!(dawg.contains("BaNaNa"));
        assert!(!dawg.contains(""));
        assert!(!dawg.contains("a-b"));
    }

    #[test]
    fn iterates_alphabetically() {
        let dawg = Dawg::from_words(SAMPLE).unwrap();
        let words: Vec<String> = dawg.iter().collect();
        let mut expected: Vec<&str> = SAMPLE.to_vec();
        expected.sort_unstable();
        assert_eq!(words, expected);
        assert_eq!(dawg.first().as_deref(), Some("a"));
        assert_eq!(dawg.last().as_deref(), Some("banana"));
        assert_eq!(dawg.iter().len(), 7);
    }

    #[test]
    fn every_prefix_is_a_prefix() {
        let dawg = Dawg::from_words(SAMPLE).unwrap();
        for word in SAMPLE {
            for end in 1..=word.len() {
                assert!(dawg.contains_prefix(&word[..end]), "{}", &word[..end]);
            }
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let dawg = Dawg::from_words(SAMPLE).unwrap();
        let loaded = Dawg::from_bytes(&dawg.to_bytes()).unwrap();
        assert_eq!(loaded, dawg);
        assert_eq!(loaded.len(), dawg.len());
        assert_eq!(loaded.edges(), dawg.edges());
        assert_eq!(loaded.hash_code(), dawg.hash_code());
    }

    #[test]
    fn reads_hand_built_file() {
        // root: [a accept -> 1]; 1: [b accept]
        let bytes = raw(0, &[edge('a', true, true, 1), edge('b', true, true, 0)]);
        let dawg = Dawg::from_bytes(&bytes).unwrap();
        assert_eq!(dawg.iter().collect::<Vec<_>>(), ["a", "ab"]);
        assert_eq!(dawg.len(), 2);
    }

    #[test]
    fn header_accepts_other_delimiters() {
        let mut bytes = b"DAWG 1 8\n".to_vec();
        bytes.extend_from_slice(&edge('b', true, true, 0).to_be_bytes());
        bytes.extend_from_slice(&edge('a', true, true, 0).to_be_bytes());
        let dawg = Dawg::from_bytes(&bytes).unwrap();
        assert_eq!(dawg.iter().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn minimizes_shared_suffixes() {
        let dawg = Dawg::from_words(["cats", "bats", "rats"]).unwrap();
        assert_eq!(dawg.edge_count(), 6);
        assert_eq!(dawg.iter().collect::<Vec<_>>(), ["bats", "cats", "rats"]);

        let shared = Dawg::from_words(["tap", "taps", "top", "tops"]).unwrap();
        assert_eq!(shared.len(), 4);
        // t -> {a, o} -> p (accept) -> s (accept)
        assert_eq!(shared.edge_count(), 5);
    }

    #[test]
    fn builder_scrubs_and_dedups() {
        let dawg = Dawg::from_words(["  Apple ", "apple", "pear!", "", "fig"]).unwrap();
        assert_eq!(dawg.iter().collect::<Vec<_>>(), ["apple", "fig"]);
    }

    #[test]
    fn empty_dawg() {
        let dawg = Dawg::from_words(Vec::<String>::new()).unwrap();
        assert!(dawg.is_empty());
        assert_eq!(dawg.edge_count(), 0);
        assert_eq!(dawg.iter().next(), None);
        assert!(dawg.contains_prefix(""));
        assert!(!dawg.contains_prefix("a"));
        assert_eq!(dawg.to_bytes(), b"DAWG:0:0:");

        let loaded = Dawg::from_bytes(b"DAWG:0:0:").unwrap();
        assert_eq!(loaded, Dawg::new());
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(matches!(Dawg::from_bytes(b"DAWN:0:0:"), Err(Error::BadMagic)));
        assert!(matches!(Dawg::from_bytes(b"DA"), Err(Error::BadMagic)));
    }

    #[test]
    fn rejects_malformed_headers() {
        for bytes in [
            &b"DAWG"[..],
            b"DAWG:x:0:",
            b"DAWG:-1:0:",
            b"DAWG:0:-4:",
            b"DAWG:0:6:......",
            b"DAWG:0:4",
            b"DAWG:99999999999999999999999:0:",
        ] {
            assert!(
                matches!(Dawg::from_bytes(bytes), Err(Error::MalformedHeader { .. })),
                "{:?}",
                String::from_utf8_lossy(bytes)
            );
        }
        let start_out_of_range = raw(3, &[edge('a', true, true, 0)]);
        assert!(matches!(
            Dawg::from_bytes(&start_out_of_range),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn rejects_truncated_edges() {
        let mut bytes = raw(0, &[edge('a', false, true, 0), edge('b', true, true, 0)]);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            Dawg::from_bytes(&bytes),
            Err(Error::TruncatedEdges {
                expected: 8,
                actual: 5
            })
        ));
    }

    #[test]
    fn rejects_corrupt_edges() {
        let bad_letter = raw(0, &[Edge::new(27, true, true, 0).bits()]);
        let child_out_of_range = raw(0, &[edge('a', true, true, 5)]);
        let unterminated = raw(0, &[edge('a', false, true, 0)]);
        let unordered = raw(0, &[edge('b', false, true, 0), edge('a', true, true, 0)]);
        let cycle = raw(0, &[edge('a', true, false, 1), edge('b', true, false, 1)]);

        for (name, bytes) in [
            ("bad letter", bad_letter),
            ("child out of range", child_out_of_range),
            ("unterminated", unterminated),
            ("unordered", unordered),
            ("cycle", cycle),
        ] {
            assert!(
                matches!(Dawg::from_bytes(&bytes), Err(Error::CorruptEdge { .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn equality_and_display() {
        let a = Dawg::from_words(["b", "a"]).unwrap();
        let b = Dawg::from_words(["a", "b", "a"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Dawg::from_words(["a"]).unwrap());
        assert_eq!(a.to_string(), r#"{"a", "b"}"#);
    }

    #[test]
    fn hash_code_is_order_sensitive_fold() {
        let dawg = Dawg::from_words(["x", "y"]).unwrap();
        let expected = hash_code_iterable(["x", "y"], HashOrder::Sensitive);
        assert_eq!(dawg.hash_code(), expected);
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_and_writer() {
        let dawg = Dawg::from_words(SAMPLE).unwrap();
        let mut buffer = Vec::new();
        dawg.write_to(&mut buffer).unwrap();
        let loaded = Dawg::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(loaded, dawg);

        assert!(matches!(
            Dawg::from_file("/definitely/not/here.dawg"),
            Err(Error::Io(_))
        ));
    }
}
