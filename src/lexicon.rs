//! A word list combining a compiled [`Dawg`] with a mutable [`Trie`].
//!
//! Bulk dictionaries are loaded once into the DAWG, which is compact but
//! read-only; words added at runtime go into the trie. Queries and
//! iteration see the union of both, with no duplicates: a word already in
//! the DAWG is never added to the trie.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::string::ToString;
use core::cmp::Ordering;
use core::fmt::Debug;
use core::fmt::Display;
use core::iter::Peekable;
use core::str::FromStr;

use crate::dawg;
use crate::dawg::Dawg;
use crate::dawg::MAGIC;
use crate::error::Error;
use crate::error::Result;
use crate::hash_code::HashCode;
use crate::hash_code::HashOrder;
use crate::hash_code::hash_code_iterable;
use crate::text;
use crate::text::ParseValue;
use crate::text::Scanner;
use crate::trie;
use crate::trie::Trie;

/// Normalizes a candidate word.
///
/// Surrounding whitespace is trimmed and ASCII letters are lower-cased.
/// Returns `None` if nothing is left or any other character remains.
///
/// ```rust
/// use chainlex::lexicon::scrub;
///
/// assert_eq!(scrub("  Hello\n").as_deref(), Some("hello"));
/// assert_eq!(scrub("it's"), None);
/// assert_eq!(scrub(""), None);
/// ```
pub fn scrub(word: &str) -> Option<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            lower.is_ascii_lowercase().then_some(lower)
        })
        .collect()
}

/// A set of words backed by an optional compiled [`Dawg`] and a [`Trie`].
///
/// # Examples
///
/// ```rust
/// use chainlex::Dawg;
/// use chainlex::Lexicon;
///
/// let compiled = Dawg::from_words(["apple", "banana"]).unwrap();
/// let mut lexicon = Lexicon::from_dawg(compiled);
///
/// assert!(!lexicon.add("Apple"));
/// assert!(lexicon.add("cherry"));
/// assert!(lexicon.add("avocado"));
///
/// let words: Vec<String> = lexicon.iter().collect();
/// assert_eq!(words, ["apple", "avocado", "banana", "cherry"]);
///
/// // Only words added at runtime can be removed.
/// assert!(!lexicon.remove("apple"));
/// assert!(lexicon.remove("cherry"));
/// assert_eq!(lexicon.len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct Lexicon {
    dawg: Option<Dawg>,
    trie: Trie,
}

impl Lexicon {
    /// Creates an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lexicon whose compiled part is `dawg`.
    pub fn from_dawg(dawg: Dawg) -> Self {
        Self {
            dawg: Some(dawg),
            trie: Trie::new(),
        }
    }

    /// Reads a lexicon file: a binary DAWG if it starts with `DAWG`,
    /// otherwise a text file with one word per line.
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut lexicon = Self::new();
        lexicon.add_words_from_reader(reader)?;
        Ok(lexicon)
    }

    /// Reads a lexicon file from disk. See [`Lexicon::from_reader`].
    #[cfg(feature = "std")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut lexicon = Self::new();
        lexicon.add_words_from_file(path)?;
        Ok(lexicon)
    }

    /// Installs `dawg` as the compiled part.
    ///
    /// Fails with [`Error::BinaryRequiresEmpty`] unless the lexicon is
    /// empty, since the compiled part cannot absorb existing words.
    pub fn set_dawg(&mut self, dawg: Dawg) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::BinaryRequiresEmpty);
        }
        self.dawg = Some(dawg);
        Ok(())
    }

    /// The compiled part, if any.
    pub fn dawg(&self) -> Option<&Dawg> {
        self.dawg.as_ref()
    }

    /// The words added at runtime.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Adds the words of a lexicon file held in memory and returns how many
    /// were new.
    ///
    /// A binary DAWG is installed as the compiled part when the lexicon is
    /// empty; otherwise its words are added one by one. Text input is read
    /// line by line, skipping blank lines and lines that are not valid
    /// words.
    pub fn add_words_from_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.starts_with(MAGIC) {
            let dawg = Dawg::from_bytes(bytes)?;
            if self.is_empty() {
                let added = dawg.len();
                self.set_dawg(dawg)?;
                return Ok(added);
            }
            let added = dawg.iter().filter(|word| self.add(word)).count();
            log::info!("merged {added} words from DAWG into lexicon");
            return Ok(added);
        }

        let text = String::from_utf8_lossy(bytes);
        let mut added = 0usize;
        let mut rejected = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match scrub(line) {
                Some(word) => added += usize::from(self.add_scrubbed(word)),
                None => {
                    log::trace!("rejecting word list line {line:?}");
                    rejected += 1;
                }
            }
        }
        if rejected > 0 {
            log::warn!("rejected {rejected} invalid lines while reading word list");
        }
        log::info!("loaded {added} words from word list");
        Ok(added)
    }

    /// Adds the words of a lexicon file read from `reader`. See
    /// [`Lexicon::add_words_from_bytes`].
    #[cfg(feature = "std")]
    pub fn add_words_from_reader<R: std::io::Read>(&mut self, mut reader: R) -> Result<usize> {
        let mut bytes = alloc::vec::Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.add_words_from_bytes(&bytes)
    }

    /// Adds the words of a lexicon file on disk. See
    /// [`Lexicon::add_words_from_bytes`].
    #[cfg(feature = "std")]
    pub fn add_words_from_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<usize> {
        let file = std::fs::File::open(path)?;
        self.add_words_from_reader(std::io::BufReader::new(file))
    }

    /// Adds `word`. Returns `false` if it is already present or is not a
    /// valid word.
    pub fn add(&mut self, word: &str) -> bool {
        match scrub(word) {
            Some(clean) => self.add_scrubbed(clean),
            None => false,
        }
    }

    fn add_scrubbed(&mut self, word: String) -> bool {
        if self.dawg.as_ref().is_some_and(|dawg| dawg.contains(&word)) {
            return false;
        }
        self.trie.add_scrubbed(word)
    }

    /// Adds every word of `other`.
    pub fn add_all(&mut self, other: &Lexicon) -> &mut Self {
        for word in other {
            self.add(&word);
        }
        self
    }

    /// Returns `true` if `word` is present. Case and surrounding whitespace
    /// are ignored.
    pub fn contains(&self, word: &str) -> bool {
        let Some(clean) = scrub(word) else {
            return false;
        };
        self.dawg.as_ref().is_some_and(|dawg| dawg.contains(&clean))
            || self.trie.contains_scrubbed(&clean)
    }

    /// Returns `true` if every word of `other` is present.
    pub fn contains_all(&self, other: &Lexicon) -> bool {
        other.iter().all(|word| self.contains(&word))
    }

    /// Returns `true` if some word starts with `prefix`. The empty prefix
    /// always matches.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        let Some(clean) = scrub(prefix) else {
            return false;
        };
        self.dawg
            .as_ref()
            .is_some_and(|dawg| dawg.contains_prefix(&clean))
            || self.trie.contains_prefix_scrubbed(&clean)
    }

    /// Returns `true` if every word here is also in `other`.
    pub fn is_subset(&self, other: &Lexicon) -> bool {
        self.len() <= other.len() && other.contains_all(self)
    }

    /// Returns `true` if every word of `other` is also here.
    pub fn is_superset(&self, other: &Lexicon) -> bool {
        other.is_subset(self)
    }

    /// Removes a word added at runtime. Words of the compiled part are left
    /// in place and report `false`.
    pub fn remove(&mut self, word: &str) -> bool {
        self.trie.remove(word)
    }

    /// Removes every runtime word starting with `prefix`. The empty prefix
    /// removes all runtime words.
    pub fn remove_prefix(&mut self, prefix: &str) -> bool {
        self.trie.remove_prefix(prefix)
    }

    /// Removes every runtime word that is in `other`.
    pub fn remove_all(&mut self, other: &Lexicon) -> &mut Self {
        let doomed: alloc::vec::Vec<String> = self
            .trie
            .iter()
            .filter(|word| other.contains(word))
            .map(str::to_string)
            .collect();
        for word in doomed {
            self.trie.remove(&word);
        }
        self
    }

    /// Keeps only the runtime words that are in `other`.
    pub fn retain_all(&mut self, other: &Lexicon) -> &mut Self {
        let doomed: alloc::vec::Vec<String> = self
            .trie
            .iter()
            .filter(|word| !other.contains(word))
            .map(str::to_string)
            .collect();
        for word in doomed {
            self.trie.remove(&word);
        }
        self
    }

    /// Removes every word, including the compiled part.
    pub fn clear(&mut self) {
        self.dawg = None;
        self.trie.clear();
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.dawg.as_ref().map_or(0, Dawg::len) + self.trie.len()
    }

    /// Returns `true` if there are no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all words in alphabetical order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            compiled: self.dawg.as_ref().map(|dawg| dawg.iter().peekable()),
            added: self.trie.iter().peekable(),
        }
    }

    /// The alphabetically first word.
    pub fn first(&self) -> Option<String> {
        self.iter().next()
    }

    /// The alphabetically last word.
    pub fn last(&self) -> Option<String> {
        let compiled = self.dawg.as_ref().and_then(Dawg::last);
        let added = self.trie.last();
        match (compiled, added) {
            (Some(c), Some(a)) if a > c.as_str() => Some(a.to_string()),
            (Some(c), _) => Some(c),
            (None, a) => a.map(str::to_string),
        }
    }

    /// Calls `f` with every word in alphabetical order.
    pub fn for_each(&self, mut f: impl FnMut(&str)) {
        for word in self {
            f(&word);
        }
    }

    /// Copies the words into a sorted set.
    pub fn to_btree_set(&self) -> BTreeSet<String> {
        self.iter().collect()
    }

    /// Builds a DAWG holding every word, suitable for
    /// [`Dawg::to_bytes`].
    pub fn compile(&self) -> Result<Dawg> {
        Dawg::from_words(self.iter())
    }
}

impl PartialEq for Lexicon {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Lexicon {}

impl PartialOrd for Lexicon {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic over the alphabetical word sequences.
impl Ord for Lexicon {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl Debug for Lexicon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for Lexicon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        text::write_set(f, self.iter())
    }
}

impl HashCode for Lexicon {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self.iter(), HashOrder::Sensitive)
    }
}

impl<S: AsRef<str>> Extend<S> for Lexicon {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.add(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Lexicon {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut lexicon = Lexicon::new();
        lexicon.extend(iter);
        lexicon
    }
}

/// Reads `{"word", ...}`; entries that are not valid words are skipped.
impl ParseValue for Lexicon {
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        let mut lexicon = Lexicon::new();
        scanner.parse_delimited('{', '}', |s| {
            lexicon.add(&String::parse_value(s)?);
            Ok(())
        })?;
        Ok(lexicon)
    }
}

/// Parses `{"a", "b", ...}`.
///
/// ```rust
/// use chainlex::Lexicon;
///
/// let lexicon: Lexicon = r#"{"zebra", "Ant", yak}"#.parse().unwrap();
/// assert_eq!(lexicon.to_string(), r#"{"ant", "yak", "zebra"}"#);
/// ```
impl FromStr for Lexicon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        text::parse_str(s)
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type IntoIter = Iter<'a>;
    type Item = String;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Alphabetical iterator over a [`Lexicon`], merging the compiled and
/// runtime words.
pub struct Iter<'a> {
    compiled: Option<Peekable<dawg::Iter<'a>>>,
    added: Peekable<trie::Iter<'a>>,
}

impl Iterator for Iter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(compiled) = self.compiled.as_mut() else {
            return self.added.next().map(str::to_string);
        };
        match (compiled.peek(), self.added.peek()) {
            (Some(c), Some(&a)) => match c.as_str().cmp(a) {
                Ordering::Less => compiled.next(),
                Ordering::Greater => self.added.next().map(str::to_string),
                Ordering::Equal => {
                    self.added.next();
                    compiled.next()
                }
            },
            (Some(_), None) => compiled.next(),
            (None, _) => self.added.next().map(str::to_string),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (added, _) = self.added.size_hint();
        let compiled = self.compiled.as_ref().map_or(0, |c| c.size_hint().0);
        (compiled.max(added), compiled.checked_add(added))
    }
}

impl core::iter::FusedIterator for Iter<'_> {}

impl Debug for Iter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn sample_dawg() -> Dawg {
        Dawg::from_words(["a", "ab", "aab", "aaab", "aardvark", "b", "banana"]).unwrap()
    }

    #[test]
    fn scrub_rules() {
        assert_eq!(scrub("Word").as_deref(), Some("word"));
        assert_eq!(scrub("\tword \r").as_deref(), Some("word"));
        assert_eq!(scrub("two words"), None);
        assert_eq!(scrub("hyphen-ated"), None);
        assert_eq!(scrub("Ünïcode"), None);
        assert_eq!(scrub(" \n "), None);
    }

    #[test]
    fn union_queries() {
        let mut lexicon = Lexicon::from_dawg(sample_dawg());
        assert!(lexicon.add("zebra"));
        assert!(lexicon.contains("aardvark"));
        assert!(lexicon.contains("ZEBRA"));
        assert!(!lexicon.contains("aaardvark"));
        assert!(lexicon.contains_prefix("zeb"));
        assert!(lexicon.contains_prefix("aardv"));
        assert!(!lexicon.contains_prefix("aardvarz"));
        assert!(lexicon.contains_prefix(""));
        assert!(!lexicon.contains_prefix("a b"));
        assert_eq!(lexicon.len(), 8);
    }

    #[test]
    fn added_words_and_prefixes_are_found() {
        let words = ["syzygy", "quartz", "jukebox", "quiz"];
        let lexicon: Lexicon = words.into_iter().collect();
        for word in words {
            assert!(lexicon.contains(word));
            for end in 1..=word.len() {
                assert!(lexicon.contains_prefix(&word[..end]));
            }
        }
        assert!(!lexicon.contains("quart"));
        assert!(!lexicon.contains("jukeboxes"));
    }

    #[test]
    fn no_duplicates_across_parts() {
        let mut lexicon = Lexicon::from_dawg(sample_dawg());
        assert!(!lexicon.add("Banana"));
        assert!(lexicon.trie().is_empty());
        assert!(lexicon.add("aa"));
        assert!(!lexicon.add("aa"));
        assert_eq!(lexicon.len(), 8);
        assert_eq!(lexicon.iter().count(), 8);
    }

    #[test]
    fn merged_iteration_is_alphabetical() {
        let mut lexicon = Lexicon::from_dawg(sample_dawg());
        lexicon.extend(["aa", "az", "ba", "c"]);
        let words: Vec<String> = lexicon.iter().collect();
        let mut expected = words.clone();
        expected.sort();
        assert_eq!(words, expected);
        assert_eq!(
            words,
            [
                "a", "aa", "aaab", "aab", "aardvark", "ab", "az", "b", "ba", "banana", "c"
            ]
        );
        assert_eq!(lexicon.first().as_deref(), Some("a"));
        assert_eq!(lexicon.last().as_deref(), Some("c"));
        assert_eq!(lexicon.to_btree_set().len(), 11);
    }

    #[test]
    fn remove_only_touches_runtime_words() {
        let mut lexicon = Lexicon::from_dawg(sample_dawg());
        lexicon.extend(["aardwolf", "bandana"]);
        assert!(!lexicon.remove("aardvark"));
        assert!(lexicon.contains("aardvark"));
        assert!(lexicon.remove("aardwolf"));
        assert!(!lexicon.contains("aardwolf"));

        assert!(!lexicon.remove_prefix("aardv"));
        lexicon.add("band");
        assert!(lexicon.remove_prefix("ban"));
        assert!(lexicon.contains("banana"));
        assert!(!lexicon.contains("bandana"));
        assert_eq!(lexicon.len(), 7);
    }

    #[test]
    fn set_operations() {
        let small: Lexicon = ["cat", "dog"].into_iter().collect();
        let mut big: Lexicon = ["cat", "dog", "emu"].into_iter().collect();
        assert!(small.is_subset(&big));
        assert!(big.is_superset(&small));
        assert!(!big.is_subset(&small));
        assert!(big.contains_all(&small));

        big.remove_all(&small);
        assert_eq!(big.iter().collect::<Vec<_>>(), ["emu"]);

        let mut other: Lexicon = ["cat", "emu", "gnu"].into_iter().collect();
        other.retain_all(&small);
        assert_eq!(other.iter().collect::<Vec<_>>(), ["cat"]);

        let mut sum = small.clone();
        sum.add_all(&other).add_all(&big);
        assert_eq!(sum.len(), 3);
    }

    #[test]
    fn binary_load_into_empty_installs_dawg() {
        let bytes = sample_dawg().to_bytes();
        let mut lexicon = Lexicon::new();
        assert_eq!(lexicon.add_words_from_bytes(&bytes).unwrap(), 7);
        assert!(lexicon.dawg().is_some());
        assert!(lexicon.trie().is_empty());
    }

    #[test]
    fn binary_load_into_non_empty_merges_words() {
        let bytes = sample_dawg().to_bytes();
        let mut lexicon: Lexicon = ["banana", "kiwi"].into_iter().collect();
        assert_eq!(lexicon.add_words_from_bytes(&bytes).unwrap(), 6);
        assert!(lexicon.dawg().is_none());
        assert_eq!(lexicon.len(), 8);

        assert!(matches!(
            lexicon.set_dawg(sample_dawg()),
            Err(Error::BinaryRequiresEmpty)
        ));
    }

    #[test]
    fn corrupt_binary_is_fatal() {
        let mut lexicon = Lexicon::new();
        assert!(matches!(
            lexicon.add_words_from_bytes(b"DAWG:0:8:abc"),
            Err(Error::TruncatedEdges { .. })
        ));
        assert!(lexicon.is_empty());
    }

    #[test]
    fn text_word_list() {
        let list = b"Apple\n  banana  \n\nit's\ncherry\r\napple\n";
        let mut lexicon = Lexicon::new();
        assert_eq!(lexicon.add_words_from_bytes(list).unwrap(), 3);
        assert_eq!(
            lexicon.iter().collect::<Vec<_>>(),
            ["apple", "banana", "cherry"]
        );
    }

    #[test]
    fn equality_order_and_hash() {
        let compiled = Lexicon::from_dawg(Dawg::from_words(["a", "b"]).unwrap());
        let runtime: Lexicon = ["b", "a"].into_iter().collect();
        assert_eq!(compiled, runtime);
        assert_eq!(compiled.hash_code(), runtime.hash_code());

        let mut lexicons = vec![
            ["b"].into_iter().collect::<Lexicon>(),
            ["a", "c"].into_iter().collect(),
            ["a", "b"].into_iter().collect(),
            Lexicon::new(),
        ];
        lexicons.sort();
        let rendered: Vec<String> = lexicons.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            ["{}", r#"{"a", "b"}"#, r#"{"a", "c"}"#, r#"{"b"}"#]
        );
    }

    #[test]
    fn display_round_trips() {
        let lexicon: Lexicon = ["pear", "fig"].into_iter().collect();
        let text = lexicon.to_string();
        assert_eq!(text, r#"{"fig", "pear"}"#);
        assert_eq!(text.parse::<Lexicon>().unwrap(), lexicon);
    }

    #[cfg(not(feature = "strict-parse"))]
    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(
            "{\"a\", ".parse::<Lexicon>(),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn compile_snapshots_all_words() {
        let mut lexicon = Lexicon::from_dawg(sample_dawg());
        lexicon.add("cab");
        let dawg = lexicon.compile().unwrap();
        assert_eq!(dawg.len(), 8);
        let reloaded = Lexicon::from_dawg(Dawg::from_bytes(&dawg.to_bytes()).unwrap());
        assert_eq!(reloaded, lexicon);
    }

    #[test]
    fn for_each_visits_in_order() {
        let lexicon: Lexicon = ["c", "a", "b"].into_iter().collect();
        let mut seen = String::new();
        lexicon.for_each(|word| seen.push_str(word));
        assert_eq!(seen, "abc");
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_detects_format() {
        let binary = sample_dawg().to_bytes();
        let lexicon = Lexicon::from_reader(binary.as_slice()).unwrap();
        assert!(lexicon.dawg().is_some());
        assert_eq!(lexicon.len(), 7);

        let text = Lexicon::from_reader(&b"one\ntwo\n"[..]).unwrap();
        assert!(text.dawg().is_none());
        assert_eq!(text.len(), 2);

        assert!(matches!(
            Lexicon::from_file("/definitely/not/here.txt"),
            Err(Error::Io(_))
        ));
    }
}
