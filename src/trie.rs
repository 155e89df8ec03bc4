//! A mutable 26-ary trie of lowercase words.
//!
//! Every node has one optional child per letter and an end-of-word flag. A
//! sorted side index of the stored words backs ordered iteration and
//! [`Trie::len`]; it is updated together with the nodes on every change.
//!
//! Nodes that end no word and have no children are pruned as soon as a
//! removal leaves them that way, so [`Trie::node_count`] only ever reports
//! nodes that lie on the path of some word.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::collections::btree_set;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::fmt::Display;

use crate::hash_code::HashCode;
use crate::hash_code::HashOrder;
use crate::hash_code::hash_code_iterable;
use crate::lexicon::scrub;
use crate::text;

const ALPHABET: usize = 26;

#[derive(Default)]
struct TrieNode {
    is_word: bool,
    children: [Option<Box<TrieNode>>; ALPHABET],
}

impl TrieNode {
    fn child(&self, letter: u8) -> Option<&TrieNode> {
        self.children[slot(letter)].as_deref()
    }

    fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }
}

#[inline]
fn slot(letter: u8) -> usize {
    usize::from(letter - b'a')
}

/// Frees every node below `node` without recursing.
fn dismantle(node: &mut TrieNode) {
    let mut stack: Vec<Box<TrieNode>> = node.children.iter_mut().filter_map(Option::take).collect();
    while let Some(mut next) = stack.pop() {
        stack.extend(next.children.iter_mut().filter_map(Option::take));
    }
}

/// Walks `letters` from `root` and cuts off the branch that ends at the last
/// letter, together with any ancestors that would be left without a word
/// below them.
///
/// The cut is made under the deepest ancestor that must survive: the root,
/// a node that ends a word, or a node with another child.
fn detach(root: &mut TrieNode, letters: &[u8]) -> bool {
    if letters.is_empty() {
        return false;
    }
    let mut cut = 0;
    let mut node = &*root;
    for (depth, &letter) in letters.iter().enumerate() {
        if depth > 0 && (node.is_word || node.child_count() > 1) {
            cut = depth;
        }
        match node.child(letter) {
            Some(child) => node = child,
            None => return false,
        }
    }

    let mut parent = root;
    for &letter in &letters[..cut] {
        match parent.children[slot(letter)].as_deref_mut() {
            Some(child) => parent = child,
            None => return false,
        }
    }
    match parent.children[slot(letters[cut])].take() {
        Some(mut branch) => {
            dismantle(&mut branch);
            true
        }
        None => false,
    }
}

/// A mutable word set stored as a trie.
///
/// Words are scrubbed before use: surrounding whitespace is trimmed and
/// letters are lower-cased. A word containing anything other than ASCII
/// letters is rejected.
///
/// # Examples
///
/// ```rust
/// use chainlex::Trie;
///
/// let mut trie = Trie::new();
/// assert!(trie.add("Cat"));
/// assert!(trie.add("cattle"));
/// assert!(!trie.add("cat"));
/// assert!(!trie.add("c4t"));
///
/// assert!(trie.contains("CAT"));
/// assert!(trie.contains_prefix("catt"));
/// assert!(!trie.contains("catt"));
///
/// assert!(trie.remove("cattle"));
/// assert_eq!(trie.iter().collect::<Vec<_>>(), ["cat"]);
/// assert_eq!(trie.node_count(), 3);
/// ```
#[derive(Default)]
pub struct Trie {
    root: TrieNode,
    words: BTreeSet<String>,
}

impl Trie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `word`. Returns `false` if it was already present or is not a
    /// valid word.
    pub fn add(&mut self, word: &str) -> bool {
        match scrub(word) {
            Some(clean) => self.add_scrubbed(clean),
            None => false,
        }
    }

    pub(crate) fn add_scrubbed(&mut self, word: String) -> bool {
        let mut node = &mut self.root;
        for byte in word.bytes() {
            node = node.children[slot(byte)]
                .get_or_insert_with(Box::default)
                .as_mut();
        }
        if node.is_word {
            return false;
        }
        node.is_word = true;
        self.words.insert(word);
        true
    }

    fn find(&self, letters: &str) -> Option<&TrieNode> {
        letters
            .bytes()
            .try_fold(&self.root, |node, byte| node.child(byte))
    }

    /// Returns `true` if `word` was added. Case is ignored.
    pub fn contains(&self, word: &str) -> bool {
        scrub(word).is_some_and(|clean| self.contains_scrubbed(&clean))
    }

    pub(crate) fn contains_scrubbed(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.is_word)
    }

    /// Returns `true` if some word starts with `prefix`. The empty prefix
    /// always matches.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        scrub(prefix).is_some_and(|clean| self.contains_prefix_scrubbed(&clean))
    }

    pub(crate) fn contains_prefix_scrubbed(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    /// Removes `word`. Returns `false` if it was not present.
    pub fn remove(&mut self, word: &str) -> bool {
        let Some(clean) = scrub(word) else {
            return false;
        };
        let Some(node) = self.find(&clean) else {
            return false;
        };
        if !node.is_word {
            return false;
        }

        if node.child_count() == 0 {
            detach(&mut self.root, clean.as_bytes());
        } else {
            let mut node = &mut self.root;
            for byte in clean.bytes() {
                match node.children[slot(byte)].as_deref_mut() {
                    Some(child) => node = child,
                    None => return false,
                }
            }
            node.is_word = false;
        }
        self.words.remove(&clean);
        true
    }

    /// Removes every word starting with `prefix`, returning `true` if any
    /// were removed. The empty prefix clears the trie.
    ///
    /// ```rust
    /// # use chainlex::Trie;
    /// #
    /// let mut trie: Trie = ["car", "cart", "cat", "dog"].into_iter().collect();
    /// assert!(trie.remove_prefix("car"));
    /// assert_eq!(trie.iter().collect::<Vec<_>>(), ["cat", "dog"]);
    /// assert!(!trie.remove_prefix("car"));
    /// ```
    pub fn remove_prefix(&mut self, prefix: &str) -> bool {
        if prefix.is_empty() {
            let had_words = !self.is_empty();
            self.clear();
            return had_words;
        }
        let Some(clean) = scrub(prefix) else {
            return false;
        };
        if !detach(&mut self.root, clean.as_bytes()) {
            return false;
        }
        self.words.retain(|word| !word.starts_with(clean.as_str()));
        true
    }

    /// Removes every word.
    pub fn clear(&mut self) {
        dismantle(&mut self.root);
        self.root.is_word = false;
        self.words.clear();
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the trie holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            for child in node.children.iter().flatten() {
                count += 1;
                stack.push(child);
            }
        }
        count
    }

    /// Iterates over the words in alphabetical order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.words.iter(),
        }
    }

    /// The alphabetically first word.
    pub fn first(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    /// The alphabetically last word.
    pub fn last(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }
}

/// Rebuilds the nodes from the word index, so copying never recurses.
impl Clone for Trie {
    fn clone(&self) -> Self {
        let mut trie = Trie::new();
        for word in &self.words {
            trie.add_scrubbed(word.clone());
        }
        trie
    }
}

impl Drop for Trie {
    fn drop(&mut self) {
        dismantle(&mut self.root);
    }
}

impl PartialEq for Trie {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl Eq for Trie {}

impl Debug for Trie {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for Trie {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        text::write_set(f, self.iter())
    }
}

impl HashCode for Trie {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self.iter(), HashOrder::Sensitive)
    }
}

impl<S: AsRef<str>> Extend<S> for Trie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.add(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<'a> IntoIterator for &'a Trie {
    type IntoIter = Iter<'a>;
    type Item = &'a str;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Alphabetical iterator over the words of a [`Trie`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: btree_set::Iter<'a, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(String::as_str)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl core::iter::FusedIterator for Iter<'_> {}
