//! URL frontier: priority queue of pending URLs plus the visited set
//!
//! This module handles:
//! - Priority assignment through a replaceable [`PriorityPolicy`]
//! - Deterministic ordering: priority first, then URL string
//! - Duplicate suppression against visited and pending URLs

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::fmt;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Priority value (lower is served first)
    pub priority: u32,

    /// The URL, fragment already removed
    pub url: String,
}

impl FrontierEntry {
    pub fn new(priority: u32, url: impl Into<String>) -> Self {
        Self {
            priority,
            url: url.into(),
        }
    }
}

// Ascending by priority, ties broken by URL string comparison
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.url.cmp(&other.url))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Assigns a priority to a URL; lower values are crawled first
pub trait PriorityPolicy: Send + Sync {
    fn priority(&self, url: &str) -> u32;
}

impl<F> PriorityPolicy for F
where
    F: Fn(&str) -> u32 + Send + Sync,
{
    fn priority(&self, url: &str) -> u32 {
        self(url)
    }
}

/// Default policy: URLs containing "product" (any case) get priority 0, others 1
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFirst;

impl PriorityPolicy for ProductFirst {
    fn priority(&self, url: &str) -> u32 {
        if url.to_lowercase().contains("product") {
            0
        } else {
            1
        }
    }
}

/// Pending URLs ordered by priority, plus every URL ever visited
///
/// A URL is never queued twice: [`Frontier::push`] ignores URLs that are
/// already visited or already pending. The visited set only grows.
pub struct Frontier {
    /// Min-heap of pending entries
    queue: BinaryHeap<Reverse<FrontierEntry>>,

    /// URLs currently in `queue`
    pending: HashSet<String>,

    /// URLs marked visited
    visited: HashSet<String>,

    policy: Box<dyn PriorityPolicy>,
}

impl Frontier {
    /// Creates an empty frontier with the [`ProductFirst`] policy
    pub fn new() -> Self {
        Self::with_policy(ProductFirst)
    }

    /// Creates an empty frontier with a custom priority policy
    ///
    /// # Example
    ///
    /// ```
    /// use domain_crawler::crawler::Frontier;
    ///
    /// let mut frontier = Frontier::with_policy(|url: &str| url.len() as u32);
    /// frontier.enqueue("https://example.com/long/path");
    /// frontier.enqueue("https://example.com/");
    /// assert_eq!(frontier.dequeue().unwrap().url, "https://example.com/");
    /// ```
    pub fn with_policy(policy: impl PriorityPolicy + 'static) -> Self {
        Self {
            queue: BinaryHeap::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            policy: Box::new(policy),
        }
    }

    /// Returns the priority the policy assigns to `url`
    pub fn priority_of(&self, url: &str) -> u32 {
        self.policy.priority(url)
    }

    /// Adds a URL with the policy's priority
    ///
    /// # Returns
    ///
    /// * `true` - The URL was inserted
    /// * `false` - The URL was already visited or pending
    pub fn enqueue(&mut self, url: &str) -> bool {
        let priority = self.priority_of(url);
        self.push(FrontierEntry::new(priority, url))
    }

    /// Adds an entry with an explicit priority, subject to the same duplicate rules
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if self.visited.contains(&entry.url) || self.pending.contains(&entry.url) {
            tracing::trace!("Frontier already knows {}", entry.url);
            return false;
        }

        self.pending.insert(entry.url.clone());
        self.queue.push(Reverse(entry));
        true
    }

    /// Removes and returns the entry with the lowest (priority, URL)
    ///
    /// The caller must still check [`Frontier::is_visited`] before fetching.
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        let Reverse(entry) = self.queue.pop()?;
        self.pending.remove(&entry.url);
        Some(entry)
    }

    /// Marks a URL visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not visited before
    /// * `false` - The URL had already been visited
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Returns true if the URL has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if the URL is waiting in the queue
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    /// Returns the number of pending URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no URL is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns the pending URLs in the order they would be dequeued
    pub fn pending_urls(&self) -> Vec<String> {
        let mut entries: Vec<&FrontierEntry> = self.queue.iter().map(|Reverse(e)| e).collect();
        entries.sort();
        entries.into_iter().map(|e| e.url.clone()).collect()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Frontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frontier")
            .field("pending", &self.queue.len())
            .field("visited", &self.visited.len())
            .finish()
    }
}
