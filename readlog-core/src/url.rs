//! Step index ⇄ `?step=N` query token
//!
//! The step index is never cached: it is derived from the navigator's query
//! every time it is asked for, so the displayed step cannot drift from the
//! address. Tokens that are missing, malformed or out of range are silently
//! corrected to step 1 with a history replace.

use std::fmt;

/// Default name of the step token
pub const DEFAULT_STEP_PARAM: &str = "step";

/// Ordered query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=1&b=two`, with or without a leading `?`
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (name, value) = part.split_once('=').unwrap_or((part, ""));
                (decode(name), decode(value))
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set `name`, keeping its position if already present
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(key, _)| key == name) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = false;
                self.pairs.retain(|(key, _)| {
                    if key != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryParams {
    /// Renders as `?a=1&b=2`, or nothing when empty
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{}{}={}",
                sep,
                urlencoding::encode(name),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// How a navigation touches history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// New history entry
    Push,
    /// Overwrite the current entry
    Replace,
}

/// The host's address bar
///
/// Navigation must not reload the page; it only swaps the query.
pub trait Navigator {
    /// False until the host has parsed the initial address
    fn is_ready(&self) -> bool {
        true
    }

    fn query(&self) -> QueryParams;

    fn navigate(&mut self, query: QueryParams, mode: NavigationMode);
}

/// Navigator backed by an in-memory history stack
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    history: Vec<QueryParams>,
    ready: bool,
}

impl MemoryNavigator {
    pub fn new(initial_query: &str) -> Self {
        Self {
            history: vec![QueryParams::parse(initial_query)],
            ready: true,
        }
    }

    /// A navigator that has not parsed its address yet
    pub fn pending(initial_query: &str) -> Self {
        Self {
            ready: false,
            ..Self::new(initial_query)
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Every history entry, oldest first
    pub fn history(&self) -> &[QueryParams] {
        &self.history
    }

    /// Step back in history (the browser back button)
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryNavigator {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn query(&self) -> QueryParams {
        self.history.last().cloned().unwrap_or_default()
    }

    fn navigate(&mut self, query: QueryParams, mode: NavigationMode) {
        if mode == NavigationMode::Replace {
            self.history.pop();
        }
        self.history.push(query);
    }
}

/// Maps the step token to a zero-based step index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStep {
    param: String,
    total_steps: usize,
}

impl UrlStep {
    pub fn new(total_steps: usize) -> Self {
        Self::with_param(DEFAULT_STEP_PARAM, total_steps)
    }

    pub fn with_param(param: impl Into<String>, total_steps: usize) -> Self {
        Self {
            param: param.into(),
            total_steps,
        }
    }

    /// The 1-based step number in `query`, if it is a valid one
    pub fn parse_step(&self, query: &QueryParams) -> Option<usize> {
        query
            .get(&self.param)?
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|step| (1..=self.total_steps).contains(step))
    }

    /// Current zero-based index; 0 until the navigator is ready or when the
    /// token is invalid
    pub fn current_index<N: Navigator + ?Sized>(&self, navigator: &N) -> usize {
        if !navigator.is_ready() {
            return 0;
        }
        self.parse_step(&navigator.query())
            .map_or(0, |step| step - 1)
    }

    /// Correct an invalid token to step 1 (history replace) and return the
    /// current index
    pub fn sync<N: Navigator + ?Sized>(&self, navigator: &mut N) -> usize {
        if !navigator.is_ready() {
            return 0;
        }
        let query = navigator.query();
        match self.parse_step(&query) {
            Some(step) => step - 1,
            None => {
                tracing::debug!(
                    "Correcting step token {:?} to 1",
                    query.get(&self.param)
                );
                self.navigate_to_step(navigator, 1, NavigationMode::Replace);
                0
            }
        }
    }

    /// Point the token at `step_number` (1-based), preserving other params
    pub fn navigate_to_step<N: Navigator + ?Sized>(
        &self,
        navigator: &mut N,
        step_number: usize,
        mode: NavigationMode,
    ) {
        let mut query = navigator.query();
        query.set(&self.param, step_number.to_string());
        navigator.navigate(query, mode);
    }

    pub fn is_first(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.total_steps
    }
}
