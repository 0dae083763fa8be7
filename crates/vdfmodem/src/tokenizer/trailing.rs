use alloc::{collections::VecDeque, string::String};

/// Bounded ring of the most recently consumed characters, quoted in error
/// messages.
#[derive(Debug, Clone)]
pub(crate) struct TrailingChars {
    ring: VecDeque<char>,
    capacity: usize,
}

impl TrailingChars {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        if self.capacity == 0 {
            return;
        }
        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(c);
    }

    pub(crate) fn snapshot(&self) -> String {
        self.ring.iter().collect()
    }
}
