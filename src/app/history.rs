//! Recall list for command-mode input

/// Previously executed input lines, oldest first.
///
/// The cursor indexes the entry last recalled; after a push it sits one
/// past the end.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.cursor = self.entries.len();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steps back one entry. At the oldest entry this is a no-op.
    pub fn previous(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Steps forward one entry. At the newest entry this is a no-op.
    pub fn next(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recall_walks_back_and_forth() {
        let mut history = CommandHistory::default();
        history.push(":sort mem");
        history.push(":tree");
        history.push("/chrome");

        assert_eq!(history.previous(), Some("/chrome"));
        assert_eq!(history.previous(), Some(":tree"));
        assert_eq!(history.previous(), Some(":sort mem"));
        assert_eq!(history.previous(), None, "no-op at the oldest entry");
        assert_eq!(history.next(), Some(":tree"));
        assert_eq!(history.next(), Some("/chrome"));
        assert_eq!(history.next(), None, "no-op at the newest entry");
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut history = CommandHistory::default();
        history.push(":a");
        history.push(":b");
        history.previous();
        history.previous();
        history.push(":c");
        assert_eq!(history.previous(), Some(":c"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_empty_history_is_inert() {
        let mut history = CommandHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);
    }
}
