use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "toast toast--info",
            Self::Success => "toast toast--success",
            Self::Warning => "toast toast--warning",
            Self::Error => "toast toast--error",
        }
    }
}

/// One toast waiting to be shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// FIFO of toasts raised by the store; the UI renders and dismisses them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeQueue {
    next_id: u64,
    items: Vec<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notice {
            id,
            level,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn last(&self) -> Option<&Notice> {
        self.items.last()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.items.iter().filter(|n| n.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = NoticeQueue::default();
        let first = queue.push(NoticeLevel::Warning, "one");
        let second = queue.push(NoticeLevel::Error, "two");
        assert_ne!(first, second);
        assert_eq!(queue.count(NoticeLevel::Warning), 1);

        queue.dismiss(first);
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.last().map(|n| n.message.as_str()), Some("two"));
    }
}
