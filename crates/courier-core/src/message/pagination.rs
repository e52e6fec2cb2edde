//! Fixed-size page slicing over the ordered message list.
//!
//! Page `k` is the half-open range `[k * size, min((k + 1) * size, total))`.
//! A page past the end is empty, never an error.

use courier_types::message::{Message, MessagePage};

/// Slice page `page` (zero-based) out of `messages`.
pub fn paginate(messages: &[Message], page: usize, page_size: usize) -> MessagePage {
    let total = messages.len();
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    MessagePage {
        page,
        messages: messages[start..end].to_vec(),
        total,
    }
}

/// Navigation helpers deciding which page controls to render.
///
/// Extension trait because `MessagePage` is defined in courier-types.
pub trait PageNavExt {
    /// Whether a "previous page" control applies.
    fn has_previous(&self) -> bool;

    /// Whether messages exist beyond this page.
    fn has_next(&self, page_size: usize) -> bool;
}

impl PageNavExt for MessagePage {
    fn has_previous(&self) -> bool {
        self.page > 0
    }

    fn has_next(&self, page_size: usize) -> bool {
        self.total > self.page.saturating_add(1).saturating_mul(page_size)
    }
}
