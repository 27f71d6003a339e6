//! Fenced code block rendering of a selection.

use crate::app::deliver::Deliverer;
use crate::domain::model::{RenderedText, Selection};

const MIN_FENCE: usize = 3;

/// Wraps the selection in a fenced code block. The source label, when
/// present, becomes the fence info string.
#[derive(Debug)]
pub struct CodeBlockDeliverer {
    selection: Selection,
    fence: String,
}

impl CodeBlockDeliverer {
    pub fn new(selection: Selection) -> Self {
        Self::with_fence(selection, "```")
    }

    pub fn with_fence(selection: Selection, fence: impl Into<String>) -> Self {
        Self {
            selection,
            fence: fence.into(),
        }
    }
}

impl Deliverer for CodeBlockDeliverer {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn into_selection(self) -> Selection {
        self.selection
    }

    fn render(&self) -> RenderedText {
        let text = self.selection.text();
        let fence = fence_for(text, &self.fence);
        let info = self.selection.source_label().unwrap_or("");

        let mut out = String::with_capacity(text.len() + fence.len() * 2 + info.len() + 3);
        out.push_str(&fence);
        out.push_str(info);
        out.push('\n');
        out.push_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&fence);
        RenderedText::new(out)
    }
}

/// Widen a backtick fence until it cannot collide with a backtick run inside
/// the text. Non-backtick fences are used as configured.
fn fence_for(text: &str, configured: &str) -> String {
    if !configured.starts_with('`') {
        return configured.to_string();
    }

    let mut longest = 0usize;
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let needed = (longest + 1).max(MIN_FENCE).max(configured.chars().count());
    "`".repeat(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_text_in_fences() {
        let sel = Selection::new("fn main() {}").unwrap();
        let rendered = CodeBlockDeliverer::new(sel).render();
        assert_eq!(rendered.as_str(), "```\nfn main() {}\n```");
    }

    #[test]
    fn label_becomes_info_string() {
        let sel = Selection::with_source("let x = 1;", "rust").unwrap();
        let rendered = CodeBlockDeliverer::new(sel).render();
        assert_eq!(rendered.as_str(), "```rust\nlet x = 1;\n```");
    }

    #[test]
    fn trailing_newline_not_doubled() {
        let sel = Selection::new("done\n").unwrap();
        let rendered = CodeBlockDeliverer::new(sel).render();
        assert_eq!(rendered.as_str(), "```\ndone\n```");
    }

    #[test]
    fn backtick_runs_widen_the_fence() {
        let sel = Selection::new("a ``` b").unwrap();
        let rendered = CodeBlockDeliverer::new(sel).render();
        assert_eq!(rendered.as_str(), "````\na ``` b\n````");
    }

    #[test]
    fn tilde_fence_used_verbatim() {
        let sel = Selection::new("```").unwrap();
        let rendered = CodeBlockDeliverer::with_fence(sel, "~~~").render();
        assert_eq!(rendered.as_str(), "~~~\n```\n~~~");
    }

    #[test]
    fn empty_selection_renders_empty_block() {
        let sel = Selection::new("").unwrap();
        let rendered = CodeBlockDeliverer::new(sel).render();
        assert_eq!(rendered.as_str(), "```\n```");
    }
}
