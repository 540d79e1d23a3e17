//! Message-history normalization.
//!
//! Two passes run over an application-level history before it reaches a
//! provider: role normalization (tagged `ai-<model>` roles become plain
//! `assistant`) and attachment injection (reference-block lines in user
//! messages are replaced with the extracted text of the attachment they
//! name).

use crate::{Content, Message, Role};

/// The marker line that opens a reference block in a user message.
pub const REFERENCE_MARKER: &str = "CONTEXT FILES:";

/// Prefix of a reference line naming an attachment.
const REFERENCE_PREFIX: &str = "### ";

/// A read-only store of extracted attachment text, keyed by attachment
/// name. Implemented by the surrounding application.
pub trait AttachmentStore {
    /// The extracted text for `key`, or `None` if the attachment is
    /// unknown or has no extraction.
    fn extracted_text(&self, key: &str) -> Option<String>;
}

/// Rewrite tagged-assistant roles to plain `assistant`.
///
/// Idempotent: histories that only carry plain roles pass through
/// untouched. No provider ever sees a model-suffixed role.
pub fn normalize_roles(messages: &mut [Message]) {
    for message in messages.iter_mut() {
        if matches!(message.role, Role::Ai(_)) {
            message.role = Role::Assistant;
        }
    }
}

/// Replace reference-block lines in user messages with extracted
/// attachment content.
///
/// Only messages containing a line equal to [`REFERENCE_MARKER`] are
/// touched; everything else passes through byte-identical. Within a
/// marked message, each `### <name>` line after the marker is looked up
/// in `store`: found attachments have their line replaced with
/// `### <name> (Extracted Content)\n<text>`, unknown names pass through
/// unchanged. Line order is preserved and every input line maps to
/// exactly one output line.
pub fn inject_attachments(messages: &mut [Message], store: &impl AttachmentStore) {
    for message in messages.iter_mut() {
        if message.role != Role::User {
            continue;
        }
        message
            .content
            .for_each_text_mut(|text| inject_into_text(text, store));
    }
}

/// Run both normalization passes over a history.
pub fn normalize_history(messages: &mut [Message], store: &impl AttachmentStore) {
    normalize_roles(messages);
    inject_attachments(messages, store);
}

fn inject_into_text(text: &mut String, store: &impl AttachmentStore) {
    if !text.split('\n').any(|line| line.trim() == REFERENCE_MARKER) {
        return;
    }

    let mut in_block = false;
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if line.trim() == REFERENCE_MARKER {
                in_block = true;
            } else if in_block
                && let Some(name) = line.strip_prefix(REFERENCE_PREFIX)
            {
                let key = name.trim();
                if let Some(extracted) = store.extracted_text(key) {
                    return format!("{REFERENCE_PREFIX}{key} (Extracted Content)\n{extracted}");
                }
            }
            line.to_owned()
        })
        .collect();
    *text = lines.join("\n");
}

impl Message {
    /// The transcript tag for this message's role, as consumed by the
    /// transcript writer (`"ai-<model>"` for tagged assistant turns).
    pub fn transcript_tag(&self) -> compact_str::CompactString {
        self.role.as_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoStore;

    impl AttachmentStore for NoStore {
        fn extracted_text(&self, _key: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn text_without_marker_is_untouched() {
        let mut text = String::from("### doc.pdf\nno marker here");
        let before = text.clone();
        inject_into_text(&mut text, &NoStore);
        assert_eq!(text, before);
    }

    #[test]
    fn parts_content_is_injected_per_text_part() {
        struct One;
        impl AttachmentStore for One {
            fn extracted_text(&self, key: &str) -> Option<String> {
                (key == "a.txt").then(|| "A".into())
            }
        }

        let mut messages = vec![Message::user_parts([
            crate::Part::Text {
                text: format!("{REFERENCE_MARKER}\n### a.txt"),
            },
            crate::Part::ImageUrl {
                url: "https://example.com/x.png".into(),
            },
        ])];
        inject_attachments(&mut messages, &One);
        let Content::Parts(parts) = &messages[0].content else {
            panic!("expected parts");
        };
        let crate::Part::Text { text } = &parts[0] else {
            panic!("expected text part");
        };
        assert_eq!(text, &format!("{REFERENCE_MARKER}\n### a.txt (Extracted Content)\nA"));
    }
}
