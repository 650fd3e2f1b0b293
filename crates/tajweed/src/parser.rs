use crate::rules;

/// One renderable run of verse text.
///
/// `rule_id` and `color` are `None` for plain runs. Concatenating `text`
/// across a parse result reconstructs the tag-stripped input exactly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct TajweedSegment {
    pub text: String,
    pub rule_id: Option<String>,
    pub color: Option<String>,
}

impl TajweedSegment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            rule_id: None,
            color: None,
        }
    }
}

const OPEN_PREFIX: &str = "<span class=\"";
const OPEN_SUFFIX: &str = "\">";
const CLOSE_TAG: &str = "</span>";

/// Parse tajweed-annotated verse markup into renderable segments.
///
/// The input is the Quran.Foundation `text_uthmani_tajweed` field: plain
/// text interleaved with non-nested `<span class="...">...</span>` runs.
/// Spans whose class token is in the rule table become colored segments;
/// unknown classes keep their inner text as a plain segment. Total on any
/// input: a malformed or unterminated tag flushes the remainder of the
/// string as plain text instead of failing.
pub fn parse(markup: &str) -> Vec<TajweedSegment> {
    let mut segments = Vec::new();
    let mut rest = markup;

    while let Some(open) = rest.find(OPEN_PREFIX) {
        push_plain(&mut segments, &rest[..open]);

        let tagged = &rest[open..];
        let after_prefix = &tagged[OPEN_PREFIX.len()..];

        let Some(class_end) = after_prefix.find(OPEN_SUFFIX) else {
            // unterminated opener
            push_plain(&mut segments, tagged);
            return segments;
        };
        let class = &after_prefix[..class_end];

        let body = &after_prefix[class_end + OPEN_SUFFIX.len()..];
        let Some(close) = body.find(CLOSE_TAG) else {
            // opener without a matching close tag
            push_plain(&mut segments, tagged);
            return segments;
        };
        let inner = &body[..close];

        segments.push(match rules::rule_by_class(class) {
            Some(rule) => TajweedSegment {
                text: inner.to_string(),
                rule_id: Some(rule.id.to_string()),
                color: Some(rule.color.to_string()),
            },
            None => TajweedSegment::plain(inner),
        });

        rest = &body[close + CLOSE_TAG.len()..];
    }

    push_plain(&mut segments, rest);
    segments
}

fn push_plain(segments: &mut Vec<TajweedSegment>, text: &str) {
    if !text.is_empty() {
        segments.push(TajweedSegment::plain(text));
    }
}
