//! Answer rendering. All server-supplied text reaches HTML output only through
//! [`escape_html`].

use std::fmt::Write as _;

use crate::messages::QueryResponse;

/// Placeholder tag shown when an answer cites nothing.
pub const NO_SOURCES: &str = "No sources found";

/// Escape `& < > " '` so the text renders literally inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Score label shown under each context chunk, one decimal place.
pub fn distance_label(score: f64) -> String {
    format!("Distance: {:.1}", round_ties_away(score))
}

/// Exact halfway values between two tenths are the odd multiples of 0.25;
/// round those away from zero. `{:.1}` handles everything else.
fn round_ties_away(score: f64) -> f64 {
    let quarters = score * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (score * 10.0).round() / 10.0
    } else {
        score
    }
}

/// One retrieved passage as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextBlock {
    pub content: String,
    pub source: String,
    pub score_label: String,
}

/// Populated result panel: answer, source tags, context blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub answer: String,
    /// One tag per source in server order, or the single [`NO_SOURCES`] tag.
    pub source_tags: Vec<String>,
    pub context_blocks: Vec<ContextBlock>,
}

/// Build the result panel for `response`.
pub fn render_result(response: &QueryResponse) -> ResultView {
    let source_tags = if response.sources.is_empty() {
        vec![NO_SOURCES.to_string()]
    } else {
        response.sources.clone()
    };

    let context_blocks = response
        .context_chunks
        .iter()
        .map(|chunk| ContextBlock {
            content: chunk.content.clone(),
            source: chunk.source.clone(),
            score_label: distance_label(chunk.score),
        })
        .collect();

    ResultView {
        answer: response.answer.clone(),
        source_tags,
        context_blocks,
    }
}

impl ResultView {
    /// HTML fragment for the result panel.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(
            html,
            r#"<div id="answerText">{}</div>"#,
            escape_html(&self.answer)
        );

        html.push_str(r#"<div id="sourcesList">"#);
        for tag in &self.source_tags {
            let _ = write!(html, r#"<span class="source-tag">{}</span>"#, escape_html(tag));
        }
        html.push_str("</div>\n");

        html.push_str(r#"<div id="contextList">"#);
        for block in &self.context_blocks {
            let _ = write!(
                html,
                concat!(
                    r#"<div class="context-chunk"><p>{}</p>"#,
                    r#"<div class="context-chunk-source">{} "#,
                    r#"<span class="context-chunk-score">{}</span></div></div>"#
                ),
                escape_html(&block.content),
                escape_html(&block.source),
                escape_html(&block.score_label),
            );
        }
        html.push_str("</div>\n");
        html
    }

    /// Plain-text rendering for a terminal.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Answer:\n{}", self.answer);
        let _ = writeln!(out, "\nSources:");
        for tag in &self.source_tags {
            let _ = writeln!(out, "  [{}]", tag);
        }
        if !self.context_blocks.is_empty() {
            let _ = writeln!(out, "\nContext:");
            for (i, block) in self.context_blocks.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, block.content);
                let _ = writeln!(out, "     {}  {}", block.source, block.score_label);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ContextChunk;

    fn paris() -> QueryResponse {
        QueryResponse {
            answer: "Paris is the capital of France.".into(),
            sources: vec!["doc1.txt".into()],
            context_chunks: vec![ContextChunk {
                content: "France's capital is Paris.".into(),
                source: "doc1.txt".into(),
                score: 0.87,
            }],
        }
    }

    #[test]
    fn escapes_every_significant_character() {
        assert_eq!(
            escape_html(r#"a & b < c > d " e ' f"#),
            "a &amp; b &lt; c &gt; d &quot; e &#039; f"
        );
        assert_eq!(escape_html("plain text"), "plain text");
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn exact_ties_round_up() {
        assert_eq!(distance_label(0.25), "Distance: 0.3");
        assert_eq!(distance_label(0.75), "Distance: 0.8");
        assert_eq!(distance_label(1.25), "Distance: 1.3");
        assert_eq!(distance_label(2.25), "Distance: 2.3");
        assert_eq!(distance_label(-0.25), "Distance: -0.3");
    }

    #[test]
    fn non_ties_keep_nearest_tenth() {
        assert_eq!(distance_label(0.87), "Distance: 0.9");
        assert_eq!(distance_label(0.5), "Distance: 0.5");
        assert_eq!(distance_label(1.0), "Distance: 1.0");
        assert_eq!(distance_label(0.04), "Distance: 0.0");
        assert_eq!(distance_label(12.96), "Distance: 13.0");
    }

    #[test]
    fn null_lists_render_placeholder() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"answer":"hi","sources":null,"context_chunks":null}"#)
                .unwrap();
        let view = render_result(&resp);
        assert_eq!(view.answer, "hi");
        assert_eq!(view.source_tags, vec![NO_SOURCES]);
        assert!(view.context_blocks.is_empty());
    }

    #[test]
    fn renders_answer_sources_and_context() {
        let view = render_result(&paris());
        assert_eq!(view.answer, "Paris is the capital of France.");
        assert_eq!(view.source_tags, vec!["doc1.txt"]);
        assert_eq!(view.context_blocks.len(), 1);
        assert_eq!(view.context_blocks[0].score_label, "Distance: 0.9");

        let html = view.to_html();
        assert!(html.contains("Paris is the capital of France."));
        assert!(html.contains(r#"<span class="source-tag">doc1.txt</span>"#));
        assert!(html.contains("France&#039;s capital is Paris."));
        assert!(html.contains("Distance: 0.9"));
    }

    #[test]
    fn empty_sources_render_placeholder_tag() {
        let mut resp = paris();
        resp.sources.clear();
        let view = render_result(&resp);
        assert_eq!(view.source_tags, vec![NO_SOURCES]);
        assert_eq!(view.to_html().matches(r#"class="source-tag""#).count(), 1);
    }

    #[test]
    fn sources_keep_server_order() {
        let mut resp = paris();
        resp.sources = vec!["b.md".into(), "a.md".into(), "b.md".into()];
        assert_eq!(render_result(&resp).source_tags, vec!["b.md", "a.md", "b.md"]);
    }

    #[test]
    fn chunk_markup_is_never_emitted() {
        let mut resp = paris();
        resp.context_chunks[0].content = "<script>alert(1)</script>".into();
        resp.context_chunks[0].source = "<b>evil.txt</b>".into();
        let html = render_result(&resp).to_html();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;evil.txt&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn answer_markup_is_shown_literally() {
        let mut resp = paris();
        resp.answer = "<img src=x onerror=alert(1)>".into();
        let html = render_result(&resp).to_html();
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn no_chunks_render_empty_context_list() {
        let mut resp = paris();
        resp.context_chunks.clear();
        let view = render_result(&resp);
        assert!(view.to_html().contains(r#"<div id="contextList"></div>"#));
        assert!(!view.to_text().contains("Context:"));
    }

    #[test]
    fn text_rendering_lists_everything() {
        let text = render_result(&paris()).to_text();
        assert!(text.contains("Paris is the capital of France."));
        assert!(text.contains("[doc1.txt]"));
        assert!(text.contains("1. France's capital is Paris."));
        assert!(text.contains("doc1.txt  Distance: 0.9"));
    }
}
