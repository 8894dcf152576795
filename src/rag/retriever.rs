//! Catalog retrieval for the chat agent: similarity search plus the text
//! formatting the answer prompt expects.

use crate::core::errors::ApiError;

use super::store::{DocumentChunk, VectorStore};

const TOP_K: usize = 6;

pub const NO_MATCHES_MESSAGE: &str = "No relevant product information found. \
Please try a different query or check if product catalog files have been loaded.";

pub struct Retrieval {
    pub context: String,
    pub matched: bool,
}

pub async fn retrieve(store: &VectorStore, query: &str) -> Result<Retrieval, ApiError> {
    let docs = store.similarity_search(query, TOP_K).await?;
    if docs.is_empty() {
        return Ok(Retrieval {
            context: NO_MATCHES_MESSAGE.to_string(),
            matched: false,
        });
    }

    Ok(Retrieval {
        context: format_retrieved(&docs, query),
        matched: true,
    })
}

/// Group chunks by source document and prepend a match summary, so the model
/// can cite which catalog file an answer came from.
fn format_retrieved(docs: &[DocumentChunk], query: &str) -> String {
    let mut order: Vec<&str> = Vec::new();
    for doc in docs {
        if !order.contains(&doc.source.as_str()) {
            order.push(&doc.source);
        }
    }

    let sections: Vec<String> = order
        .iter()
        .map(|source| {
            let contents: Vec<&str> = docs
                .iter()
                .filter(|doc| doc.source == *source)
                .map(|doc| doc.content.as_str())
                .collect();
            format!(
                "Source: {}\n\nInformation:\n{}",
                source,
                contents.join("\n---\n")
            )
        })
        .collect();

    let divider = format!("\n\n{}\n\n", "-".repeat(40));
    format!(
        "Found {} relevant sections from {} sources for query: \"{}\".\n\n{}",
        docs.len(),
        order.len(),
        query,
        sections.join(&divider)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, source: &str) -> DocumentChunk {
        DocumentChunk {
            content: content.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn groups_chunks_by_source() {
        let docs = vec![
            chunk("áo thun 199k", "ao.json"),
            chunk("quần jean 459k", "quan.json"),
            chunk("áo thun trắng 219k", "ao.json"),
        ];

        let text = format_retrieved(&docs, "áo thun");
        assert!(text.starts_with("Found 3 relevant sections from 2 sources"));
        assert!(text.contains("Source: ao.json"));
        assert!(text.contains("Source: quan.json"));
        // both ao.json chunks collapse into one section
        assert_eq!(text.matches("Source: ao.json").count(), 1);
        assert!(text.contains("áo thun 199k\n---\náo thun trắng 219k"));
    }

    #[test]
    fn summary_embeds_the_query() {
        let docs = vec![chunk("váy hoa", "vay.json")];
        let text = format_retrieved(&docs, "váy dự tiệc");
        assert!(text.contains("for query: \"váy dự tiệc\""));
    }
}
