//! Property-based tests: chunk boundaries never change the final text.

use policy_chat_stream::ChunkConsumer;
use policy_chat_types::{FramingMode, Phase};
use proptest::prelude::*;

fn split_at(bytes: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts
        .iter()
        .map(|c| c % bytes.len().max(1))
        .filter(|&c| c > 0)
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut parts = Vec::new();
    let mut start = 0;
    for p in points {
        parts.push(bytes[start..p].to_vec());
        start = p;
    }
    parts.push(bytes[start..].to_vec());
    parts
}

fn replay(parts: &[Vec<u8>], mode: FramingMode) -> ChunkConsumer {
    let mut consumer = ChunkConsumer::new(mode);
    for part in parts {
        consumer.push(part);
    }
    consumer.finish();
    consumer
}

proptest! {
    #[test]
    fn plain_text_survives_any_chunking(
        body in any::<String>(),
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        // A leading letter keeps the first chunk from ever parsing as a header.
        let text = format!("Q{body}");
        let bytes = text.as_bytes();

        let whole = replay(&[bytes.to_vec()], FramingMode::Plain);
        let split = replay(&split_at(bytes, &cuts), FramingMode::Plain);

        prop_assert_eq!(whole.session().text(), text.as_str());
        prop_assert_eq!(split.session().text(), whole.session().text());
        prop_assert_eq!(split.session().phase(), Phase::Done);
    }

    #[test]
    fn ndjson_content_survives_any_chunking(
        contents in proptest::collection::vec(any::<String>(), 0..6),
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut body = String::from("{\"conversation_id\":\"c-1\"}\n");
        for c in &contents {
            body.push_str(&serde_json::json!({ "content_chunk": c }).to_string());
            body.push('\n');
        }
        let bytes = body.as_bytes();

        let split = replay(&split_at(bytes, &cuts), FramingMode::Ndjson);
        let expected: String = contents.concat();

        prop_assert_eq!(split.session().text(), expected.as_str());
        prop_assert_eq!(split.session().conversation_id(), Some("c-1"));
    }

    #[test]
    fn replay_is_deterministic(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..16), 0..8),
    ) {
        for mode in [FramingMode::Plain, FramingMode::Ndjson] {
            let a = replay(&chunks, mode).into_session();
            let b = replay(&chunks, mode).into_session();
            prop_assert_eq!(a, b);
        }
    }
}
