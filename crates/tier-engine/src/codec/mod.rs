//! Board State Codec
//!
//! Board <-> URL token. Only tier ids, names and `(item id, content)`
//! pairs travel; images and label positions are re-derived on decode.

mod lz;

pub use lz::{compress_to_uri, decompress_from_uri};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Board, LabelPosition, Tier, TierId};
use crate::error::CodecError;
use crate::resolver::ItemResolver;

/// Longest token accepted from a URL
pub const MAX_TOKEN_LEN: usize = 64 * 1024;

/// Minimal per-tier projection carried in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TierToken {
    id: TierId,
    name: String,
    /// `[itemId, itemContent]` pairs in display order
    items: Vec<(String, String)>,
}

impl From<&Tier> for TierToken {
    fn from(tier: &Tier) -> Self {
        Self {
            id: tier.id.clone(),
            name: tier.name.clone(),
            items: tier
                .items
                .iter()
                .map(|item| (item.id.clone(), item.content.clone()))
                .collect(),
        }
    }
}

/// Serialize a board into a URL-safe token
pub fn encode(board: &Board) -> String {
    let tokens: Vec<TierToken> = board.tiers.iter().map(TierToken::from).collect();
    // Vec of plain structs of strings cannot fail to serialize
    let json = serde_json::to_string(&tokens).unwrap_or_default();
    compress_to_uri(&json)
}

/// Rebuild a board, or say why the token is unusable
///
/// Every item goes through the resolver with the token content as
/// fallback. Duplicate item ids keep their first placement; a repeated
/// tier id folds its items into the first tier with that id.
pub fn try_decode(
    token: &str,
    resolver: &ItemResolver,
    label_position: LabelPosition,
) -> Result<Board, CodecError> {
    if token.is_empty() {
        return Err(CodecError::EmptyToken);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CodecError::TokenTooLong {
            len: token.len(),
            max: MAX_TOKEN_LEN,
        });
    }

    let json = decompress_from_uri(token)?;
    let tokens: Vec<TierToken> = serde_json::from_str(&json)?;
    if tokens.is_empty() {
        return Err(CodecError::EmptyBoard);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut tiers: Vec<Tier> = Vec::with_capacity(tokens.len());
    for tier in tokens {
        let items: Vec<_> = tier
            .items
            .into_iter()
            .filter(|(id, _)| {
                let fresh = seen.insert(id.clone());
                if !fresh {
                    log::debug!("token repeats item {:?}, keeping first placement", id);
                }
                fresh
            })
            .map(|(id, content)| resolver.resolve(&id, &content))
            .collect();

        match tiers.iter_mut().find(|existing| existing.id == tier.id) {
            Some(existing) => {
                log::debug!("token repeats tier {}, merging its items", tier.id);
                existing.items.extend(items);
            }
            None => tiers.push(Tier {
                id: tier.id,
                name: tier.name,
                items,
                label_position: Some(label_position),
                placeholder: None,
            }),
        }
    }

    Ok(Board::new(tiers))
}

/// Rebuild a board; `None` means "no state available"
pub fn decode(token: &str, resolver: &ItemResolver, label_position: LabelPosition) -> Option<Board> {
    match try_decode(token, resolver, label_position) {
        Ok(board) => Some(board),
        Err(e) => {
            log::warn!("ignoring unusable board token: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemSource};
    use crate::resolver::{Catalog, CustomItemStore};
    use crate::storage::MemoryStore;

    fn resolver() -> ItemResolver {
        let catalog = Catalog::from_json(r#"{"games":[{"filename":"zelda.png","label":"Zelda"}]}"#).unwrap();
        let custom = CustomItemStore::new(Box::new(MemoryStore::new()), "k", true);
        ItemResolver::new(catalog, custom, "https://tierlist.app/images/placeholder.png")
    }

    fn sample_board() -> Board {
        Board::new(vec![
            Tier::new("tier-s", "S")
                .with_items(vec![Item::new("games-zelda.png", "Zelda").with_image("/images/games/zelda.png")]),
            Tier::new("tier-a", "A (the good ones)"),
            Tier::sink(Some(LabelPosition::Top)).with_items(vec![
                Item::new("c-1", "Crème brûlée").with_image("data:image/png;base64,AAAA"),
                Item::new("c-2", "Ünïcödé 🍰"),
            ]),
        ])
    }

    fn shape(board: &Board) -> Vec<(String, String, Vec<(String, String)>)> {
        board
            .tiers
            .iter()
            .map(|t| {
                (
                    t.id.to_string(),
                    t.name.clone(),
                    t.items.iter().map(|i| (i.id.clone(), i.content.clone())).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_ids_names_and_order() {
        let board = sample_board();
        let token = encode(&board);
        let decoded = decode(&token, &resolver(), LabelPosition::Left).unwrap();

        assert_eq!(shape(&decoded), shape(&board));
        assert!(decoded.tiers[2].id.is_sink());
    }

    #[test]
    fn test_decode_rederives_images_and_label_position() {
        let token = encode(&sample_board());
        let decoded = decode(&token, &resolver(), LabelPosition::Right).unwrap();

        let zelda = &decoded.tiers[0].items[0];
        assert_eq!(zelda.source, ItemSource::Catalog);

        let unknown = &decoded.tiers[2].items[0];
        assert_eq!(unknown.source, ItemSource::Placeholder);
        assert_eq!(unknown.content, "Crème brûlée");
        assert_eq!(unknown.image_url.as_deref(), Some("https://tierlist.app/images/placeholder.png"));

        assert!(decoded.tiers.iter().all(|t| t.label_position == Some(LabelPosition::Right)));
    }

    #[test]
    fn test_payload_is_minimal_projection() {
        let json = decompress_from_uri(&encode(&sample_board())).unwrap();
        assert!(json.starts_with(r#"[{"id":"tier-s","name":"S","items":[["games-zelda.png","Zelda"]]}"#));
        assert!(!json.contains("imageUrl"));
        assert!(!json.contains("labelPosition"));
    }

    #[test]
    fn test_failures_are_none() {
        let resolver = resolver();
        assert!(decode("", &resolver, LabelPosition::Left).is_none());
        assert!(decode("not a token!", &resolver, LabelPosition::Left).is_none());
        assert!(decode(&compress_to_uri("{not json"), &resolver, LabelPosition::Left).is_none());
        assert!(decode(&compress_to_uri(r#"{"id":"x"}"#), &resolver, LabelPosition::Left).is_none());
        assert!(decode(&compress_to_uri(r#"[{"id":"x","name":"X"}]"#), &resolver, LabelPosition::Left).is_none());
    }

    #[test]
    fn test_error_kinds() {
        let resolver = resolver();
        assert!(matches!(
            try_decode(&compress_to_uri("[]"), &resolver, LabelPosition::Left),
            Err(CodecError::EmptyBoard)
        ));
        assert!(matches!(
            try_decode("a%b", &resolver, LabelPosition::Left),
            Err(CodecError::Decompress(_))
        ));
        let huge = "A".repeat(MAX_TOKEN_LEN + 1);
        assert!(matches!(
            try_decode(&huge, &resolver, LabelPosition::Left),
            Err(CodecError::TokenTooLong { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_keep_first_placement() {
        let json = r#"[{"id":"tier-s","name":"S","items":[["a","A"]]},{"id":"tier-a","name":"A","items":[["a","A again"],["b","B"]]}]"#;
        let decoded = decode(&compress_to_uri(json), &resolver(), LabelPosition::Left).unwrap();

        assert_eq!(decoded.item_count(), 2);
        assert_eq!(decoded.tiers[0].items[0].content, "A");
        assert_eq!(decoded.tiers[1].items[0].id, "b");
    }

    #[test]
    fn test_repeated_tier_ids_merge_into_first() {
        let json = r#"[{"id":"uncategorized","name":"Unsorted","items":[["a","A"]]},{"id":"tier-s","name":"S","items":[]},{"id":"uncategorized","name":"Again","items":[["b","B"]]}]"#;
        let decoded = decode(&compress_to_uri(json), &resolver(), LabelPosition::Left).unwrap();

        assert_eq!(decoded.tiers.len(), 2);
        assert!(decoded.tiers[0].id.is_sink());
        assert_eq!(decoded.tiers[0].name, "Unsorted");
        let ids: Vec<&str> = decoded.tiers[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
