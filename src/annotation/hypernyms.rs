/*! Hypernym navigation.

Walks over the knowledge-base hypernym hierarchy: scaling a synset a fixed
number of levels up, collecting the full hypernym chain, or checking an
ancestry relation. All walks treat the `entity` synset as the top of the
hierarchy and guard against cycles, which do occur in the data.
!*/
use std::collections::HashMap;

use log::error;

use super::service::{HypernymEdge, KnowledgeBase};

/// The `entity` synset, top of the hypernym hierarchy.
pub const STOP_SYNSET: &str = "bn:00031027n";

/// Hypernym walks over any [KnowledgeBase].
pub struct HypernymWalker<'a, K: KnowledgeBase + ?Sized> {
    kb: &'a K,
}

impl<'a, K: KnowledgeBase + ?Sized> HypernymWalker<'a, K> {
    pub fn new(kb: &'a K) -> Self {
        Self { kb }
    }

    /// The hypernym `levels` levels above `synset`.
    ///
    /// Each step prefers a plain HYPERNYM edge and falls back to the wider
    /// any-hypernym group. A step with no hypernym at all, or a lookup
    /// failure, ends the climb at whatever was reached so far.
    pub async fn scale(&self, synset: &str, levels: usize) -> String {
        let mut current = synset.to_string();
        for _ in 0..levels {
            match self.next_hypernym(&current).await {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// The synset itself plus every hypernym up to (excluding) the
    /// hierarchy top.
    ///
    /// A synset without hypernyms yields a single-element chain. Cycles
    /// end the chain at the point of recurrence.
    pub async fn chain(&self, synset: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = synset.to_string();
        loop {
            chain.push(current.clone());
            let next = match self.next_hypernym(&current).await {
                Some(next) => next,
                None => break,
            };
            if next == STOP_SYNSET || chain.contains(&next) {
                break;
            }
            current = next;
        }
        chain
    }

    /// Map each synset to its first hypernym; entries only exist where a
    /// hypernym does.
    pub async fn first_hypernyms(&self, synsets: &[String]) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for synset in synsets {
            if let Some(hypernym) = self.next_hypernym(synset).await {
                map.insert(synset.clone(), hypernym);
            }
        }
        map
    }

    /// Whether `top` is an ancestor of `synset` in the hypernym
    /// hierarchy. A synset is never its own hypernym.
    pub async fn is_hypernym_of(&self, synset: &str, top: &str) -> bool {
        if synset == top {
            return false;
        }
        let mut visited = vec![synset.to_string()];
        let mut current = synset.to_string();
        loop {
            let scaled = match self.next_hypernym(&current).await {
                Some(next) => next,
                None => return false,
            };
            if scaled == current {
                return false;
            }
            if scaled == top {
                return true;
            }
            if scaled == STOP_SYNSET || visited.contains(&scaled) {
                return false;
            }
            visited.push(scaled.clone());
            current = scaled;
        }
    }

    async fn next_hypernym(&self, synset: &str) -> Option<String> {
        match self.kb.hypernym_edges(synset).await {
            Ok(edges) => pick_hypernym(&edges),
            Err(e) => {
                error!("hypernym lookup failed for synset {synset}: {e}");
                None
            }
        }
    }
}

/// First direct HYPERNYM edge, falling back to the first edge of the wider
/// any-hypernym group.
fn pick_hypernym(edges: &[HypernymEdge]) -> Option<String> {
    edges
        .iter()
        .find(|e| e.direct)
        .or_else(|| edges.first())
        .map(|e| e.target.clone())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use oxilangtag::LanguageTag;

    use super::*;
    use crate::annotation::service::QueryError;

    /// In-memory hypernym graph.
    struct MapKb {
        edges: HashMap<String, Vec<HypernymEdge>>,
    }

    impl MapKb {
        fn new(links: &[(&str, &str)]) -> Self {
            let mut edges: HashMap<String, Vec<HypernymEdge>> = HashMap::new();
            for (from, to) in links {
                edges.entry(from.to_string()).or_default().push(HypernymEdge {
                    target: to.to_string(),
                    direct: true,
                });
            }
            Self { edges }
        }
    }

    #[async_trait]
    impl KnowledgeBase for MapKb {
        async fn resolve(&self, synset_id: &str) -> Result<bool, QueryError> {
            Ok(self.edges.contains_key(synset_id))
        }

        async fn contains_term(
            &self,
            _term: &str,
            _lang: &LanguageTag<String>,
        ) -> Result<bool, QueryError> {
            Ok(false)
        }

        async fn hypernym_edges(&self, id: &str) -> Result<Vec<HypernymEdge>, QueryError> {
            Ok(self.edges.get(id).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_scale() {
        let kb = MapKb::new(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let walker = HypernymWalker::new(&kb);

        assert_eq!(walker.scale("a", 2).await, "c");
        // climbing past the top of the graph stays at the last synset
        assert_eq!(walker.scale("a", 10).await, "d");
        assert_eq!(walker.scale("a", 0).await, "a");
    }

    #[tokio::test]
    async fn test_prefers_direct_edges() {
        let kb = MapKb {
            edges: HashMap::from([(
                "a".to_string(),
                vec![
                    HypernymEdge {
                        target: "any".into(),
                        direct: false,
                    },
                    HypernymEdge {
                        target: "direct".into(),
                        direct: true,
                    },
                ],
            )]),
        };
        let walker = HypernymWalker::new(&kb);

        assert_eq!(walker.scale("a", 1).await, "direct");
    }

    #[tokio::test]
    async fn test_chain_stops_at_top() {
        let kb = MapKb::new(&[("a", "b"), ("b", STOP_SYNSET)]);
        let walker = HypernymWalker::new(&kb);

        assert_eq!(walker.chain("a").await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_chain_is_cycle_safe() {
        let kb = MapKb::new(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let walker = HypernymWalker::new(&kb);

        assert_eq!(walker.chain("a").await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_chain_without_hypernyms() {
        let kb = MapKb::new(&[]);
        let walker = HypernymWalker::new(&kb);

        assert_eq!(walker.chain("lonely").await, vec!["lonely"]);
    }

    #[tokio::test]
    async fn test_first_hypernyms() {
        let kb = MapKb::new(&[("a", "b"), ("b", "c")]);
        let walker = HypernymWalker::new(&kb);

        let map = walker
            .first_hypernyms(&["a".to_string(), "b".to_string(), "x".to_string()])
            .await;

        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "b");
        assert_eq!(map["b"], "c");
        assert!(!map.contains_key("x"));
    }

    #[tokio::test]
    async fn test_is_hypernym_of_cycle_terminates() {
        // a -> b -> c -> a reaches neither the target nor the hierarchy
        // top; the walk must end at the point of recurrence
        let kb = MapKb::new(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let walker = HypernymWalker::new(&kb);

        assert!(!walker.is_hypernym_of("a", "vehicle").await);
        assert!(walker.is_hypernym_of("a", "c").await);
    }

    #[tokio::test]
    async fn test_is_hypernym_of() {
        let kb = MapKb::new(&[("cat", "feline"), ("feline", "animal")]);
        let walker = HypernymWalker::new(&kb);

        assert!(walker.is_hypernym_of("cat", "animal").await);
        assert!(walker.is_hypernym_of("cat", "feline").await);
        assert!(!walker.is_hypernym_of("animal", "cat").await);
        assert!(!walker.is_hypernym_of("cat", "cat").await);
        assert!(!walker.is_hypernym_of("cat", "vehicle").await);
    }
}
