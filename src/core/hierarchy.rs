//! Board hierarchy cache
//!
//! Fetches the flat board list once, builds a parent → children index and an
//! ancestor chain per board, and serves synchronous lookups from it until a
//! forced refresh.
//!
//! # Consistency
//!
//! A refresh builds a complete new [`BoardIndex`] off to the side and publishes
//! it with a single pointer swap. Readers see either the previous index or the
//! new one, never a half-built tree. Concurrent refreshes are not coalesced:
//! each issues its own fetch and the last one to finish wins.

use crate::core::api::BoardApi;
use crate::core::board::{Board, BoardId, OrderSpec};
use crate::core::error::{Error, Result};
use crate::theme::board_color;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Derived per-board data
#[derive(Debug, Clone, PartialEq)]
pub struct BoardExInfo {
    /// Direct children, in fetch order
    pub subboards: Vec<Board>,
    pub color: String,
    pub color_hover: String,
    /// Board id followed by its ancestors, topmost last
    pub chain: Vec<BoardId>,
}

/// Immutable snapshot of the board tree
#[derive(Debug, Clone, Default)]
pub struct BoardIndex {
    info_map: FxHashMap<BoardId, Board>,
    root_list: Vec<Board>,
    ex_info_map: FxHashMap<BoardId, BoardExInfo>,
    raw: Vec<Board>,
}

impl BoardIndex {
    /// Builds the full index from a fetched list.
    ///
    /// Duplicate ids keep the last record. Chains are computed leniently: a
    /// parent missing from the list ends the chain at the board that
    /// referenced it, and a cycle ends it before the repeated id.
    pub fn build(boards: Vec<Board>) -> Self {
        let mut info_map: FxHashMap<BoardId, Board> = FxHashMap::default();
        for board in &boards {
            if info_map.insert(board.id.clone(), board.clone()).is_some() {
                tracing::warn!("Duplicate board id {} in board list, keeping last", board.id);
            }
        }

        // Positions follow the first occurrence of an id, contents the last
        let mut children: FxHashMap<BoardId, Vec<Board>> = FxHashMap::default();
        let mut root_list = Vec::new();
        let mut placed: FxHashSet<&BoardId> = FxHashSet::default();
        for id in boards.iter().map(|b| &b.id) {
            if !placed.insert(id) {
                continue;
            }
            let Some(board) = info_map.get(id) else {
                continue;
            };
            match &board.parent_id {
                Some(parent) => children.entry(parent.clone()).or_default().push(board.clone()),
                None => root_list.push(board.clone()),
            }
        }

        let ex_info_map = info_map
            .values()
            .map(|board| {
                let colors = board_color::colors_for(board);
                let ex = BoardExInfo {
                    subboards: children.remove(&board.id).unwrap_or_default(),
                    color: colors.color,
                    color_hover: colors.hover,
                    chain: lenient_chain(&info_map, &board.id),
                };
                (board.id.clone(), ex)
            })
            .collect();

        Self {
            info_map,
            root_list,
            ex_info_map,
            raw: boards,
        }
    }

    pub fn info(&self, id: &BoardId) -> Option<&Board> {
        self.info_map.get(id)
    }

    pub fn ex_info(&self, id: &BoardId) -> Option<&BoardExInfo> {
        self.ex_info_map.get(id)
    }

    /// Root boards in fetch order
    pub fn roots(&self) -> &[Board] {
        &self.root_list
    }

    /// The list exactly as fetched
    pub fn raw(&self) -> &[Board] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.info_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info_map.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BoardId> {
        self.info_map.keys()
    }

    pub fn ex_ids(&self) -> impl Iterator<Item = &BoardId> {
        self.ex_info_map.keys()
    }

    /// Memoized chain, or empty when the board is unknown
    pub fn chain(&self, id: &BoardId) -> Vec<BoardId> {
        self.ex_info_map
            .get(id)
            .map(|ex| ex.chain.clone())
            .unwrap_or_default()
    }

    /// Walks `parent_id` links from `id` up to a root.
    ///
    /// The walk visits each board at most once, so it is bounded by the
    /// index size. An empty index yields `[id]` (or nothing for an empty id).
    ///
    /// # Errors
    ///
    /// [`Error::AncestorCycleOrMissingNode`] when `id` or one of its ancestors
    /// is not in the index, or an ancestor repeats.
    pub fn walk_chain(&self, id: &BoardId) -> Result<Vec<BoardId>> {
        if id.is_empty() {
            return Ok(Vec::new());
        }
        if self.info_map.is_empty() {
            return Ok(vec![id.clone()]);
        }

        let mut chain = vec![id.clone()];
        let mut seen: FxHashSet<&BoardId> = FxHashSet::default();
        let mut current = id;

        loop {
            seen.insert(current);
            let board = self.info_map.get(current).ok_or_else(|| {
                Error::AncestorCycleOrMissingNode {
                    board: current.clone(),
                    depth: chain.len() - 1,
                }
            })?;
            let Some(parent) = &board.parent_id else {
                return Ok(chain);
            };
            if seen.contains(parent) {
                return Err(Error::AncestorCycleOrMissingNode {
                    board: parent.clone(),
                    depth: chain.len(),
                });
            }
            chain.push(parent.clone());
            current = parent;
        }
    }
}

fn lenient_chain(info_map: &FxHashMap<BoardId, Board>, id: &BoardId) -> Vec<BoardId> {
    let mut chain = vec![id.clone()];
    let mut seen: FxHashSet<&BoardId> = FxHashSet::default();
    let mut current = id;
    seen.insert(current);

    while let Some(parent) = info_map.get(current).and_then(|b| b.parent_id.as_ref()) {
        if !info_map.contains_key(parent) {
            tracing::warn!("Board {current} references missing parent {parent}");
            break;
        }
        if !seen.insert(parent) {
            tracing::warn!("Board {id} has a parent cycle through {parent}");
            break;
        }
        chain.push(parent.clone());
        current = parent;
    }
    chain
}

/// Lazily loaded, explicitly refreshed board tree
#[derive(Debug)]
pub struct BoardCache<C> {
    api: C,
    order: OrderSpec,
    index: RwLock<Option<Arc<BoardIndex>>>,
}

impl<C: BoardApi> BoardCache<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            order: OrderSpec::boards(),
            index: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    /// Loads the board list unless already loaded.
    ///
    /// Returns `Ok(true)` when a fetch was made and published, `Ok(false)`
    /// when the cached index was reused.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] when the fetch fails. The previous index (or the
    /// not-loaded state) is left untouched.
    pub async fn ensure_loaded(&self, force_refresh: bool) -> Result<bool> {
        if !force_refresh && self.is_loaded() {
            return Ok(false);
        }

        tracing::debug!("Fetching board list (order {})", self.order);
        let boards = match self.api.list_boards(&self.order).await {
            Ok(boards) => boards,
            Err(e) => {
                tracing::warn!("Board list fetch failed: {e}");
                return Err(e.into());
            }
        };

        let index = Arc::new(BoardIndex::build(boards));
        tracing::info!(
            "Board index rebuilt: {} boards, {} roots",
            index.len(),
            index.roots().len()
        );
        self.publish(index);
        Ok(true)
    }

    fn publish(&self, index: Arc<BoardIndex>) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(index);
    }

    /// Current index, if one has been loaded
    pub fn snapshot(&self) -> Option<Arc<BoardIndex>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Board id followed by its ancestors.
    ///
    /// Without `force_refresh` this is a best-effort read of the memoized
    /// chain (empty when unknown or not loaded). With it, the chain is walked
    /// again over the loaded boards.
    ///
    /// # Errors
    ///
    /// Only the forced walk fails, see [`BoardIndex::walk_chain`].
    pub fn chain_for(&self, id: &BoardId, force_refresh: bool) -> Result<Vec<BoardId>> {
        let snapshot = self.snapshot();
        if !force_refresh {
            return Ok(snapshot.map(|idx| idx.chain(id)).unwrap_or_default());
        }
        match snapshot {
            Some(index) => index.walk_chain(id),
            None => BoardIndex::default().walk_chain(id),
        }
    }

    pub fn info_for(&self, id: &BoardId) -> Option<Board> {
        self.snapshot()?.info(id).cloned()
    }

    pub fn ex_info_for(&self, id: &BoardId) -> Option<BoardExInfo> {
        self.snapshot()?.ex_info(id).cloned()
    }

    /// Inline style `{key: color}` for a board id, empty when unknown
    pub fn line_style_by_id(&self, id: &BoardId, key: Option<&str>) -> BTreeMap<String, String> {
        let key = key.unwrap_or(board_color::DEFAULT_LINE_STYLE_KEY);
        self.ex_info_for(id)
            .map(|ex| BTreeMap::from([(key.to_string(), ex.color)]))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::test_helpers::{MockBoardApi, board, child, ids};

    fn three_level() -> Vec<Board> {
        vec![board(1, "root"), child(2, 1, "mid"), child(3, 2, "leaf")]
    }

    #[test]
    fn test_build_chains() {
        let index = BoardIndex::build(three_level());
        assert_eq!(index.chain(&"3".into()), ids(&[3, 2, 1]));
        assert_eq!(index.chain(&"2".into()), ids(&[2, 1]));
        assert_eq!(index.chain(&"1".into()), ids(&[1]));
        assert!(index.chain(&"99".into()).is_empty());
    }

    #[test]
    fn test_rebuild_gives_equal_ex_info() {
        let a = BoardIndex::build(three_level());
        let b = BoardIndex::build(three_level());
        for id in ids(&[1, 2, 3]) {
            assert_eq!(a.ex_info(&id), b.ex_info(&id));
        }
        assert_ne!(a.ex_info(&"1".into()), a.ex_info(&"2".into()));
    }

    #[test]
    fn test_build_subboards_in_input_order() {
        let boards = vec![
            board(1, "root"),
            child(4, 1, "d"),
            child(2, 1, "b"),
            child(3, 1, "c"),
        ];
        let index = BoardIndex::build(boards);
        let subs: Vec<_> = index
            .ex_info(&"1".into())
            .unwrap()
            .subboards
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(subs, ids(&[4, 2, 3]));
        assert!(index.ex_info(&"4".into()).unwrap().subboards.is_empty());
    }

    #[test]
    fn test_build_roots_in_input_order() {
        let boards = vec![board(5, "e"), child(6, 5, "f"), board(1, "a")];
        let index = BoardIndex::build(boards);
        let roots: Vec<_> = index.roots().iter().map(|b| b.id.clone()).collect();
        assert_eq!(roots, ids(&[5, 1]));
    }

    #[test]
    fn test_build_key_sets_match() {
        let index = BoardIndex::build(three_level());
        let mut a: Vec<_> = index.ids().cloned().collect();
        let mut b: Vec<_> = index.ex_ids().cloned().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(index.raw().len(), 3);
    }

    #[test]
    fn test_build_missing_parent_ends_chain() {
        let index = BoardIndex::build(vec![child(2, 1, "orphan"), child(3, 2, "leaf")]);
        assert_eq!(index.chain(&"3".into()), ids(&[3, 2]));
        assert_eq!(index.chain(&"2".into()), ids(&[2]));
    }

    #[test]
    fn test_build_cycle_terminates() {
        let index = BoardIndex::build(vec![child(1, 2, "a"), child(2, 1, "b")]);
        assert_eq!(index.chain(&"1".into()), ids(&[1, 2]));
        assert_eq!(index.chain(&"2".into()), ids(&[2, 1]));
    }

    #[test]
    fn test_build_duplicate_id_keeps_last() {
        let index = BoardIndex::build(vec![board(1, "first"), board(1, "second")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.info(&"1".into()).unwrap().name, "second");
        assert_eq!(index.roots().len(), 1);
    }

    #[test]
    fn test_walk_chain_empty_index() {
        let index = BoardIndex::default();
        assert_eq!(index.walk_chain(&"7".into()).unwrap(), ids(&[7]));
        assert!(index.walk_chain(&BoardId::from("")).unwrap().is_empty());
    }

    #[test]
    fn test_walk_chain_missing_parent_errors() {
        let index = BoardIndex::build(vec![board(1, "root"), child(3, 2, "leaf")]);
        let err = index.walk_chain(&"3".into()).unwrap_err();
        assert!(matches!(
            err,
            Error::AncestorCycleOrMissingNode { ref board, depth: 1 } if board.as_str() == "2"
        ));
    }

    #[test]
    fn test_walk_chain_unknown_start_errors() {
        let index = BoardIndex::build(three_level());
        assert!(matches!(
            index.walk_chain(&"42".into()),
            Err(Error::AncestorCycleOrMissingNode { depth: 0, .. })
        ));
    }

    #[test]
    fn test_walk_chain_cycle_errors() {
        let index = BoardIndex::build(vec![child(1, 3, "a"), child(2, 1, "b"), child(3, 2, "c")]);
        assert!(matches!(
            index.walk_chain(&"1".into()),
            Err(Error::AncestorCycleOrMissingNode { .. })
        ));
    }

    #[test]
    fn test_walk_chain_self_parent_errors() {
        let index = BoardIndex::build(vec![child(1, 1, "self")]);
        assert!(index.walk_chain(&"1".into()).is_err());
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once() {
        let api = MockBoardApi::new(three_level());
        let cache = BoardCache::new(api.clone());

        assert!(!cache.is_loaded());
        assert!(cache.ensure_loaded(false).await.unwrap());
        assert!(!cache.ensure_loaded(false).await.unwrap());
        assert_eq!(api.calls(), 1);
        assert_eq!(api.last_order().as_deref(), Some("parent_id.desc,weight.desc,time.asc"));

        assert_eq!(cache.chain_for(&"3".into(), false).unwrap(), ids(&[3, 2, 1]));
        assert_eq!(cache.chain_for(&"1".into(), false).unwrap(), ids(&[1]));
    }

    #[tokio::test]
    async fn test_force_refresh_fetches_again() {
        let api = MockBoardApi::new(three_level());
        let cache = BoardCache::new(api.clone());
        cache.ensure_loaded(false).await.unwrap();
        assert!(cache.ensure_loaded(true).await.unwrap());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_first_load_stays_unloaded() {
        let api = MockBoardApi::failing(ApiError::new(500));
        let cache = BoardCache::new(api.clone());

        let err = cache.ensure_loaded(false).await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError { code: 500, .. })));
        assert!(!cache.is_loaded());
        assert!(cache.chain_for(&"1".into(), false).unwrap().is_empty());
        assert!(cache.info_for(&"1".into()).is_none());

        // Next call tries again
        api.set_response(Ok(three_level()));
        assert!(cache.ensure_loaded(false).await.unwrap());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_index() {
        let api = MockBoardApi::new(three_level());
        let cache = BoardCache::new(api.clone());
        cache.ensure_loaded(false).await.unwrap();

        api.set_response(Err(ApiError::new(503)));
        assert!(cache.ensure_loaded(true).await.is_err());
        assert!(cache.is_loaded());
        assert_eq!(cache.info_for(&"3".into()).unwrap().name, "leaf");
    }

    #[tokio::test]
    async fn test_refresh_evicts_removed_boards() {
        let api = MockBoardApi::new(three_level());
        let cache = BoardCache::new(api.clone());
        cache.ensure_loaded(false).await.unwrap();
        let before = cache.snapshot().unwrap();

        api.set_response(Ok(vec![board(1, "root"), child(2, 1, "mid")]));
        cache.ensure_loaded(true).await.unwrap();

        assert!(cache.info_for(&"3".into()).is_none());
        assert!(cache.ex_info_for(&"3".into()).is_none());
        assert!(cache.ex_info_for(&"2".into()).unwrap().subboards.is_empty());
        // Snapshots taken earlier are unaffected by the swap
        assert!(before.info(&"3".into()).is_some());
    }

    #[tokio::test]
    async fn test_forced_chain_walk_over_loaded_boards() {
        let api = MockBoardApi::new(three_level());
        let cache = BoardCache::new(api);
        cache.ensure_loaded(false).await.unwrap();
        assert_eq!(cache.chain_for(&"3".into(), true).unwrap(), ids(&[3, 2, 1]));
        assert!(cache.chain_for(&"42".into(), true).is_err());
    }

    #[test]
    fn test_forced_chain_before_load() {
        let cache = BoardCache::new(MockBoardApi::new(Vec::new()));
        assert_eq!(cache.chain_for(&"5".into(), true).unwrap(), ids(&[5]));
        assert!(cache.chain_for(&"5".into(), false).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ex_info_colors() {
        let api = MockBoardApi::new(vec![board(1, "root").with_color("00ff00"), board(2, "plain")]);
        let cache = BoardCache::new(api);
        cache.ensure_loaded(false).await.unwrap();

        let ex = cache.ex_info_for(&"1".into()).unwrap();
        assert_eq!(ex.color, "rgb(0, 255, 0)");
        assert_ne!(ex.color_hover, ex.color);

        let ex = cache.ex_info_for(&"2".into()).unwrap();
        assert_eq!(ex.color, board_color::name_color("plain"));

        let style = cache.line_style_by_id(&"1".into(), None);
        assert_eq!(style["border-left-color"], "rgb(0, 255, 0)");
        assert!(cache.line_style_by_id(&"9".into(), None).is_empty());
    }
}
