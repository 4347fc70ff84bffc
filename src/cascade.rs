//! Dependent selection cascade.
//!
//! A chain of pick lists where choosing a value at level `n` loads the options of
//! level `n + 1` and wipes everything below `n`. The controller itself never does
//! I/O: `select_at` hands back a [`FetchRequest`] and the caller feeds the result
//! into [`Cascade::apply`] together with the request's [`FetchTicket`].
//!
//! Every invalidation of a level bumps that level's generation, so a result whose
//! ticket no longer matches is dropped. The last selection wins, not the last
//! response. Tickets also carry the id of the cascade that issued them, so a
//! rebuilt cascade (a reopened form, a new session) never accepts results meant
//! for its predecessor.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    /// Option whose value and label are the same text (countries, states, districts).
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { value: text.clone(), label: text }
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    cascade: u64,
    level: usize,
    generation: u64,
}

impl FetchTicket {
    pub fn level(&self) -> usize {
        self.level
    }
}

/// Work order for the option fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest<K> {
    pub key: K,
    pub ticket: FetchTicket,
    /// Value selected one level up, `None` for the root level.
    pub parent_key: Option<String>,
    /// Every selection above the level being fetched, top first.
    pub lineage: Vec<(K, String)>,
}

/// Result of feeding a fetch outcome back into the cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<E> {
    Updated,
    Stale,
    Failed(E),
}

#[derive(Debug, Clone)]
pub struct CascadeLevel<K> {
    pub key: K,
    selected: Option<String>,
    options: Vec<SelectOption>,
    is_loading: bool,
    generation: u64,
}

impl<K> CascadeLevel<K> {
    fn new(key: K) -> Self {
        Self { key, selected: None, options: Vec::new(), is_loading: false, generation: 0 }
    }

    fn invalidate(&mut self) {
        self.selected = None;
        self.options.clear();
        self.is_loading = false;
        self.generation += 1;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

#[derive(Debug, Clone)]
pub struct Cascade<K> {
    id: u64,
    levels: Vec<CascadeLevel<K>>,
}

static NEXT_CASCADE_ID: AtomicU64 = AtomicU64::new(1);

impl<K: Copy + fmt::Debug> Cascade<K> {
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            id: NEXT_CASCADE_ID.fetch_add(1, Ordering::Relaxed),
            levels: keys.into_iter().map(CascadeLevel::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[CascadeLevel<K>] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&CascadeLevel<K>> {
        self.levels.get(index)
    }

    pub fn selected(&self, index: usize) -> Option<&str> {
        self.levels.get(index).and_then(|l| l.selected())
    }

    /// Selected entry of `index` as an option, for pick lists.
    pub fn selected_option(&self, index: usize) -> Option<SelectOption> {
        let level = self.levels.get(index)?;
        let value = level.selected.as_deref()?;
        level
            .options
            .iter()
            .find(|o| o.value == value)
            .cloned()
            .or_else(|| Some(SelectOption::plain(value)))
    }

    pub fn options(&self, index: usize) -> &[SelectOption] {
        self.levels.get(index).map(|l| l.options()).unwrap_or(&[])
    }

    pub fn is_loading(&self, index: usize) -> bool {
        self.levels.get(index).is_some_and(|l| l.is_loading)
    }

    /// True when levels `0..depth` all hold a selection.
    pub fn is_complete(&self, depth: usize) -> bool {
        depth <= self.levels.len() && self.levels[..depth].iter().all(|l| l.selected.is_some())
    }

    /// Selections above `index`, top first. Stops at the first gap.
    pub fn lineage(&self, index: usize) -> Vec<(K, String)> {
        self.levels
            .iter()
            .take(index)
            .map_while(|l| l.selected.clone().map(|v| (l.key, v)))
            .collect()
    }

    fn request_for(&mut self, index: usize) -> FetchRequest<K> {
        let lineage = self.lineage(index);
        let level = &mut self.levels[index];
        level.is_loading = true;
        FetchRequest {
            key: level.key,
            ticket: FetchTicket { cascade: self.id, level: index, generation: level.generation },
            parent_key: lineage.last().map(|(_, v)| v.clone()),
            lineage,
        }
    }

    /// Starts loading the options of the first level.
    pub fn load_root(&mut self) -> Option<FetchRequest<K>> {
        let root = self.levels.first_mut()?;
        root.generation += 1;
        Some(self.request_for(0))
    }

    /// Sets the selection at `index` (empty string clears it), invalidates every
    /// deeper level and returns the fetch for the next level, if one is needed.
    pub fn select_at(&mut self, index: usize, value: &str) -> Option<FetchRequest<K>> {
        if index >= self.levels.len() {
            warn!("Cascade selection at level {} is out of range ({} levels)", index, self.levels.len());
            return None;
        }
        let value = value.trim();
        let new_selection = (!value.is_empty()).then(|| value.to_string());

        if self.levels[index].selected == new_selection {
            return None;
        }
        if index > 0 && new_selection.is_some() && self.levels[index - 1].selected.is_none() {
            warn!("Ignoring selection at level {}: parent level has no selection", index);
            return None;
        }

        debug!("Cascade {:?} <- {:?}", self.levels[index].key, new_selection);
        self.levels[index].selected = new_selection;
        for level in self.levels.iter_mut().skip(index + 1) {
            level.invalidate();
        }

        match self.levels[index].selected {
            Some(_) if index + 1 < self.levels.len() => Some(self.request_for(index + 1)),
            _ => None,
        }
    }

    /// Stores a known selection without fetching anything; deeper levels are cleared.
    /// Used to pin the top of a cascade (for example the signed-in admin's organization).
    pub fn preset(&mut self, index: usize, option: SelectOption) {
        let Some(level) = self.levels.get_mut(index) else {
            return;
        };
        level.generation += 1;
        level.is_loading = false;
        level.selected = Some(option.value.clone());
        level.options = vec![option];
        for level in self.levels.iter_mut().skip(index + 1) {
            level.invalidate();
        }
    }

    /// Re-fetches the options of `index` for the current lineage. The selection at
    /// `index` survives if the refreshed list still contains it.
    pub fn refresh(&mut self, index: usize) -> Option<FetchRequest<K>> {
        if index >= self.levels.len() || (index > 0 && self.levels[index - 1].selected.is_none()) {
            return None;
        }
        self.levels[index].generation += 1;
        Some(self.request_for(index))
    }

    /// Clears every selection and every option list except the root options.
    pub fn reset(&mut self) {
        for (i, level) in self.levels.iter_mut().enumerate() {
            if i == 0 {
                level.selected = None;
            } else {
                level.invalidate();
            }
        }
    }

    /// Applies the outcome of a fetch. Results for superseded tickets are dropped.
    pub fn apply<E>(&mut self, ticket: FetchTicket, result: Result<Vec<SelectOption>, E>) -> Applied<E> {
        if ticket.cascade != self.id {
            debug!("Dropping options issued by another cascade (ticket {:?})", ticket);
            return Applied::Stale;
        }
        let Some(level) = self.levels.get_mut(ticket.level) else {
            return Applied::Stale;
        };
        if level.generation != ticket.generation || !level.is_loading {
            debug!("Dropping stale options for {:?} (ticket {:?})", level.key, ticket);
            return Applied::Stale;
        }
        level.is_loading = false;
        match result {
            Ok(options) => {
                let keeps_selection = level
                    .selected
                    .as_ref()
                    .is_none_or(|selected| options.iter().any(|o| &o.value == selected));
                level.options = options;
                if !keeps_selection {
                    level.selected = None;
                    for deeper in self.levels.iter_mut().skip(ticket.level + 1) {
                        deeper.invalidate();
                    }
                }
                Applied::Updated
            }
            Err(err) => {
                level.options.clear();
                Applied::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Loc {
        Country,
        State,
        District,
        Organization,
    }

    fn location_cascade() -> Cascade<Loc> {
        Cascade::new([Loc::Country, Loc::State, Loc::District, Loc::Organization])
    }

    fn opts(values: &[&str]) -> Vec<SelectOption> {
        values.iter().map(|v| SelectOption::plain(*v)).collect()
    }

    fn assert_invariant<K: Copy + fmt::Debug>(cascade: &Cascade<K>) {
        for i in 0..cascade.len() {
            if cascade.selected(i).is_none() {
                for j in i + 1..cascade.len() {
                    assert!(cascade.selected(j).is_none(), "level {} selected under empty level {}", j, i);
                    assert!(cascade.options(j).is_empty(), "level {} has options under empty level {}", j, i);
                }
            }
        }
    }

    /// In-memory stand-in for the REST lookups, keyed by lineage.
    struct FakeDirectory {
        answers: HashMap<Vec<String>, Vec<SelectOption>>,
        calls: Vec<Vec<String>>,
    }

    impl FakeDirectory {
        fn india() -> Self {
            let mut answers = HashMap::new();
            let key = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();
            answers.insert(key(&[]), opts(&["India", "Nepal"]));
            answers.insert(key(&["India"]), opts(&["Karnataka", "Kerala", "Tamil Nadu"]));
            answers.insert(key(&["Nepal"]), opts(&["Bagmati", "Gandaki"]));
            answers.insert(key(&["India", "Karnataka"]), opts(&["Bangalore", "Mysore"]));
            answers.insert(key(&["India", "Kerala"]), opts(&["Kochi"]));
            answers.insert(
                key(&["India", "Karnataka", "Bangalore"]),
                vec![
                    SelectOption::new("org-1", "Greenwood High"),
                    SelectOption::new("org-2", "Lakeside Public School"),
                ],
            );
            answers.insert(key(&["India", "Karnataka", "Mysore"]), vec![SelectOption::new("org-9", "Palace School")]);
            Self { answers, calls: Vec::new() }
        }

        async fn fetch(&mut self, request: &FetchRequest<Loc>) -> Result<Vec<SelectOption>, String> {
            let path: Vec<String> = request.lineage.iter().map(|(_, v)| v.clone()).collect();
            self.calls.push(path.clone());
            tokio::task::yield_now().await;
            self.answers.get(&path).cloned().ok_or_else(|| format!("no data for {:?}", path))
        }

        async fn drive(&mut self, cascade: &mut Cascade<Loc>, request: Option<FetchRequest<Loc>>) {
            if let Some(request) = request {
                let result = self.fetch(&request).await;
                cascade.apply(request.ticket, result);
            }
        }
    }

    #[test]
    fn selecting_clears_deeper_levels_and_requests_next() {
        let mut cascade = location_cascade();
        let root = cascade.load_root().unwrap();
        cascade.apply::<String>(root.ticket, Ok(opts(&["India"])));

        let req = cascade.select_at(0, "India").unwrap();
        assert_eq!(req.key, Loc::State);
        assert_eq!(req.parent_key.as_deref(), Some("India"));
        assert!(cascade.is_loading(1));
        cascade.apply::<String>(req.ticket, Ok(opts(&["Karnataka"])));

        let req = cascade.select_at(1, "Karnataka").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Bangalore"])));
        cascade.select_at(2, "Bangalore");

        assert!(cascade.select_at(0, "").is_none());
        assert_eq!(cascade.selected(0), None);
        assert_invariant(&cascade);
        assert_eq!(cascade.options(0).len(), 1);
    }

    #[test]
    fn older_fetch_resolving_late_is_discarded() {
        let mut cascade = location_cascade();
        let f1 = cascade.select_at(0, "India").unwrap();
        let f2 = cascade.select_at(0, "Nepal").unwrap();

        assert_eq!(cascade.apply::<String>(f2.ticket, Ok(opts(&["Bagmati", "Gandaki"]))), Applied::Updated);
        assert_eq!(cascade.apply::<String>(f1.ticket, Ok(opts(&["Karnataka"]))), Applied::Stale);
        assert_eq!(cascade.options(1), opts(&["Bagmati", "Gandaki"]).as_slice());
        assert!(!cascade.is_loading(1));
    }

    #[test]
    fn stale_result_cannot_land_after_parent_was_cleared() {
        let mut cascade = location_cascade();
        let f1 = cascade.select_at(0, "India").unwrap();
        cascade.select_at(0, "");
        assert_eq!(cascade.apply::<String>(f1.ticket, Ok(opts(&["Karnataka"]))), Applied::Stale);
        assert!(cascade.options(1).is_empty());
        assert_invariant(&cascade);
    }

    #[test]
    fn deeper_in_flight_fetch_is_dropped_when_ancestor_changes() {
        let mut cascade = location_cascade();
        let req = cascade.select_at(0, "India").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Karnataka", "Kerala"])));
        let districts = cascade.select_at(1, "Karnataka").unwrap();
        let states = cascade.select_at(0, "Nepal").unwrap();

        assert_eq!(cascade.apply::<String>(districts.ticket, Ok(opts(&["Bangalore"]))), Applied::Stale);
        assert!(cascade.options(2).is_empty());
        assert_eq!(cascade.apply::<String>(states.ticket, Ok(opts(&["Bagmati"]))), Applied::Updated);
    }

    #[test]
    fn reselecting_same_value_is_a_no_op() {
        let mut cascade = location_cascade();
        let req = cascade.select_at(0, "India").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Karnataka"])));
        let req = cascade.select_at(1, "Karnataka").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Bangalore", "Mysore"])));

        assert!(cascade.select_at(0, "India").is_none());
        assert_eq!(cascade.selected(1), Some("Karnataka"));
        assert_eq!(cascade.options(2).len(), 2);
        assert!(cascade.select_at(1, " Karnataka ").is_none());
    }

    #[test]
    fn failed_fetch_leaves_empty_options_and_keeps_parent() {
        let mut cascade = location_cascade();
        let req = cascade.select_at(0, "India").unwrap();
        let outcome = cascade.apply(req.ticket, Err("timeout".to_string()));
        assert_eq!(outcome, Applied::Failed("timeout".to_string()));
        assert_eq!(cascade.selected(0), Some("India"));
        assert!(cascade.options(1).is_empty());
        assert!(!cascade.is_loading(1));
    }

    #[test]
    fn selection_under_empty_parent_is_rejected() {
        let mut cascade = location_cascade();
        assert!(cascade.select_at(2, "Bangalore").is_none());
        assert_eq!(cascade.selected(2), None);
        assert!(cascade.select_at(9, "x").is_none());
    }

    #[test]
    fn refresh_keeps_selection_that_still_exists() {
        let mut cascade = location_cascade();
        let req = cascade.select_at(0, "India").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Karnataka"])));
        let req = cascade.select_at(1, "Karnataka").unwrap();
        cascade.apply::<String>(req.ticket, Ok(opts(&["Bangalore"])));

        let refresh = cascade.refresh(1).unwrap();
        assert_eq!(refresh.lineage, vec![(Loc::Country, "India".to_string())]);
        cascade.apply::<String>(refresh.ticket, Ok(opts(&["Karnataka", "Goa"])));
        assert_eq!(cascade.selected(1), Some("Karnataka"));
        assert_eq!(cascade.options(2).len(), 1);

        let refresh = cascade.refresh(1).unwrap();
        cascade.apply::<String>(refresh.ticket, Ok(opts(&["Goa"])));
        assert_eq!(cascade.selected(1), None);
        assert!(cascade.options(2).is_empty());
        assert_invariant(&cascade);
    }

    #[test]
    fn rebuilt_cascade_rejects_tickets_of_its_predecessor() {
        let mut old = location_cascade();
        let old_req = old.select_at(0, "India").unwrap();

        let mut cascade = location_cascade();
        let req = cascade.select_at(0, "Nepal").unwrap();
        assert_eq!(old_req.ticket.level(), req.ticket.level());

        assert_eq!(cascade.apply::<String>(old_req.ticket, Ok(opts(&["Karnataka"]))), Applied::Stale);
        assert!(cascade.is_loading(1));
        assert_eq!(cascade.apply::<String>(req.ticket, Ok(opts(&["Bagmati"]))), Applied::Updated);
        assert_eq!(cascade.options(1), opts(&["Bagmati"]).as_slice());
    }

    #[test]
    fn preset_pins_a_level_without_fetching() {
        let mut cascade = Cascade::new([Loc::Organization, Loc::Country]);
        cascade.preset(0, SelectOption::new("org-1", "Greenwood High"));
        assert_eq!(cascade.selected(0), Some("org-1"));
        assert_eq!(cascade.selected_option(0).unwrap().label, "Greenwood High");
        assert!(!cascade.is_loading(0));
    }

    #[tokio::test]
    async fn india_to_bangalore_loads_only_matching_organizations() {
        let mut directory = FakeDirectory::india();
        let mut cascade = location_cascade();

        let root = cascade.load_root();
        directory.drive(&mut cascade, root).await;
        let req = cascade.select_at(0, "Nepal");
        directory.drive(&mut cascade, req).await;
        let req = cascade.select_at(1, "Bagmati");
        directory.drive(&mut cascade, req).await;

        let req = cascade.select_at(0, "India");
        assert_eq!(cascade.selected(1), None);
        assert_eq!(cascade.selected(2), None);
        assert_eq!(cascade.selected(3), None);
        directory.drive(&mut cascade, req).await;
        assert_eq!(cascade.options(1), opts(&["Karnataka", "Kerala", "Tamil Nadu"]).as_slice());

        let req = cascade.select_at(1, "Karnataka");
        directory.drive(&mut cascade, req).await;
        let req = cascade.select_at(2, "Bangalore");
        directory.drive(&mut cascade, req).await;

        let labels: Vec<&str> = cascade.options(3).iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Greenwood High", "Lakeside Public School"]);
        assert_eq!(
            directory.calls.last().unwrap(),
            &vec!["India".to_string(), "Karnataka".to_string(), "Bangalore".to_string()]
        );
        assert_invariant(&cascade);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(usize, u8),
        Clear(usize),
        Resolve(usize, bool),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4, 0u8..3).prop_map(|(l, v)| Op::Select(l, v)),
            (0usize..4).prop_map(Op::Clear),
            (0usize..8, any::<bool>()).prop_map(|(i, ok)| Op::Resolve(i, ok)),
        ]
    }

    proptest! {
        #[test]
        fn invariant_survives_any_interleaving(ops in proptest::collection::vec(op_strategy(), 1..60)) {
            let mut cascade = location_cascade();
            let mut pending: Vec<FetchRequest<Loc>> = Vec::new();
            for op in ops {
                match op {
                    Op::Select(level, v) => {
                        if let Some(req) = cascade.select_at(level, &format!("v{}", v)) {
                            pending.push(req);
                        }
                    }
                    Op::Clear(level) => {
                        cascade.select_at(level, "");
                    }
                    Op::Resolve(i, ok) => {
                        if !pending.is_empty() {
                            let req = pending.remove(i % pending.len());
                            let result = if ok { Ok(opts(&["v0", "v1", "v2"])) } else { Err(()) };
                            cascade.apply(req.ticket, result);
                        }
                    }
                }
                assert_invariant(&cascade);
            }
        }
    }
}
