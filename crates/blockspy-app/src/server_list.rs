//! Server list pipeline: filter, sort, and viewport state
//!
//! The full collection from the last poll is kept as-is and replaced wholesale
//! on every fetch. The visible list is recomputed from it, so running the
//! pipeline twice over the same input yields the same order.

use std::cmp::Ordering;
use std::collections::HashMap;

use blockspy_core::types::ServerSummary;
use blockspy_core::version::parse_version;

// ─────────────────────────────────────────────────────────────────────────────
// Filters and sorting
// ─────────────────────────────────────────────────────────────────────────────

/// Filter values; an empty string means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub server_type: String,
    pub flavor: String,
    pub base_version: String,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.server_type.is_empty()
            && self.flavor.is_empty()
            && self.base_version.is_empty()
    }

    /// Every active filter matches `server`.
    pub fn matches(&self, server: &ServerSummary) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let name = server
                .custom_name
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(server.advertised_name.as_deref())
                .unwrap_or("")
                .to_lowercase();
            if !name.contains(&needle) && !server.ip.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if !self.server_type.is_empty()
            && server.server_type.as_deref() != Some(self.server_type.as_str())
        {
            return false;
        }

        if !self.flavor.is_empty() || !self.base_version.is_empty() {
            let parsed = parse_version(server.version.as_deref());
            if !self.flavor.is_empty() && parsed.flavor.as_deref() != Some(self.flavor.as_str()) {
                return false;
            }
            if !self.base_version.is_empty()
                && parsed.base_version.as_deref() != Some(self.base_version.as_str())
            {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Advertised name, as the backend reports it
    #[default]
    Name,
    Address,
    Players,
    Ping,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Name, SortKey::Address, SortKey::Players, SortKey::Ping];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SortKey::Players | SortKey::Ping)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

fn numeric_key(server: &ServerSummary, key: SortKey) -> f64 {
    match key {
        SortKey::Players => server.players_online.map(|v| v as f64),
        SortKey::Ping => server.ping,
        _ => None,
    }
    .unwrap_or(-1.0)
}

fn string_key(server: &ServerSummary, key: SortKey) -> String {
    match key {
        SortKey::Name => server.advertised_name.as_deref().unwrap_or(""),
        _ => server.ip.as_str(),
    }
    .to_lowercase()
}

fn compare(a: &ServerSummary, b: &ServerSummary, key: SortKey) -> Ordering {
    if key.is_numeric() {
        numeric_key(a, key)
            .partial_cmp(&numeric_key(b, key))
            .unwrap_or(Ordering::Equal)
    } else {
        string_key(a, key).cmp(&string_key(b, key))
    }
}

/// Filter `servers` with `filters` (AND-combined) and order the result.
///
/// Missing numbers sort as -1 and missing strings as `""`.
pub fn apply_filter_and_sort(
    servers: &[ServerSummary],
    filters: &Filters,
    sort: SortSpec,
) -> Vec<ServerSummary> {
    let mut out: Vec<ServerSummary> = servers
        .iter()
        .filter(|s| filters.matches(s))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        let ord = compare(a, b, sort.key);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter options
// ─────────────────────────────────────────────────────────────────────────────

/// Values offered by the type, flavor and base-version filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub flavors: Vec<String>,
    /// Newest first
    pub base_versions: Vec<String>,
}

impl FilterOptions {
    /// Derive the option sets from the full, unfiltered collection.
    pub fn from_servers(servers: &[ServerSummary]) -> Self {
        let mut types = Vec::new();
        let mut flavors = Vec::new();
        let mut base_versions = Vec::new();

        for server in servers {
            if let Some(kind) = server.server_type.as_deref().filter(|s| !s.is_empty()) {
                types.push(kind.to_string());
            }
            let parsed = parse_version(server.version.as_deref());
            if let Some(flavor) = parsed.flavor {
                flavors.push(flavor);
            }
            if let Some(base) = parsed.base_version {
                base_versions.push(base);
            }
        }

        for list in [&mut types, &mut flavors, &mut base_versions] {
            list.sort();
            list.dedup();
        }
        base_versions.reverse();

        Self {
            types,
            flavors,
            base_versions,
        }
    }

    /// Clear any selected value that is no longer offered.
    pub fn retain_selection(&self, filters: &mut Filters) {
        if !self.types.contains(&filters.server_type) {
            filters.server_type.clear();
        }
        if !self.flavors.contains(&filters.flavor) {
            filters.flavor.clear();
        }
        if !self.base_versions.contains(&filters.base_version) {
            filters.base_version.clear();
        }
    }
}

/// Next value after `current` in `"" + options`, wrapping back to "all".
pub fn cycle_option(current: &str, options: &[String]) -> String {
    if current.is_empty() {
        return options.first().cloned().unwrap_or_default();
    }
    match options.iter().position(|o| o == current) {
        Some(idx) => options.get(idx + 1).cloned().unwrap_or_default(),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ServerListState
// ─────────────────────────────────────────────────────────────────────────────

/// Icon state of one server row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconState {
    #[default]
    Placeholder,
    Loading,
    Loaded,
}

#[derive(Debug, Default)]
pub struct ServerListState {
    all: Vec<ServerSummary>,
    visible: Vec<ServerSummary>,
    pub filters: Filters,
    pub sort: SortSpec,
    pub options: FilterOptions,

    /// Index into the visible list
    pub selected: usize,
    /// First visible row
    pub offset: usize,
    /// Rows that fit on screen (set during render)
    pub viewport_rows: usize,

    /// At least one fetch has completed
    pub loaded: bool,
    pub fetch_in_flight: bool,
    /// Last background fetch error, cleared on success
    pub last_error: Option<String>,

    icons: HashMap<String, IconState>,
}

impl ServerListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh poll result.
    pub fn replace_all(&mut self, servers: Vec<ServerSummary>) {
        self.all = servers;
        self.loaded = true;
        self.last_error = None;
        if !self.all.is_empty() {
            self.options = FilterOptions::from_servers(&self.all);
            self.options.retain_selection(&mut self.filters);
        }
        self.refresh();
    }

    pub fn all(&self) -> &[ServerSummary] {
        &self.all
    }

    pub fn visible(&self) -> &[ServerSummary] {
        &self.visible
    }

    pub fn find(&self, ip: &str) -> Option<&ServerSummary> {
        self.all.iter().find(|s| s.ip == ip)
    }

    /// Re-run the pipeline, keeping the scroll offset and the selected server.
    pub fn refresh(&mut self) {
        let selected_ip = self.selected_server().map(|s| s.ip.clone());
        let offset = self.offset;

        self.visible = apply_filter_and_sort(&self.all, &self.filters, self.sort);

        self.selected = selected_ip
            .and_then(|ip| self.visible.iter().position(|s| s.ip == ip))
            .unwrap_or_else(|| self.selected.min(self.visible.len().saturating_sub(1)));
        self.offset = offset.min(self.visible.len().saturating_sub(1));
    }

    pub fn set_search(&mut self, search: String) {
        self.filters.search = search;
        self.refresh();
    }

    pub fn cycle_type_filter(&mut self) {
        self.filters.server_type = cycle_option(&self.filters.server_type, &self.options.types);
        self.refresh();
    }

    pub fn cycle_flavor_filter(&mut self) {
        self.filters.flavor = cycle_option(&self.filters.flavor, &self.options.flavors);
        self.refresh();
    }

    pub fn cycle_base_version_filter(&mut self) {
        self.filters.base_version =
            cycle_option(&self.filters.base_version, &self.options.base_versions);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.refresh();
    }

    pub fn cycle_sort_key(&mut self) {
        self.sort.key = self.sort.key.next();
        self.refresh();
    }

    pub fn flip_sort_direction(&mut self) {
        self.sort.direction = self.sort.direction.flipped();
        self.refresh();
    }

    pub fn selected_server(&self) -> Option<&ServerSummary> {
        self.visible.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
        self.ensure_selected_visible();
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selected_visible();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.ensure_selected_visible();
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
        self.ensure_selected_visible();
    }

    pub fn page_down(&mut self) {
        let step = self.viewport_rows.max(1);
        self.selected = (self.selected + step).min(self.visible.len().saturating_sub(1));
        self.ensure_selected_visible();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.viewport_rows.max(1));
        self.ensure_selected_visible();
    }

    /// Scroll just enough to bring the selection on screen.
    pub fn ensure_selected_visible(&mut self) {
        if self.viewport_rows == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.viewport_rows {
            self.offset = self.selected + 1 - self.viewport_rows;
        }
    }

    /// Rows currently inside the viewport.
    pub fn window(&self) -> &[ServerSummary] {
        let start = self.offset.min(self.visible.len());
        let end = (start + self.viewport_rows).min(self.visible.len());
        &self.visible[start..end]
    }

    pub fn icon_state(&self, ip: &str) -> IconState {
        self.icons.get(ip).copied().unwrap_or_default()
    }

    /// Servers in the viewport whose icon was never requested.
    ///
    /// They are marked as loading, so each one is requested once.
    pub fn take_icons_to_load(&mut self) -> Vec<String> {
        let pending: Vec<String> = self
            .window()
            .iter()
            .filter(|s| s.has_custom_icon && !self.icons.contains_key(&s.ip))
            .map(|s| s.ip.clone())
            .collect();
        for ip in &pending {
            self.icons.insert(ip.clone(), IconState::Loading);
        }
        pending
    }

    /// Record an icon load result; a failure leaves the placeholder.
    pub fn set_icon_loaded(&mut self, ip: &str, loaded: bool) {
        let state = if loaded {
            IconState::Loaded
        } else {
            IconState::Placeholder
        };
        self.icons.insert(ip.to_string(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(ip: &str, name: Option<&str>, players: Option<i64>, kind: Option<&str>) -> ServerSummary {
        let mut s = ServerSummary::new(ip);
        s.advertised_name = name.map(str::to_string);
        s.players_online = players;
        s.server_type = kind.map(str::to_string);
        s
    }

    fn ips(list: &[ServerSummary]) -> Vec<&str> {
        list.iter().map(|s| s.ip.as_str()).collect()
    }

    #[test]
    fn test_type_filter_is_exact() {
        let servers = vec![
            server("a", None, None, Some("Original")),
            server("b", None, None, Some("Pirata")),
            server("c", None, None, None),
        ];
        let filters = Filters {
            server_type: "Pirata".into(),
            ..Default::default()
        };
        let out = apply_filter_and_sort(&servers, &filters, SortSpec::default());
        assert_eq!(ips(&out), vec!["b"]);
    }

    #[test]
    fn test_filters_are_and_combined() {
        let mut paper = server("play.one", Some("Survival"), None, Some("Original"));
        paper.version = Some("Paper 1.20.4".into());
        let mut spigot = server("play.two", Some("Survival"), None, Some("Original"));
        spigot.version = Some("Spigot 1.20.4".into());
        let mut pirate = server("play.three", Some("Survival"), None, Some("Pirata"));
        pirate.version = Some("Paper 1.20.4".into());

        let filters = Filters {
            search: "surv".into(),
            server_type: "Original".into(),
            flavor: "Paper".into(),
            base_version: String::new(),
        };
        let out = apply_filter_and_sort(&[paper, spigot, pirate], &filters, SortSpec::default());
        assert_eq!(ips(&out), vec!["play.one"]);
    }

    #[test]
    fn test_search_matches_address_or_name() {
        let mut custom = server("10.0.0.1", Some("Advertised"), None, None);
        custom.custom_name = Some("Lobby".into());
        let servers = vec![custom, server("mc.example.net", None, None, None)];

        let by_name = Filters {
            search: "LOBBY".into(),
            ..Default::default()
        };
        assert_eq!(
            ips(&apply_filter_and_sort(&servers, &by_name, SortSpec::default())),
            vec!["10.0.0.1"]
        );

        // A custom name hides the advertised one from search
        let by_advertised = Filters {
            search: "advertised".into(),
            ..Default::default()
        };
        assert!(apply_filter_and_sort(&servers, &by_advertised, SortSpec::default()).is_empty());

        let by_ip = Filters {
            search: "example".into(),
            ..Default::default()
        };
        assert_eq!(
            ips(&apply_filter_and_sort(&servers, &by_ip, SortSpec::default())),
            vec!["mc.example.net"]
        );
    }

    #[test]
    fn test_numeric_sort_places_missing_first_ascending() {
        let servers = vec![
            server("a", None, Some(5), None),
            server("b", None, None, None),
            server("c", None, Some(0), None),
        ];
        let asc = SortSpec {
            key: SortKey::Players,
            direction: SortDirection::Asc,
        };
        assert_eq!(ips(&apply_filter_and_sort(&servers, &Filters::default(), asc)), vec!["b", "c", "a"]);

        let desc = SortSpec {
            key: SortKey::Players,
            direction: SortDirection::Desc,
        };
        assert_eq!(ips(&apply_filter_and_sort(&servers, &Filters::default(), desc)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_string_sort_is_case_insensitive() {
        let servers = vec![
            server("1", Some("beta"), None, None),
            server("2", None, None, None),
            server("3", Some("Alpha"), None, None),
        ];
        let out = apply_filter_and_sort(&servers, &Filters::default(), SortSpec::default());
        assert_eq!(ips(&out), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let servers = vec![
            server("x", Some("Zeta"), Some(3), Some("Original")),
            server("y", Some("eta"), None, Some("Pirata")),
            server("z", Some("Theta"), Some(9), None),
        ];
        let spec = SortSpec {
            key: SortKey::Ping,
            direction: SortDirection::Desc,
        };
        let first = apply_filter_and_sort(&servers, &Filters::default(), spec);
        let second = apply_filter_and_sort(&servers, &Filters::default(), spec);
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_options_ordering() {
        let versions = ["Paper 1.20.4", "1.8.9", "Velocity 3.3.0 (1.8.x-1.21)", "Paper 1.21"];
        let servers: Vec<ServerSummary> = versions
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut s = server(&i.to_string(), None, None, Some(if i % 2 == 0 { "Pirata" } else { "Original" }));
                s.version = Some(v.to_string());
                s
            })
            .collect();

        let options = FilterOptions::from_servers(&servers);
        assert_eq!(options.types, vec!["Original", "Pirata"]);
        assert_eq!(options.flavors, vec!["Paper", "Vanilla", "Velocity"]);
        assert_eq!(options.base_versions, vec!["3.3.0", "1.8.9", "1.21", "1.20.4"]);
    }

    #[test]
    fn test_selection_kept_only_if_still_offered() {
        let options = FilterOptions {
            types: vec!["Original".into()],
            flavors: vec!["Paper".into()],
            base_versions: vec![],
        };
        let mut filters = Filters {
            search: "keep".into(),
            server_type: "Original".into(),
            flavor: "Forge".into(),
            base_version: "1.20.4".into(),
        };
        options.retain_selection(&mut filters);
        assert_eq!(filters.search, "keep");
        assert_eq!(filters.server_type, "Original");
        assert!(filters.flavor.is_empty());
        assert!(filters.base_version.is_empty());
    }

    #[test]
    fn test_cycle_option_wraps_to_all() {
        let options = vec!["A".to_string(), "B".to_string()];
        assert_eq!(cycle_option("", &options), "A");
        assert_eq!(cycle_option("A", &options), "B");
        assert_eq!(cycle_option("B", &options), "");
        assert_eq!(cycle_option("gone", &options), "");
        assert_eq!(cycle_option("", &[]), "");
    }

    #[test]
    fn test_refresh_preserves_offset_and_selection() {
        let mut state = ServerListState::new();
        state.viewport_rows = 3;
        state.replace_all((0..10).map(|i| server(&format!("s{i}"), Some(&format!("n{i}")), None, None)).collect());
        for _ in 0..6 {
            state.select_next();
        }
        assert_eq!(state.selected, 6);
        assert_eq!(state.offset, 4);

        // Next poll returns the same servers in a different order
        let mut again: Vec<ServerSummary> = state.all().to_vec();
        again.reverse();
        state.replace_all(again);

        assert_eq!(state.offset, 4);
        assert_eq!(state.selected_server().map(|s| s.ip.as_str()), Some("s6"));
    }

    #[test]
    fn test_empty_poll_keeps_filter_options() {
        let mut state = ServerListState::new();
        state.replace_all(vec![server("a", None, None, Some("Original"))]);
        state.cycle_type_filter();
        assert_eq!(state.filters.server_type, "Original");

        state.replace_all(Vec::new());
        assert_eq!(state.options.types, vec!["Original"]);
        assert_eq!(state.filters.server_type, "Original");
        assert!(state.visible().is_empty());
    }

    #[test]
    fn test_icons_requested_once_for_visible_rows() {
        let mut state = ServerListState::new();
        state.viewport_rows = 2;
        let servers = (0..4)
            .map(|i| {
                let mut s = server(&format!("s{i}"), Some(&format!("n{i}")), None, None);
                s.has_custom_icon = i != 1;
                s
            })
            .collect();
        state.replace_all(servers);

        assert_eq!(state.take_icons_to_load(), vec!["s0"]);
        assert!(state.take_icons_to_load().is_empty());
        assert_eq!(state.icon_state("s0"), IconState::Loading);

        state.set_icon_loaded("s0", true);
        assert_eq!(state.icon_state("s0"), IconState::Loaded);

        state.select_last();
        assert_eq!(state.take_icons_to_load(), vec!["s2", "s3"]);
    }
}
