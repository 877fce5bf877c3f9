//! Dashboard header: title, server count, active filters and sort order

use blockspy_app::server_list::{ServerListState, SortDirection, SortKey};
use blockspy_core::i18n::Translations;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{styles, Palette};

pub struct DashboardHeader<'a> {
    list: &'a ServerListState,
    t: &'a Translations,
    palette: &'a Palette,
    search_active: bool,
}

impl<'a> DashboardHeader<'a> {
    pub fn new(list: &'a ServerListState, t: &'a Translations, palette: &'a Palette) -> Self {
        Self {
            list,
            t,
            palette,
            search_active: false,
        }
    }

    pub fn search_active(mut self, active: bool) -> Self {
        self.search_active = active;
        self
    }

    fn sort_label(&self) -> String {
        let key = match self.list.sort.key {
            SortKey::Name => self.t.get("sort.name", "Name"),
            SortKey::Address => self.t.get("sort.address", "Address"),
            SortKey::Players => self.t.get("sort.players", "Players"),
            SortKey::Ping => self.t.get("sort.ping", "Ping"),
        };
        let arrow = match self.list.sort.direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        };
        format!("{} {}", key, arrow)
    }

    fn filter_span(&self, label: &str, value: &str) -> Vec<Span<'static>> {
        let p = self.palette;
        let shown = if value.is_empty() {
            Span::styled(self.t.get("filter.all", "all").to_string(), styles::text_muted(p))
        } else {
            Span::styled(value.to_string(), styles::accent(p))
        };
        vec![
            Span::styled(format!("{}: ", label), styles::text_secondary(p)),
            shown,
            Span::raw("  "),
        ]
    }
}

impl Widget for DashboardHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let block = styles::glass_block(p, false);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let count = self.t.format(
            "header.count",
            "{visible} / {total} servers",
            &[
                ("visible", &self.list.visible().len().to_string()),
                ("total", &self.list.all().len().to_string()),
            ],
        );
        let title = Line::from(vec![
            Span::styled("BlockSpy", styles::text_bright_bold(p)),
            Span::raw("  "),
            Span::styled(count, styles::text_secondary(p)),
        ]);

        let filters = &self.list.filters;
        let mut spans = Vec::new();
        let search_label = self.t.get("filter.search", "Search").to_string();
        if self.search_active {
            spans.push(Span::styled(format!("{}: ", search_label), styles::keybinding(p)));
            spans.push(Span::styled(format!("{}█", filters.search), styles::text_primary(p)));
            spans.push(Span::raw("  "));
        } else {
            spans.extend(self.filter_span(&search_label, &filters.search));
        }
        spans.extend(self.filter_span(self.t.get("filter.type", "Type"), &filters.server_type));
        spans.extend(self.filter_span(self.t.get("filter.flavor", "Flavor"), &filters.flavor));
        spans.extend(self.filter_span(
            self.t.get("filter.version", "Version"),
            &filters.base_version,
        ));
        spans.push(Span::styled(
            format!("{}: ", self.t.get("filter.sort", "Sort")),
            styles::text_secondary(p),
        ));
        spans.push(Span::styled(self.sort_label(), styles::accent(p)));

        Paragraph::new(vec![title, Line::from(spans)]).render(inner, buf);
    }
}
