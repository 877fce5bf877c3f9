//! Modal dialogs drawn over a dimmed screen

use blockspy_app::details::LoadState;
use blockspy_app::dialogs::{
    AddMode, AddServersDialog, Alert, ConfirmKind, EditError, EditField, EditServerDialog, Modal,
    PlayerPopup, SettingsDialog, SettingsField, TextField, WatchlistPanel,
};
use blockspy_core::i18n::Translations;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use super::modal_overlay::{centered_rect, dim_background, render_shadow};
use super::text::truncate;
use crate::theme::{styles, Palette};

/// Add log lines kept visible in the add dialog.
const ADD_LOG_ROWS: usize = 8;

pub struct ModalView<'a> {
    modal: &'a Modal,
    t: &'a Translations,
    palette: &'a Palette,
}

/// Sections of a dialog: title, body lines, footer hint.
struct DialogContent {
    title: String,
    lines: Vec<Line<'static>>,
    hint: String,
    is_error: bool,
    width: u16,
}

impl<'a> ModalView<'a> {
    pub fn new(modal: &'a Modal, t: &'a Translations, palette: &'a Palette) -> Self {
        Self { modal, t, palette }
    }

    fn tr(&self, key: &str, default: &'a str) -> String {
        self.t.get(key, default).to_string()
    }

    fn input_line(&self, label: &str, field: &TextField, focused: bool, masked: bool) -> Line<'static> {
        let p = self.palette;
        let value = if masked {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let (label_style, value_style, cursor) = if focused {
            (styles::keybinding(p), styles::text_bright_bold(p), "█")
        } else {
            (styles::text_secondary(p), styles::text_primary(p), "")
        };
        Line::from(vec![
            Span::styled(format!("{:<14}", label), label_style),
            Span::styled(format!("{}{}", value, cursor), value_style),
        ])
    }

    fn loading_line(&self, load: &LoadState) -> Option<Line<'static>> {
        let p = self.palette;
        match load {
            LoadState::Loading => Some(Line::styled(self.tr("dialog.loading", "Loading..."), styles::text_muted(p))),
            LoadState::Failed(error) => Some(Line::styled(
                self.t.format("dialog.load_failed", "Could not load: {error}", &[("error", error)]),
                styles::error(p),
            )),
            LoadState::Loaded => None,
        }
    }

    fn add_servers(&self, dialog: &AddServersDialog) -> DialogContent {
        let p = self.palette;
        let (title, label) = match dialog.mode {
            AddMode::Addresses => (
                self.tr("add.title", "Add servers"),
                self.tr("add.addresses", "Addresses"),
            ),
            AddMode::ImportFile => (
                self.tr("add.import_title", "Import servers from file"),
                self.tr("add.file", "File path"),
            ),
        };

        let mut lines = vec![
            Line::styled(
                match dialog.mode {
                    AddMode::Addresses => self.tr("add.help", "Separate addresses with commas"),
                    AddMode::ImportFile => self.tr("add.import_help", "One address per line"),
                },
                styles::text_muted(p),
            ),
            Line::raw(""),
            self.input_line(&label, &dialog.input, !dialog.running, false),
            Line::raw(""),
        ];

        let skip = dialog.log.len().saturating_sub(ADD_LOG_ROWS);
        for entry in dialog.log.iter().skip(skip) {
            lines.push(match &entry.error {
                None => Line::from(vec![
                    Span::styled("✓ ", styles::success(p)),
                    Span::styled(entry.address.clone(), styles::text_primary(p)),
                ]),
                Some(error) => Line::from(vec![
                    Span::styled("✗ ", styles::error(p)),
                    Span::styled(entry.address.clone(), styles::text_primary(p)),
                    Span::styled(format!("  {}", error), styles::error(p)),
                ]),
            });
        }
        if dialog.running {
            lines.push(Line::styled(self.tr("add.running", "Adding..."), styles::accent(p)));
        }
        if let Some(summary) = dialog.summary {
            lines.push(Line::styled(
                self.t.format(
                    "add.summary",
                    "Added: {added}, Failed: {failed}",
                    &[
                        ("added", &summary.added.to_string()),
                        ("failed", &summary.failed.to_string()),
                    ],
                ),
                styles::text_bright_bold(p),
            ));
        }

        DialogContent {
            title,
            lines,
            hint: self.tr("add.hint", "Enter add · Tab switch mode · Esc close"),
            is_error: false,
            width: 70,
        }
    }

    fn edit_server(&self, dialog: &EditServerDialog) -> DialogContent {
        let p = self.palette;
        let fields = [
            (EditField::Name, self.tr("edit.name", "Name")),
            (EditField::Address, self.tr("edit.address", "Address")),
            (EditField::Path, self.tr("edit.path", "Server path")),
            (EditField::RconPort, self.tr("edit.rcon_port", "RCON port")),
            (EditField::RconPassword, self.tr("edit.rcon_password", "RCON password")),
        ];

        let mut lines = Vec::new();
        for (field, label) in fields {
            if dialog.is_locked(field) {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", label), styles::text_muted(p)),
                    Span::styled(
                        self.tr("edit.locked", "configured (Ctrl+U to change)"),
                        styles::text_muted(p),
                    ),
                ]));
                continue;
            }
            let masked = field == EditField::RconPassword;
            lines.push(self.input_line(&label, dialog.field(field), dialog.focus == field, masked));
        }

        lines.push(Line::raw(""));
        if dialog.saving {
            lines.push(Line::styled(self.tr("edit.saving", "Saving..."), styles::accent(p)));
        }
        match &dialog.error {
            Some(EditError::WrongPassword) => lines.push(Line::styled(
                self.tr("edit.wrong_password", "Wrong RCON password"),
                styles::error(p),
            )),
            Some(EditError::Failed(detail)) => lines.push(Line::styled(
                self.t.format("edit.failed", "Could not save: {error}", &[("error", detail)]),
                styles::error(p),
            )),
            None => {}
        }

        DialogContent {
            title: self.tr("edit.title", "Edit server"),
            lines,
            hint: self.tr("edit.hint", "Enter save · Tab next field · Esc cancel"),
            is_error: false,
            width: 64,
        }
    }

    fn confirm(&self, kind: &ConfirmKind) -> DialogContent {
        let p = self.palette;
        let (title, text) = match kind {
            ConfirmKind::DeleteServer { ip, name } => (
                self.tr("confirm.delete_title", "Delete server"),
                self.t.format(
                    "confirm.delete",
                    "Remove {name} ({ip}) from monitoring?",
                    &[("name", name), ("ip", ip)],
                ),
            ),
            ConfirmKind::Shutdown => (
                self.tr("confirm.shutdown_title", "Stop backend"),
                self.tr(
                    "confirm.shutdown",
                    "Stop the monitoring backend? Monitoring ends for every user.",
                ),
            ),
        };
        DialogContent {
            title,
            lines: vec![Line::styled(text, styles::text_primary(p))],
            hint: self.tr("confirm.hint", "y confirm · n cancel"),
            is_error: true,
            width: 56,
        }
    }

    fn settings(&self, dialog: &SettingsDialog) -> DialogContent {
        let p = self.palette;
        let mut lines = Vec::new();
        if let Some(line) = self.loading_line(&dialog.load) {
            lines.push(line);
        } else {
            for field in SettingsField::ORDER {
                let focused = dialog.focus == field;
                let label = match field {
                    SettingsField::Webhook => {
                        lines.push(self.input_line(
                            &self.tr("settings.webhook", "Discord webhook"),
                            &dialog.webhook,
                            focused,
                            false,
                        ));
                        lines.push(Line::raw(""));
                        continue;
                    }
                    SettingsField::NotifyOnlineOffline => {
                        self.tr("settings.online_offline", "Notify when a server goes online or offline")
                    }
                    SettingsField::NotifyPlayerPeak => {
                        self.tr("settings.player_peak", "Notify on a new player peak")
                    }
                    SettingsField::NotifyMilestones => {
                        self.tr("settings.milestones", "Notify on occupancy milestones")
                    }
                    SettingsField::NotifyFirstJoin => {
                        self.tr("settings.first_join", "Notify on a player's first join")
                    }
                };
                let checked = dialog.flag(field).unwrap_or(false);
                let style = if focused {
                    styles::focused_selected(p)
                } else {
                    styles::text_primary(p)
                };
                lines.push(Line::from(vec![
                    Span::styled(if checked { "[x] " } else { "[ ] " }, style),
                    Span::styled(label, style),
                ]));
            }
        }
        if dialog.saving {
            lines.push(Line::raw(""));
            lines.push(Line::styled(self.tr("settings.saving", "Saving..."), styles::accent(p)));
        }

        DialogContent {
            title: self.tr("settings.title", "Notification settings"),
            lines,
            hint: self.tr("settings.hint", "Space toggle · Enter save · Esc close"),
            is_error: false,
            width: 66,
        }
    }

    fn players(&self, popup: &PlayerPopup) -> DialogContent {
        let p = self.palette;
        let mut lines = Vec::new();
        if let Some(line) = self.loading_line(&popup.load) {
            lines.push(line);
        } else if popup.players.is_empty() {
            lines.push(Line::styled(
                self.tr("players.none_online", "Nobody online"),
                styles::text_muted(p),
            ));
        } else {
            for name in &popup.players {
                lines.push(Line::from(vec![
                    Span::styled("● ", styles::success(p)),
                    Span::styled(name.clone(), styles::text_primary(p)),
                ]));
            }
        }
        DialogContent {
            title: self.t.format(
                "players.popup_title",
                "Online on {name}",
                &[("name", &popup.server_name)],
            ),
            lines,
            hint: self.tr("dialog.close_hint", "Esc close"),
            is_error: false,
            width: 48,
        }
    }

    fn watchlist(&self, panel: &WatchlistPanel) -> DialogContent {
        let p = self.palette;
        let mut lines = Vec::new();
        if let Some(line) = self.loading_line(&panel.load) {
            lines.push(line);
        } else if panel.entries.is_empty() {
            lines.push(Line::styled(
                self.tr("watchlist.empty", "No watched players"),
                styles::text_muted(p),
            ));
        } else {
            for (i, entry) in panel.entries.iter().enumerate() {
                let selected = i == panel.selected;
                let (marker, style) = if selected {
                    ("▶ ", styles::focused_selected(p))
                } else {
                    ("  ", styles::text_primary(p))
                };
                lines.push(Line::from(vec![
                    Span::styled(marker, styles::accent(p)),
                    Span::styled(entry.name().to_string(), style),
                ]));
            }
        }
        lines.push(Line::raw(""));
        lines.push(self.input_line(
            &self.tr("watchlist.add", "Add player"),
            &panel.input,
            true,
            false,
        ));

        DialogContent {
            title: self.tr("watchlist.title", "Watchlist"),
            lines,
            hint: self.tr("watchlist.hint", "Enter add · Del remove · Esc close"),
            is_error: false,
            width: 52,
        }
    }

    fn alert(&self, alert: &Alert) -> DialogContent {
        let p = self.palette;
        let style = if alert.is_error {
            styles::error(p)
        } else {
            styles::text_primary(p)
        };
        DialogContent {
            title: alert.title.clone(),
            lines: alert
                .text
                .lines()
                .map(|l| Line::styled(l.to_string(), style))
                .collect(),
            hint: self.tr("alert.hint", "Enter close"),
            is_error: alert.is_error,
            width: 60,
        }
    }

    fn content(&self) -> DialogContent {
        match self.modal {
            Modal::AddServers(d) => self.add_servers(d),
            Modal::EditServer(d) => self.edit_server(d),
            Modal::Confirm(kind) => self.confirm(kind),
            Modal::Settings(d) => self.settings(d),
            Modal::Players(d) => self.players(d),
            Modal::Watchlist(d) => self.watchlist(d),
            Modal::Alert(d) => self.alert(d),
        }
    }
}

impl Widget for ModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        dim_background(buf, area, p);

        let content = self.content();
        let inner_width = content.width.saturating_sub(4) as usize;
        // Borders, padding, a spacer and the hint line
        let body_rows: u16 = content
            .lines
            .iter()
            .map(|l| (l.width().max(1).div_ceil(inner_width.max(1))) as u16)
            .sum();
        let height = body_rows + 5;
        let rect = centered_rect(content.width, height, area);

        render_shadow(buf, rect, p);
        Clear.render(rect, buf);

        let title = Line::from(Span::styled(
            format!(" {} ", truncate(&content.title, inner_width)),
            if content.is_error {
                styles::error(p)
            } else {
                styles::text_bright_bold(p)
            },
        ));
        let block = styles::modal_block(p, title, content.is_error);
        let inner = block.inner(rect);
        block.render(rect, buf);

        let padded = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        if padded.height == 0 {
            return;
        }
        let body = Rect::new(padded.x, padded.y, padded.width, padded.height.saturating_sub(1));
        Paragraph::new(content.lines)
            .wrap(Wrap { trim: false })
            .render(body, buf);

        let hint = Rect::new(padded.x, padded.bottom() - 1, padded.width, 1);
        Paragraph::new(Line::styled(content.hint, Style::default().fg(p.text_muted)))
            .right_aligned()
            .render(hint, buf);
    }
}
