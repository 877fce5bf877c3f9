//! Modal dialogs: add, edit, delete/shutdown confirmation, settings, player
//! popup, watchlist, and blocking messages

use blockspy_core::types::{
    GlobalSettings, RconTestRequest, ServerPatch, ServerSummary, WatchlistEntry,
};

use crate::details::LoadState;
use crate::input_key::InputKey;

/// Single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Apply an editing key; returns whether it was consumed.
    pub fn handle_key(&mut self, key: InputKey) -> bool {
        match key {
            InputKey::Backspace => {
                self.value.pop();
                true
            }
            other => match other.typed_char() {
                Some(c) => {
                    self.value.push(c);
                    true
                }
                None => false,
            },
        }
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    AddServers(AddServersDialog),
    EditServer(EditServerDialog),
    Confirm(ConfirmKind),
    Settings(SettingsDialog),
    Players(PlayerPopup),
    Watchlist(WatchlistPanel),
    Alert(Alert),
}

// ─────────────────────────────────────────────────────────────────────────────
// Add servers
// ─────────────────────────────────────────────────────────────────────────────

/// Split pasted text or a file into addresses.
pub fn parse_address_list(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Addresses typed directly, separated by commas
    Addresses,
    /// A path to a file with one address per line
    ImportFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLogEntry {
    pub address: String,
    /// `None` on success
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddSummary {
    pub added: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddServersDialog {
    pub mode: AddMode,
    pub input: TextField,
    pub log: Vec<AddLogEntry>,
    pub running: bool,
    pub summary: Option<AddSummary>,
}

impl AddServersDialog {
    pub fn new(mode: AddMode) -> Self {
        Self {
            mode,
            input: TextField::default(),
            log: Vec::new(),
            running: false,
            summary: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AddMode::Addresses => AddMode::ImportFile,
            AddMode::ImportFile => AddMode::Addresses,
        };
        self.input.clear();
    }

    /// Start a run: clear the previous log.
    pub fn begin(&mut self) {
        self.running = true;
        self.log.clear();
        self.summary = None;
        self.input.clear();
    }

    pub fn record(&mut self, address: String, error: Option<String>) {
        self.log.push(AddLogEntry { address, error });
    }

    pub fn finish(&mut self) -> AddSummary {
        let failed = self.log.iter().filter(|e| e.error.is_some()).count();
        let summary = AddSummary {
            added: self.log.len() - failed,
            failed,
        };
        self.running = false;
        self.summary = Some(summary);
        summary
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit server
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Address,
    Path,
    RconPort,
    RconPassword,
}

impl EditField {
    const ORDER: [EditField; 5] = [
        EditField::Name,
        EditField::Address,
        EditField::Path,
        EditField::RconPort,
        EditField::RconPassword,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_rcon(self) -> bool {
        matches!(self, EditField::RconPort | EditField::RconPassword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    WrongPassword,
    Failed(String),
}

/// What a valid edit form turns into.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSubmission {
    pub original_ip: String,
    /// Address the server has after the save
    pub final_ip: String,
    pub patch: ServerPatch,
    pub rcon_test: Option<RconTestRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditServerDialog {
    pub original_ip: String,
    pub name: TextField,
    pub address: TextField,
    pub path: TextField,
    pub rcon_port: TextField,
    pub rcon_password: TextField,
    pub focus: EditField,
    /// RCON fields are read-only until unlocked
    pub rcon_locked: bool,
    pub error: Option<EditError>,
    pub saving: bool,
    /// The details view was open when the dialog opened
    pub reopen_details: bool,
}

impl EditServerDialog {
    pub fn from_server(server: &ServerSummary, reopen_details: bool) -> Self {
        Self {
            original_ip: server.ip.clone(),
            name: TextField::new(server.custom_name.clone().unwrap_or_default()),
            address: TextField::new(server.ip.clone()),
            path: TextField::new(server.server_path.clone().unwrap_or_default()),
            rcon_port: TextField::new(
                server
                    .rcon_port
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
            ),
            rcon_password: TextField::new(server.rcon_password.clone().unwrap_or_default()),
            focus: EditField::Name,
            rcon_locked: server.has_rcon(),
            error: None,
            saving: false,
            reopen_details,
        }
    }

    pub fn unlock_rcon(&mut self) {
        self.rcon_locked = false;
        self.focus = EditField::RconPort;
    }

    pub fn is_locked(&self, field: EditField) -> bool {
        self.rcon_locked && field.is_rcon()
    }

    pub fn field(&self, field: EditField) -> &TextField {
        match field {
            EditField::Name => &self.name,
            EditField::Address => &self.address,
            EditField::Path => &self.path,
            EditField::RconPort => &self.rcon_port,
            EditField::RconPassword => &self.rcon_password,
        }
    }

    fn field_mut(&mut self, field: EditField) -> &mut TextField {
        match field {
            EditField::Name => &mut self.name,
            EditField::Address => &mut self.address,
            EditField::Path => &mut self.path,
            EditField::RconPort => &mut self.rcon_port,
            EditField::RconPassword => &mut self.rcon_password,
        }
    }

    /// Type into the focused field unless it is locked.
    pub fn edit_focused(&mut self, key: InputKey) -> bool {
        if self.is_locked(self.focus) {
            return false;
        }
        let focus = self.focus;
        self.field_mut(focus).handle_key(key)
    }

    /// Build the requests for the current form.
    ///
    /// The RCON test runs only when both port and password are set. An empty
    /// password is left out of the patch, and `new_ip` is sent only when the
    /// address changed.
    pub fn submission(&self) -> EditSubmission {
        let typed_ip = self.address.trimmed();
        let final_ip = if typed_ip.is_empty() {
            self.original_ip.clone()
        } else {
            typed_ip.to_string()
        };
        let rcon_port = self.rcon_port.trimmed().parse::<u32>().ok().filter(|p| *p > 0);
        let rcon_password = Some(self.rcon_password.value.clone()).filter(|p| !p.is_empty());

        let rcon_test = match (rcon_port, &rcon_password) {
            (Some(port), Some(password)) => Some(RconTestRequest {
                ip: final_ip.clone(),
                rcon_port: port,
                rcon_password: password.clone(),
            }),
            _ => None,
        };

        let patch = ServerPatch {
            custom_name: Some(self.name.trimmed().to_string()),
            server_path: Some(self.path.trimmed().to_string()),
            rcon_port,
            rcon_password,
            new_ip: (final_ip != self.original_ip).then(|| final_ip.clone()),
        };

        EditSubmission {
            original_ip: self.original_ip.clone(),
            final_ip,
            patch,
            rcon_test,
        }
    }

    /// A wrong password clears the password field.
    pub fn fail(&mut self, wrong_password: bool, detail: String) {
        self.saving = false;
        if wrong_password {
            self.rcon_password.clear();
            self.focus = EditField::RconPassword;
            self.error = Some(EditError::WrongPassword);
        } else {
            self.error = Some(EditError::Failed(detail));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirmation, settings, popups
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind {
    DeleteServer { ip: String, name: String },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Webhook,
    NotifyOnlineOffline,
    NotifyPlayerPeak,
    NotifyMilestones,
    NotifyFirstJoin,
}

impl SettingsField {
    pub const ORDER: [SettingsField; 5] = [
        SettingsField::Webhook,
        SettingsField::NotifyOnlineOffline,
        SettingsField::NotifyPlayerPeak,
        SettingsField::NotifyMilestones,
        SettingsField::NotifyFirstJoin,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDialog {
    pub settings: GlobalSettings,
    pub webhook: TextField,
    pub focus: SettingsField,
    pub load: LoadState,
    pub saving: bool,
}

impl SettingsDialog {
    pub fn loading() -> Self {
        Self {
            settings: GlobalSettings::default(),
            webhook: TextField::default(),
            focus: SettingsField::Webhook,
            load: LoadState::Loading,
            saving: false,
        }
    }

    pub fn apply(&mut self, settings: GlobalSettings) {
        self.webhook = TextField::new(settings.discord_webhook_url.clone().unwrap_or_default());
        self.settings = settings;
        self.load = LoadState::Loaded;
    }

    pub fn flag(&self, field: SettingsField) -> Option<bool> {
        match field {
            SettingsField::Webhook => None,
            SettingsField::NotifyOnlineOffline => Some(self.settings.notify_online_offline),
            SettingsField::NotifyPlayerPeak => Some(self.settings.notify_player_peak),
            SettingsField::NotifyMilestones => Some(self.settings.notify_occupancy_milestones),
            SettingsField::NotifyFirstJoin => Some(self.settings.notify_first_join),
        }
    }

    /// Flip the focused toggle; no-op on the webhook field.
    pub fn toggle_focused(&mut self) {
        let s = &mut self.settings;
        let slot = match self.focus {
            SettingsField::Webhook => return,
            SettingsField::NotifyOnlineOffline => &mut s.notify_online_offline,
            SettingsField::NotifyPlayerPeak => &mut s.notify_player_peak,
            SettingsField::NotifyMilestones => &mut s.notify_occupancy_milestones,
            SettingsField::NotifyFirstJoin => &mut s.notify_first_join,
        };
        *slot = !*slot;
    }

    /// Settings to POST.
    pub fn to_settings(&self) -> GlobalSettings {
        GlobalSettings {
            discord_webhook_url: Some(self.webhook.trimmed().to_string())
                .filter(|s| !s.is_empty()),
            ..self.settings.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPopup {
    pub ip: String,
    pub server_name: String,
    pub load: LoadState,
    /// Sorted online names
    pub players: Vec<String>,
}

impl PlayerPopup {
    pub fn new(ip: String, server_name: String) -> Self {
        Self {
            ip,
            server_name,
            load: LoadState::Loading,
            players: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistPanel {
    pub ip: String,
    pub entries: Vec<WatchlistEntry>,
    pub load: LoadState,
    pub input: TextField,
    pub selected: usize,
}

impl WatchlistPanel {
    pub fn new(ip: String) -> Self {
        Self {
            ip,
            entries: Vec::new(),
            load: LoadState::Loading,
            input: TextField::default(),
            selected: 0,
        }
    }

    pub fn apply(&mut self, entries: Vec<WatchlistEntry>) {
        self.entries = entries;
        self.load = LoadState::Loaded;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.entries.get(self.selected).map(WatchlistEntry::name)
    }
}

/// Blocking message dismissed with Enter or Esc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub text: String,
    pub is_error: bool,
}

impl Alert {
    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            is_error: true,
        }
    }

    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            is_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_server() -> ServerSummary {
        let mut server = ServerSummary::new("mc.example.net");
        server.custom_name = Some("Lobby".into());
        server.rcon_port = Some(25575);
        server.rcon_password = Some("secret".into());
        server
    }

    #[test]
    fn test_parse_address_list() {
        assert_eq!(
            parse_address_list("a.net, b.net\n\n c.net:25566 ,\r\n"),
            vec!["a.net", "b.net", "c.net:25566"]
        );
        assert!(parse_address_list("  ").is_empty());
    }

    #[test]
    fn test_text_field_editing() {
        let mut field = TextField::default();
        assert!(field.handle_key(InputKey::Char('h')));
        assert!(field.handle_key(InputKey::Char('i')));
        assert!(field.handle_key(InputKey::Backspace));
        assert!(!field.handle_key(InputKey::Enter));
        assert_eq!(field.value, "h");
    }

    #[test]
    fn test_add_summary_counts() {
        let mut dialog = AddServersDialog::new(AddMode::Addresses);
        dialog.begin();
        dialog.record("a".into(), None);
        dialog.record("b".into(), Some("Servidor já existe".into()));
        dialog.record("c".into(), None);
        let summary = dialog.finish();
        assert_eq!(summary, AddSummary { added: 2, failed: 1 });
        assert!(!dialog.running);
    }

    #[test]
    fn test_rcon_locked_when_configured() {
        let mut dialog = EditServerDialog::from_server(&configured_server(), false);
        assert!(dialog.rcon_locked);
        dialog.focus = EditField::RconPort;
        assert!(!dialog.edit_focused(InputKey::Char('1')));
        assert_eq!(dialog.rcon_port.value, "25575");

        dialog.unlock_rcon();
        assert!(dialog.edit_focused(InputKey::Backspace));
        assert_eq!(dialog.rcon_port.value, "2557");
    }

    #[test]
    fn test_submission_runs_rcon_test_when_both_set() {
        let dialog = EditServerDialog::from_server(&configured_server(), true);
        let sub = dialog.submission();
        assert_eq!(
            sub.rcon_test,
            Some(RconTestRequest {
                ip: "mc.example.net".into(),
                rcon_port: 25575,
                rcon_password: "secret".into(),
            })
        );
        assert_eq!(sub.patch.new_ip, None);
        assert_eq!(sub.patch.custom_name.as_deref(), Some("Lobby"));
    }

    #[test]
    fn test_submission_omits_empty_password_and_sends_new_ip() {
        let mut server = configured_server();
        server.rcon_password = None;
        let mut dialog = EditServerDialog::from_server(&server, false);
        dialog.address = TextField::new(" play.example.net ");

        let sub = dialog.submission();
        assert_eq!(sub.rcon_test, None);
        assert_eq!(sub.patch.rcon_password, None);
        assert_eq!(sub.patch.rcon_port, Some(25575));
        assert_eq!(sub.patch.new_ip.as_deref(), Some("play.example.net"));
        assert_eq!(sub.final_ip, "play.example.net");

        let json = serde_json::to_value(&sub.patch).unwrap();
        assert!(json.get("rcon_password").is_none());
    }

    #[test]
    fn test_wrong_password_clears_field() {
        let mut dialog = EditServerDialog::from_server(&configured_server(), false);
        dialog.saving = true;
        dialog.fail(true, "Senha RCON incorreta".into());
        assert!(dialog.rcon_password.value.is_empty());
        assert_eq!(dialog.error, Some(EditError::WrongPassword));
        assert!(!dialog.saving);

        dialog.fail(false, "Porta inválida".into());
        assert_eq!(dialog.error, Some(EditError::Failed("Porta inválida".into())));
    }

    #[test]
    fn test_settings_toggle_and_webhook() {
        let mut dialog = SettingsDialog::loading();
        dialog.apply(GlobalSettings {
            discord_webhook_url: Some("https://discord.example/hook".into()),
            notify_online_offline: true,
            ..Default::default()
        });
        dialog.toggle_focused();
        assert_eq!(dialog.to_settings().discord_webhook_url.as_deref(), Some("https://discord.example/hook"));

        dialog.focus = SettingsField::NotifyOnlineOffline;
        dialog.toggle_focused();
        dialog.webhook.clear();
        let out = dialog.to_settings();
        assert!(!out.notify_online_offline);
        assert_eq!(out.discord_webhook_url, None);
    }

    #[test]
    fn test_watchlist_selection_clamped() {
        let mut panel = WatchlistPanel::new("a".into());
        panel.selected = 5;
        panel.apply(vec![
            WatchlistEntry::Bare("Steve".into()),
            WatchlistEntry::Named { name: "Alex".into() },
        ]);
        assert_eq!(panel.selected, 1);
        assert_eq!(panel.selected_name(), Some("Alex"));
    }
}
