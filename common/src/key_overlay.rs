use std::time::{Duration, Instant};

use crate::{
    fade::FadeController, history::HistoryBuffer, key_message::KeyMessage, setting::Setting,
};
use egui::{Align2, Color32, CornerRadius, FontData, FontDefinitions, FontFamily, FontId};

use crossbeam::channel::Receiver as MpscReceiver;

/// Text surface state: drains key messages, feeds the history buffer and the
/// fade controller, and paints the resulting line.
pub struct KeyOverlay {
    setting: Setting,
    history: HistoryBuffer,
    fade: FadeController,
    display_text: String,
    key_messages_buffer: Vec<KeyMessage>,
    keys_receiver: MpscReceiver<KeyMessage>,
    egui_ctx: egui::Context,
    text_color: Color32,
    background_color: Color32,
    font_family: FontFamily,
}

impl KeyOverlay {
    pub const FONT_FAMILY_NAME: &str = "key_display_font";

    /// fallbacks behind the configured font; the symbol glyphs (␣ ⏎ ⇧ …)
    /// are not in every text face
    const FALLBACK_FONT_NAMES: [&str; 2] = ["Segoe UI Symbol", "Arial"];

    pub fn new(
        egui_ctx: &egui::Context,
        setting: Setting,
        keys_receiver: MpscReceiver<KeyMessage>,
    ) -> Self {
        Self::init_fonts(egui_ctx, &setting.display.font_name);

        let history = HistoryBuffer::new(setting.history.max_length);
        let fade = FadeController::new(&setting.fade_effect, Instant::now());
        let text_color = setting.display.text_color.into();
        let background_color = setting.display.background_color.into();
        Self {
            setting,
            history,
            fade,
            display_text: String::new(),
            key_messages_buffer: Vec::with_capacity(64),
            keys_receiver,
            egui_ctx: egui_ctx.clone(),
            text_color,
            background_color,
            font_family: FontFamily::Name(Self::FONT_FAMILY_NAME.into()),
        }
    }

    /// Live re-application of a setting without recreating the window.
    pub fn load_setting(&mut self, setting: Setting, reload_font: bool) {
        reload_font.then(|| Self::init_fonts(&self.egui_ctx, &setting.display.font_name));

        self.text_color = setting.display.text_color.into();
        self.background_color = setting.display.background_color.into();
        self.history.set_max_len(setting.history.max_length);
        self.fade.reload(&setting.fade_effect);
        self.setting = setting;
        self.refresh_display_text();
    }

    fn init_fonts(egui_ctx: &egui::Context, font_family: &str) {
        let sys_fonts = font_kit::source::SystemSource::new();
        let mut font_definitions = FontDefinitions::default();
        let font_list: Vec<&str> = std::iter::once(font_family)
            .chain(Self::FALLBACK_FONT_NAMES)
            .collect();
        let font_list_iter = font_list.iter().filter_map(|font_family| {
            let family_handle = sys_fonts.select_family_by_name(font_family).ok()?;
            let first_font_handle = family_handle.fonts().first()?;
            let is_ttc = match first_font_handle {
                font_kit::handle::Handle::Path { path, .. } => {
                    matches!(
                        font_kit::font::Font::analyze_path(path).ok()?,
                        font_kit::file_type::FileType::Collection(_)
                    )
                }
                _ => return None,
            };
            let font_data = first_font_handle.load().ok()?.copy_font_data()?;
            let font_data = if is_ttc {
                owned_ttf_parser::OwnedFace::from_vec((*font_data).clone(), 0)
                    .ok()?
                    .into_vec()
            } else {
                (*font_data).clone()
            };
            Some((font_data, font_family.to_string()))
        });

        let font_family_name = FontFamily::Name(Self::FONT_FAMILY_NAME.into());
        let default_proportional = font_definitions
            .families
            .get(&FontFamily::Proportional)
            .expect("unreachable")
            .clone();

        let mut custom_font_names: Vec<_> = font_list_iter
            .map(|(font_data, font_name)| {
                font_definitions
                    .font_data
                    .insert(font_name.clone(), FontData::from_owned(font_data).into());
                font_name
            })
            .collect();
        custom_font_names.extend(default_proportional.clone());
        font_definitions
            .families
            .insert(font_family_name, custom_font_names);

        egui_ctx.set_fonts(font_definitions);
    }

    /// Drains pending key messages and advances the fade state machine.
    pub fn update(&mut self, instant_now: Instant) {
        self.key_messages_buffer
            .extend(self.keys_receiver.try_iter());
        if !self.key_messages_buffer.is_empty() {
            for key_message in self.key_messages_buffer.drain(..) {
                if self.fade.on_input(key_message.instant) {
                    self.history.clear();
                }
                if !self.setting.history.enabled {
                    // no history: the buffer only ever holds the last token
                    self.history.clear();
                }
                self.history.append(key_message.token);
            }
            self.refresh_display_text();
        }
        if self.fade.poll(instant_now) {
            self.history.clear();
        }
    }

    fn refresh_display_text(&mut self) {
        self.display_text = self.history.render(self.setting.display.max_chars);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let opacity = self.opacity();
        let painter = ui.painter();
        painter.rect_filled(
            painter.clip_rect(),
            CornerRadius::ZERO,
            self.background_color.gamma_multiply(opacity),
        );
        if self.display_text.is_empty() {
            return;
        }
        let window = &self.setting.window;
        let text_rect = painter
            .clip_rect()
            .shrink2(egui::vec2(window.padding_x, window.padding_y));
        painter.text(
            text_rect.center(),
            Align2::CENTER_CENTER,
            &self.display_text,
            FontId::new(self.setting.display.font_size, self.font_family.clone()),
            self.text_color.gamma_multiply(opacity),
        );
    }

    /// Effective window opacity: configured base times the fade scalar.
    pub fn opacity(&self) -> f32 {
        self.setting.display.opacity.clamp(0.0, 1.0) * self.fade.opacity()
    }

    pub fn setting(&self) -> &Setting {
        &self.setting
    }

    /// How long the UI loop may sleep before this overlay needs a tick.
    pub fn next_wake(&self, instant_now: Instant) -> Option<Duration> {
        self.fade.next_wake(instant_now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> (KeyOverlay, crossbeam::channel::Sender<KeyMessage>) {
        let (sender, receiver) = crossbeam::channel::bounded(64);
        let ctx = egui::Context::default();
        let mut setting = Setting::default();
        setting.history.max_length = 3;
        setting.display.max_chars = 20;
        // keep the test deterministic: no system font lookup surprises
        setting.display.font_name = "".into();
        (KeyOverlay::new(&ctx, setting, receiver), sender)
    }

    #[test]
    fn tokens_flow_into_display_text() {
        let (mut overlay, sender) = overlay();
        let now = Instant::now();
        for token in ["a", "b", "c", "d"] {
            sender.send(KeyMessage::new(token.into(), now)).unwrap();
        }
        overlay.update(now);
        // max_length 3: "a" evicted
        assert_eq!(overlay.display_text, "b c d");
    }

    #[test]
    fn fade_expiry_clears_history() {
        let (mut overlay, sender) = overlay();
        let start = Instant::now();
        sender.send(KeyMessage::new("a".into(), start)).unwrap();
        overlay.update(start);
        overlay.update(start + Duration::from_secs_f32(3.1));
        let base = crate::setting::DisplaySetting::DEFAULT_OPACITY;
        assert!(overlay.history.is_empty());
        assert!(overlay.opacity() < base);
        // new input starts a fresh line at full opacity
        let later = start + Duration::from_secs(4);
        sender.send(KeyMessage::new("z".into(), later)).unwrap();
        overlay.update(later);
        assert_eq!(overlay.display_text, "z");
        assert_eq!(overlay.opacity(), base);
    }

    #[test]
    fn history_disabled_shows_only_last_token() {
        let (sender, receiver) = crossbeam::channel::bounded::<KeyMessage>(64);
        let ctx = egui::Context::default();
        let mut setting = Setting::default();
        setting.history.enabled = false;
        setting.display.font_name = "".into();
        let mut overlay = KeyOverlay::new(&ctx, setting, receiver);
        let now = Instant::now();
        sender.send(KeyMessage::new("a".into(), now)).unwrap();
        sender.send(KeyMessage::new("b".into(), now)).unwrap();
        overlay.update(now);
        assert_eq!(overlay.display_text, "b");
    }

    #[test]
    fn live_setting_reload_trims_history() {
        let (mut overlay, sender) = overlay();
        let now = Instant::now();
        for token in ["a", "b", "c"] {
            sender.send(KeyMessage::new(token.into(), now)).unwrap();
        }
        overlay.update(now);
        let mut setting = overlay.setting().clone();
        setting.history.max_length = 1;
        setting.display.max_chars = 5;
        overlay.load_setting(setting, false);
        assert_eq!(overlay.display_text, "c");
    }
}
