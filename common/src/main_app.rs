use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::ViewportBuilder;

use crate::{
    global_listener::{GlobalListener, HookShared},
    key_message::KeyMessage,
    key_overlay::KeyOverlay,
    setting::Setting,
};

use crossbeam::channel::Receiver as MpscReceiver;

pub struct MainApp {
    setting: Option<Setting>,
}

impl MainApp {
    pub fn new() -> Self {
        Self {
            setting: Some(Setting::load_from_local_setting()),
        }
    }

    pub fn run(mut self) {
        let setting = self.setting.take().expect("unreachable");
        let (keys_sender, keys_receiver) = crossbeam::channel::bounded(crate::CHANNEL_CAP);
        let hook_shared = Arc::new(HookShared::default());
        let listener = GlobalListener::new();
        listener.start(keys_sender, Arc::clone(&hook_shared));

        let mut native_options =
            crate::common_eframe_native_options(setting.performance.enable_vsync);
        native_options.viewport = ViewportBuilder::default()
            .with_inner_size([setting.window.width, setting.window.height])
            .with_decorations(false)
            .with_transparent(true)
            .with_window_level(egui::viewport::WindowLevel::AlwaysOnTop)
            .with_resizable(false);
        eframe::run_native(
            "Key Display",
            native_options,
            Box::new(move |cc| {
                Ok(Box::new(App::new(
                    cc,
                    keys_receiver,
                    setting,
                    hook_shared,
                    listener,
                )))
            }),
        )
        .expect("unreachable");
    }
}

struct App {
    key_overlay: KeyOverlay,
    listener: GlobalListener,
    update_delay: Duration,
    topmost_check_interval: Duration,
    next_topmost_check: Instant,
    positioned: bool,
}

impl App {
    fn new(
        cc: &eframe::CreationContext<'_>,
        keys_receiver: MpscReceiver<KeyMessage>,
        setting: Setting,
        hook_shared: Arc<HookShared>,
        listener: GlobalListener,
    ) -> Self {
        cc.egui_ctx.request_repaint();
        let update_delay = setting.performance.update_delay();
        let topmost_check_interval = setting.performance.topmost_check_interval();
        let key_overlay = KeyOverlay::new(&cc.egui_ctx, setting, keys_receiver);
        let _ = hook_shared.egui_ctx.set(cc.egui_ctx.clone());
        Self {
            key_overlay,
            listener,
            update_delay,
            topmost_check_interval,
            next_topmost_check: Instant::now(),
            positioned: false,
        }
    }

    /// Centers the window at the bottom of the screen, lifted by the
    /// configured margin. The monitor size is only known once the first
    /// frame runs, hence not done through the viewport builder.
    fn place_at_screen_bottom(&mut self, ctx: &egui::Context) {
        if self.positioned {
            return;
        }
        let Some(monitor_size) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        if monitor_size.x <= 0.0 || monitor_size.y <= 0.0 {
            return;
        }
        let window = &self.key_overlay.setting().window;
        let x = (monitor_size.x - window.width) / 2.0;
        let y = monitor_size.y - window.height - window.bottom_margin;
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        self.positioned = true;
    }

    /// Window managers may demote the overlay; re-request topmost on a
    /// fixed cadence.
    fn reassert_topmost(&mut self, ctx: &egui::Context, instant_now: Instant) {
        if instant_now < self.next_topmost_check {
            return;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
            egui::viewport::WindowLevel::AlwaysOnTop,
        ));
        self.next_topmost_check = instant_now + self.topmost_check_interval;
    }

    fn drag_to_reposition(&self, ctx: &egui::Context, response: &egui::Response) {
        if !response.dragged() {
            return;
        }
        let delta = response.drag_delta();
        if delta == egui::Vec2::ZERO {
            return;
        }
        let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(outer_rect.min + delta));
    }

    /// Right click re-reads `config.json` and applies it without recreating
    /// the window; an unreadable file is ignored.
    fn reload_setting(&mut self, ctx: &egui::Context) {
        let Ok(setting) = Setting::from_file(crate::key_display_setting_path()) else {
            return;
        };
        let reload_font = setting.display.font_name != self.key_overlay.setting().display.font_name;
        if setting.window != self.key_overlay.setting().window {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                setting.window.width,
                setting.window.height,
            )));
        }
        self.update_delay = setting.performance.update_delay();
        self.topmost_check_interval = setting.performance.topmost_check_interval();
        self.key_overlay.load_setting(setting, reload_font);
    }

    fn schedule_repaint(&self, ctx: &egui::Context, instant_now: Instant) {
        let mut wake = self.next_topmost_check.saturating_duration_since(instant_now);
        if let Some(fade_wake) = self.key_overlay.next_wake(instant_now) {
            wake = wake.min(fade_wake);
        }
        ctx.request_repaint_after(wake.max(self.update_delay));
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let instant_now = Instant::now();
        self.place_at_screen_bottom(ctx);
        self.reassert_topmost(ctx, instant_now);
        self.key_overlay.update(instant_now);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let response = ui.interact(
                    ui.max_rect(),
                    egui::Id::new("overlay_drag_region"),
                    egui::Sense::click_and_drag(),
                );
                self.drag_to_reposition(ctx, &response);
                if response.secondary_clicked() {
                    self.reload_setting(ctx);
                }
                self.key_overlay.show(ui);
            });
        self.schedule_repaint(ctx, instant_now);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self) {
        self.listener.stop();
    }
}
