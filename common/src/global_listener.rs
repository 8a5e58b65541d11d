use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
};
use std::time::Instant;

use crossbeam::channel::Sender as MpscSender;

use crate::{key, key_message::KeyMessage, message_dialog};

/// State shared with the listener thread.
#[derive(Debug, Default)]
pub struct HookShared {
    /// set once the eframe app is up; lets the hook wake the UI loop
    pub egui_ctx: OnceLock<egui::Context>,
}

/// Global key-press listener on a background thread.
///
/// The thread only maps the key to a display token and hands it to the UI
/// loop through the channel; everything else happens on the UI side.
pub struct GlobalListener {
    running: Arc<AtomicBool>,
}

impl GlobalListener {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts listening. Failure to install the hook (typically a missing
    /// input-monitoring permission) is fatal: error dialog, exit code 1.
    pub fn start(&self, msg_sender: MpscSender<KeyMessage>, hook_shared: Arc<HookShared>) {
        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        std::thread::spawn(move || {
            let callback = move |event: rdev::Event| {
                if !running.load(Ordering::Acquire) {
                    return;
                }
                let rdev::EventType::KeyPress(pressed_key) = event.event_type else {
                    return;
                };
                let Some(token) = key::display_token(pressed_key, event.name.as_deref()) else {
                    return;
                };
                let key_message = KeyMessage::new(token, Instant::now());
                #[cfg(debug_assertions)]
                println!("{:?}", key_message);
                // drop the event instead of blocking the hook
                let _ = msg_sender.try_send(key_message);
                if let Some(ctx) = hook_shared.egui_ctx.get() {
                    (!ctx.has_requested_repaint()).then(|| ctx.request_repaint());
                }
                if pressed_key == key::EXIT_KEY {
                    running.store(false, Ordering::Release);
                }
            };
            if let Err(err) = rdev::listen(callback) {
                message_dialog::error(format!("无法启动键盘监听: {err:?}")).show();
                std::process::exit(1);
            }
        });
    }

    /// Idempotent; the hook thread keeps running but drops every event.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
