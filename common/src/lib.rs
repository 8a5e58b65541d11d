#![deny(unsafe_op_in_unsafe_fn)]

pub mod fade;
pub mod global_listener;
pub mod history;
pub mod key;
pub mod key_message;
pub mod key_overlay;
pub mod main_app;
pub mod setting;
pub mod ucolor32;

mod message_dialog;
mod utils;

/// oh, blazing fast!
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// large enough to avoid jam
const CHANNEL_CAP: usize = u16::MAX as usize + 1;

const SETTING_FILE_NAME: &str = "config.json";

fn common_eframe_native_options(vsync: bool) -> eframe::NativeOptions {
    use eframe::egui_wgpu::WgpuConfiguration;
    use eframe::wgpu::PresentMode;
    eframe::NativeOptions {
        renderer: eframe::Renderer::Wgpu,
        wgpu_options: WgpuConfiguration {
            present_mode: if vsync {
                PresentMode::AutoVsync
            } else {
                PresentMode::AutoNoVsync
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

fn get_current_dir() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|err| {
        message_dialog::error(format!("未知错误: {err}")).show();
        panic!()
    })
}

fn key_display_setting_path() -> std::path::PathBuf {
    get_current_dir().join(SETTING_FILE_NAME)
}

pub use utils::graceful_run;
