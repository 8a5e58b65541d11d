pub fn error(description: impl Into<String>) -> rfd::MessageDialog {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("错误")
        .set_description(description.into())
}
